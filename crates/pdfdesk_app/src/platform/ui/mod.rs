pub mod chat_panel;
pub mod commands;
pub mod input;
pub mod render;
pub mod terminal;
pub mod upload_panel;
