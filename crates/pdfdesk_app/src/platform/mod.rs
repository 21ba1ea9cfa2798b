mod app;
mod config;
mod effects;
mod transcript;
mod ui;

use crossterm::event::KeyEvent;

pub use app::run_app;

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub(crate) enum Input {
    Key(KeyEvent),
    Resize,
    /// The terminal can no longer be read.
    Closed,
    /// Engine result already translated into a core message.
    Engine(pdfdesk_core::Msg),
}
