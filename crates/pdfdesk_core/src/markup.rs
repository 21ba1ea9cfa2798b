//! HTML fragments for the chat panel. Message text is always escaped.

use crate::view_model::{ChatMessageView, ChatView};
use crate::Role;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_message_html(message: &ChatMessageView) -> String {
    let class = match message.role {
        Role::User => "message user-message",
        Role::Agent => "message agent-message",
        Role::Error => "message error-message",
        Role::Loading => "message loading",
    };
    match message.label() {
        Some(label) => format!(
            "<div class=\"{class}\"><strong>{label}:</strong> {}</div>",
            escape_html(&message.text)
        ),
        None => format!("<div class=\"{class}\">{}</div>", escape_html(&message.text)),
    }
}

/// Renders the whole chat container, one message per line.
pub fn render_chat_html(chat: &ChatView) -> String {
    let mut out = String::from("<div id=\"chatbox\">\n");
    for message in &chat.messages {
        out.push_str("  ");
        out.push_str(&render_message_html(message));
        out.push('\n');
    }
    out.push_str("</div>\n");
    out
}
