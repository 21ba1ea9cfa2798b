//! Chat history panel, redrawn from the view model every frame.

use std::collections::HashMap;

use pdfdesk_core::{ChatMessageView, ChatView, MessageId, Role};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use super::render::sanitize;

/// Scroll position relative to the newest message.
#[derive(Debug, Default)]
pub struct ChatPanel {
    /// Lines scrolled back from the anchor; zero follows the conversation.
    scroll_back: usize,
    anchor: Option<MessageId>,
}

/// Wrapped chat lines plus, per message, the line index just past its end.
pub(crate) struct ChatLayout {
    pub lines: Vec<Line<'static>>,
    pub ends: HashMap<MessageId, usize>,
}

impl ChatPanel {
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, chat: &ChatView) {
        if chat.scroll_to != self.anchor {
            self.anchor = chat.scroll_to;
            self.scroll_back = 0;
        }

        let title = match chat.pending_queries {
            0 => " Chat ".to_string(),
            n => format!(" Chat ({n} waiting) "),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        let layout = layout_messages(chat, usize::from(inner.width));
        let total = layout.lines.len();
        let top = self.top_line(&layout, usize::from(inner.height));

        let paragraph = Paragraph::new(layout.lines)
            .block(block)
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, area);

        if total > usize::from(inner.height) {
            let mut state = ScrollbarState::new(total).position(top);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut state,
            );
        }
    }

    /// First visible line: the anchor message sits on the bottom row unless
    /// the user scrolled back.
    fn top_line(&mut self, layout: &ChatLayout, height: usize) -> usize {
        let anchor_end = self
            .anchor
            .and_then(|id| layout.ends.get(&id).copied())
            .unwrap_or(layout.lines.len());
        let follow_top = anchor_end.saturating_sub(height);
        self.scroll_back = self.scroll_back.min(follow_top);
        follow_top - self.scroll_back
    }
}

pub(crate) fn layout_messages(chat: &ChatView, width: usize) -> ChatLayout {
    let mut lines = Vec::new();
    let mut ends = HashMap::new();
    for message in &chat.messages {
        let style = role_style(message.role);
        lines.extend(
            wrap(&message_text(message), width)
                .into_iter()
                .map(|text| Line::styled(text, style)),
        );
        ends.insert(message.id, lines.len());
    }
    ChatLayout { lines, ends }
}

fn message_text(message: &ChatMessageView) -> String {
    let text = sanitize(&message.text);
    match message.label() {
        Some(label) => format!("{label}: {text}"),
        None => format!("{text}..."),
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Agent => Style::default(),
        Role::Error => Style::default().fg(Color::Red),
        Role::Loading => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

/// Hard-wraps at `width` characters, keeping explicit line breaks.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}
