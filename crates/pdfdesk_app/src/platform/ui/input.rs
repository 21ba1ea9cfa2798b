//! Single-line prompt. Replies arriving while the user types never touch its contents.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};
use tui_textarea::{CursorMove, TextArea};

const PLACEHOLDER: &str = "Ask about the LlamaIndex docs, or :help for commands";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Contents changed; carries the new text.
    Edited(String),
    /// Enter was pressed; carries the line as typed.
    Submitted(String),
    Ignored,
}

pub struct PromptInput {
    textarea: TextArea<'static>,
}

impl Default for PromptInput {
    fn default() -> Self {
        Self {
            textarea: fresh_textarea(""),
        }
    }
}

impl PromptInput {
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InputEvent {
        if key.code == KeyCode::Enter {
            return InputEvent::Submitted(self.text());
        }
        if self.textarea.input(key) {
            InputEvent::Edited(self.text())
        } else {
            InputEvent::Ignored
        }
    }

    /// Mirrors the input text held in state; the box is rebuilt only when they differ.
    pub fn sync(&mut self, text: &str) {
        if self.text() != text {
            self.textarea = fresh_textarea(text);
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.textarea.set_block(
            Block::default()
                .title(" Message (Enter to send) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(&self.textarea, area);
    }
}

fn fresh_textarea(text: &str) -> TextArea<'static> {
    let mut textarea = TextArea::new(vec![text.to_string()]);
    textarea.set_cursor_line_style(Style::default());
    textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    textarea.set_placeholder_text(PLACEHOLDER);
    textarea.move_cursor(CursorMove::End);
    textarea
}
