//! Full-screen layout: chat, upload widget, prompt and a one-line status bar.

use pdfdesk_core::AppViewModel;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::chat_panel::ChatPanel;
use super::commands::HELP;
use super::input::PromptInput;
use super::upload_panel;

const STATUS_HINT: &str = "Esc quit | PgUp/PgDn scroll | :help commands";

/// Widget state that lives outside the core: scroll position, the prompt
/// buffer, transient notices and the help overlay.
#[derive(Default)]
pub struct Screen {
    chat: ChatPanel,
    input: PromptInput,
    notice: Option<String>,
    help_visible: bool,
}

impl Screen {
    pub fn input_mut(&mut self) -> &mut PromptInput {
        &mut self.input
    }

    pub fn chat_mut(&mut self) -> &mut ChatPanel {
        &mut self.chat
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn show_help(&mut self) {
        self.help_visible = true;
    }

    /// Closes the overlay; returns whether it was open.
    pub fn dismiss_help(&mut self) -> bool {
        std::mem::take(&mut self.help_visible)
    }

    pub fn draw(&mut self, frame: &mut Frame, view: &AppViewModel) {
        self.input.sync(&view.chat.input);

        let [chat_area, upload_area, input_area, status_area] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.chat.render(frame, chat_area, &view.chat);
        upload_panel::render(frame, upload_area, &view.upload);
        self.input.render(frame, input_area);

        let status = match &self.notice {
            Some(notice) => Line::styled(sanitize(notice), Style::default().fg(Color::Yellow)),
            None => Line::styled(STATUS_HINT, Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(status), status_area);

        if self.help_visible {
            render_help(frame, chat_area);
        }
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let height = (HELP.lines().count() as u16 + 2).min(area.height);
    let width = (HELP.lines().map(str::len).max().unwrap_or(0) as u16 + 4).min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(HELP).block(
            Block::default()
                .title(" Help (any key to close) ")
                .borders(Borders::ALL),
        ),
        popup,
    );
}

/// Replaces control characters so server text cannot drive the terminal.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            '\n' => '\n',
            c if c.is_control() => '\u{FFFD}',
            c => c,
        })
        .collect()
}
