//! The upload widget: exactly one of the form, status, result or error sections.

use pdfdesk_core::{IndicatorKind, Section, UploadView};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::render::sanitize;

pub fn render(frame: &mut Frame, area: Rect, view: &UploadView) {
    let (title, color) = match (view.section, &view.job_id) {
        (Section::Upload, _) => (" Upload PDF ".to_string(), Color::Reset),
        (Section::Status, Some(job_id)) => (format!(" Job {} ", sanitize(job_id)), Color::Reset),
        (Section::Status, None) => (" Uploading ".to_string(), Color::Reset),
        (Section::Result, _) => (" Processing complete ".to_string(), Color::Green),
        (Section::Error, _) => (" Error ".to_string(), Color::Red),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    if view.section != Section::Status {
        let lines: Vec<Line> = upload_lines(view).into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [message_area, gauge_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    let lines: Vec<Line> = upload_lines(view).into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), message_area);

    let gauge_color = match view.indicator {
        IndicatorKind::Pending => Color::Yellow,
        IndicatorKind::Processing => Color::Blue,
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .percent(u16::from(view.progress_percent.min(100)))
        .label(format!("{}%", view.progress_percent));
    frame.render_widget(gauge, gauge_area);
}

/// Text rows of the visible section. The status section adds a gauge below.
pub fn upload_lines(view: &UploadView) -> Vec<String> {
    let mut lines = Vec::new();
    match view.section {
        Section::Upload => {
            lines.push(match &view.selected_file_name {
                Some(name) => format!("Selected: {}", sanitize(name)),
                None => "No file selected.".to_string(),
            });
            lines.push("Type :upload <file.pdf> to upload a PDF.".to_string());
        }
        Section::Status => {
            lines.push(format!(
                "{}: {}",
                view.indicator.label(),
                sanitize(&view.status_message)
            ));
        }
        Section::Result => {
            if let Some(result) = &view.result {
                lines.extend(result.detail_lines().iter().map(|line| sanitize(line)));
                lines.push(format!(
                    "Download: {} as {}",
                    sanitize(&result.download.href),
                    sanitize(&result.download.file_name)
                ));
            }
            if let Some(note) = &view.download_note {
                lines.push(sanitize(note));
            }
            lines.push("Type :download [dir] to save it, :new to upload another PDF.".to_string());
        }
        Section::Error => {
            lines.push(sanitize(view.error_message.as_deref().unwrap_or_default()));
            if let Some(name) = &view.selected_file_name {
                lines.push(format!("File: {}", sanitize(name)));
            }
            lines.push("Type :retry to start over.".to_string());
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdesk_core::{update, AppState, JobStatus, Msg, ResultSummary, SelectedFile, StatusReport};
    use pretty_assertions::assert_eq;

    fn submitted(path: &str) -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::FileSelected(Some(SelectedFile::from_path(path))),
        );
        let (state, _) = update(state, Msg::UploadSubmitted);
        state
    }

    #[test]
    fn rejected_file_is_named_in_error_section() {
        let view = submitted("/tmp/notes.txt").view().upload;

        assert_eq!(
            upload_lines(&view),
            vec![
                "Please select a valid PDF file.".to_string(),
                "File: notes.txt".to_string(),
                "Type :retry to start over.".to_string(),
            ]
        );
    }

    #[test]
    fn status_section_shows_indicator_and_message() {
        let view = submitted("/tmp/a.pdf").view().upload;

        assert_eq!(upload_lines(&view), vec!["Pending: Uploading PDF file...".to_string()]);
    }

    #[test]
    fn result_section_lists_details_and_download() {
        let state = submitted("/tmp/a.pdf");
        let upload_id = state.uploading_id().unwrap();
        let (state, _) = update(
            state,
            Msg::UploadAccepted {
                upload_id,
                job_id: "j9".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::StatusReceived {
                job_id: "j9".to_string(),
                report: StatusReport {
                    status: JobStatus::Complete,
                    summary: ResultSummary {
                        original_filename: Some("a.pdf".to_string()),
                        extracted_text_length: Some(1_234_567),
                        num_chunks: Some(42),
                        summary_length: Some(890),
                    },
                    error: None,
                },
            },
        );

        assert_eq!(
            upload_lines(&state.view().upload),
            vec![
                "Original File: a.pdf".to_string(),
                "Text Extracted: 1,234,567 characters".to_string(),
                "Chunks Created: 42".to_string(),
                "Summary Length: 890 characters".to_string(),
                "Download: /pdf/download/j9 as processed_a.pdf".to_string(),
                "Type :download [dir] to save it, :new to upload another PDF.".to_string(),
            ]
        );
    }
}
