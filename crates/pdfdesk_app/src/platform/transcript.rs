use std::path::{Path, PathBuf};

use chrono::Utc;
use pdfdesk_core::{render_chat_html, ChatView};
use pdfdesk_engine::{write_atomic, PersistError};

/// Writes the chat panel as an escaped HTML fragment.
pub(crate) fn save_transcript(path: &Path, chat: &ChatView) -> Result<PathBuf, PersistError> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript.html".to_string());

    let content = format!(
        "<!-- pdfdesk transcript saved {} -->\n{}",
        Utc::now().to_rfc3339(),
        render_chat_html(chat)
    );
    write_atomic(dir, &file_name, content)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pdfdesk_core::{update, AppState, Msg, QueryOutcome};
    use tempfile::TempDir;

    use super::save_transcript;

    #[test]
    fn transcript_is_escaped_html() {
        let (state, _) = update(AppState::new(), Msg::ChatInputChanged("a < b?".to_string()));
        let (state, _) = update(state, Msg::ChatSubmitted);
        let (state, _) = update(
            state,
            Msg::QueryCompleted {
                request_id: 1,
                outcome: QueryOutcome::Answer("yes & no".to_string()),
            },
        );
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("logs").join("chat.html");

        let written = save_transcript(&target, &state.view().chat).unwrap();

        assert_eq!(written, target);
        let html = fs::read_to_string(&written).unwrap();
        assert!(html.starts_with("<!-- pdfdesk transcript saved "));
        assert!(html.contains("<strong>You:</strong> a &lt; b?"));
        assert!(html.contains("<strong>LlamaCloud Agent:</strong> yes &amp; no"));
    }
}
