use crate::{IndicatorKind, JobId, MessageId, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub chat: ChatView,
    pub upload: UploadView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub input: String,
    pub messages: Vec<ChatMessageView>,
    /// Newest message; renderers keep it in view.
    pub scroll_to: Option<MessageId>,
    pub pending_queries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessageView {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
}

impl ChatMessageView {
    /// Speaker prefix, absent for the loading placeholder.
    pub fn label(&self) -> Option<&'static str> {
        match self.role {
            Role::User => Some("You"),
            Role::Agent => Some("LlamaCloud Agent"),
            Role::Error => Some("Error"),
            Role::Loading => None,
        }
    }
}

/// The one visible panel of the upload widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upload,
    Status,
    Result,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub section: Section,
    pub selected_file_name: Option<String>,
    pub job_id: Option<JobId>,
    pub indicator: IndicatorKind,
    pub status_message: String,
    pub progress_percent: u8,
    pub result: Option<ResultView>,
    pub error_message: Option<String>,
    pub download_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub original_filename: String,
    pub extracted_text: String,
    pub num_chunks: String,
    pub summary_length: String,
    pub download: DownloadLink,
}

impl ResultView {
    pub fn detail_lines(&self) -> Vec<String> {
        vec![
            format!("Original File: {}", self.original_filename),
            format!("Text Extracted: {} characters", self.extracted_text),
            format!("Chunks Created: {}", self.num_chunks),
            format!("Summary Length: {} characters", self.summary_length),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    /// Suggested name for the saved file.
    pub file_name: String,
}

pub fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
