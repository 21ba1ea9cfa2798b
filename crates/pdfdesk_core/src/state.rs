use std::path::PathBuf;

use crate::view_model::{
    format_with_commas, AppViewModel, ChatMessageView, ChatView, DownloadLink, ResultView,
    Section, UploadView,
};

pub type RequestId = u64;
/// Local tag for one upload attempt, so a late reply from an abandoned upload is recognised.
pub type UploadId = u64;
pub type MessageId = u64;
/// Server-assigned job identifier.
pub type JobId = String;

pub const WELCOME_MESSAGE: &str = "Welcome! Ask me a question about LlamaIndex documentation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    /// Set only on loading placeholders, to find them again on completion.
    pub request_id: Option<RequestId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Builds a selection from a path, taking the last component as the name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    pub fn is_pdf(&self) -> bool {
        self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Uploaded,
    Processing,
    Complete,
    Error,
    /// Anything the backend may add later; polling carries on.
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "uploaded" => JobStatus::Uploaded,
            "processing" => JobStatus::Processing,
            "complete" => JobStatus::Complete,
            "error" => JobStatus::Error,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Uploaded => "uploaded",
            JobStatus::Processing => "processing",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
            JobStatus::Other(raw) => raw,
        }
    }
}

/// Counts reported for a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSummary {
    pub original_filename: Option<String>,
    pub extracted_text_length: Option<u64>,
    pub num_chunks: Option<u64>,
    pub summary_length: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub summary: ResultSummary,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Uploading { upload_id: UploadId, file_name: String },
    Polling { job_id: JobId, status: Option<JobStatus> },
    Complete { job_id: JobId, summary: ResultSummary },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorKind {
    #[default]
    Pending,
    Processing,
}

impl IndicatorKind {
    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Pending => "Pending",
            IndicatorKind::Processing => "Processing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    pub percent: u8,
    pub indicator: IndicatorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatState {
    input: String,
    messages: Vec<ChatMessage>,
    next_message_id: MessageId,
    next_request_id: RequestId,
    scroll_to: Option<MessageId>,
}

impl Default for ChatState {
    fn default() -> Self {
        let mut chat = Self {
            input: String::new(),
            messages: Vec::new(),
            next_message_id: 1,
            next_request_id: 1,
            scroll_to: None,
        };
        chat.append(Role::Agent, WELCOME_MESSAGE.to_string(), None);
        chat
    }
}

impl ChatState {
    fn append(&mut self, role: Role, text: String, request_id: Option<RequestId>) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            request_id,
        });
        self.scroll_to = Some(id);
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UploadState {
    phase: UploadPhase,
    selected: Option<SelectedFile>,
    /// Validation failure shown while the phase stays `Idle`.
    rejection: Option<String>,
    progress: Progress,
    download_note: Option<String>,
}

impl Default for UploadState {
    fn default() -> Self {
        Self {
            phase: UploadPhase::Idle,
            selected: None,
            rejection: None,
            progress: Progress::default(),
            download_note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    chat: ChatState,
    upload: UploadState,
    /// Lives outside `UploadState` so ids keep increasing across resets.
    next_upload_id: UploadId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.chat.messages
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.upload.phase
    }

    /// Job whose id is still meaningful: the one being polled or the finished one.
    pub fn current_job_id(&self) -> Option<&str> {
        match &self.upload.phase {
            UploadPhase::Polling { job_id, .. } | UploadPhase::Complete { job_id, .. } => {
                Some(job_id)
            }
            _ => None,
        }
    }

    pub fn uploading_id(&self) -> Option<UploadId> {
        match &self.upload.phase {
            UploadPhase::Uploading { upload_id, .. } => Some(*upload_id),
            _ => None,
        }
    }

    pub fn polling_job_id(&self) -> Option<&str> {
        match &self.upload.phase {
            UploadPhase::Polling { job_id, .. } => Some(job_id),
            _ => None,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.upload.progress
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ---- chat -----------------------------------------------------------

    pub(crate) fn set_chat_input(&mut self, text: String) {
        self.chat.input = text;
        self.mark_dirty();
    }

    /// Takes the trimmed input, clearing the box. `None` when there is nothing to send.
    pub(crate) fn take_chat_query(&mut self) -> Option<String> {
        let query = self.chat.input.trim().to_string();
        if query.is_empty() {
            return None;
        }
        self.chat.input.clear();
        Some(query)
    }

    /// Appends the user message and its loading placeholder; returns the request id.
    pub(crate) fn begin_query(&mut self, query: String) -> RequestId {
        let request_id = self.chat.next_request_id;
        self.chat.next_request_id += 1;
        self.chat.append(Role::User, query, None);
        self.chat
            .append(Role::Loading, "Processing".to_string(), Some(request_id));
        self.mark_dirty();
        request_id
    }

    pub(crate) fn finish_query(&mut self, request_id: RequestId, role: Role, text: String) {
        self.chat
            .messages
            .retain(|m| !(m.role == Role::Loading && m.request_id == Some(request_id)));
        self.chat.append(role, text, None);
        self.mark_dirty();
    }

    // ---- upload ---------------------------------------------------------

    pub(crate) fn select_file(&mut self, file: Option<SelectedFile>) {
        self.upload.selected = file;
        self.mark_dirty();
    }

    pub(crate) fn selected_file(&self) -> Option<&SelectedFile> {
        self.upload.selected.as_ref()
    }

    pub(crate) fn reject_upload(&mut self, message: &str) {
        self.upload.rejection = Some(message.to_string());
        self.mark_dirty();
    }

    /// Enters `Uploading` under a fresh upload id and returns it.
    pub(crate) fn start_upload(&mut self, file_name: String) -> UploadId {
        self.next_upload_id += 1;
        let upload_id = self.next_upload_id;
        self.upload.rejection = None;
        self.upload.download_note = None;
        self.upload.phase = UploadPhase::Uploading {
            upload_id,
            file_name,
        };
        self.set_progress(10, IndicatorKind::Pending, "Uploading PDF file...".to_string());
        upload_id
    }

    pub(crate) fn start_polling(&mut self, job_id: JobId) {
        self.upload.phase = UploadPhase::Polling {
            job_id,
            status: None,
        };
        self.set_progress(40, IndicatorKind::Processing, "Processing PDF...".to_string());
    }

    pub(crate) fn apply_interim_status(&mut self, status: JobStatus) {
        let percent = match status {
            JobStatus::Uploaded => 50,
            _ => 70,
        };
        let message = format!("Processing PDF... ({})", status.as_str());
        if let UploadPhase::Polling { status: current, .. } = &mut self.upload.phase {
            *current = Some(status);
        }
        self.set_progress(percent, IndicatorKind::Processing, message);
    }

    pub(crate) fn complete_job(&mut self, job_id: JobId, summary: ResultSummary) {
        self.upload.progress.percent = 100;
        self.upload.phase = UploadPhase::Complete { job_id, summary };
        self.mark_dirty();
    }

    /// Single entry point for every failure: selects the error view.
    pub(crate) fn show_error(&mut self, message: String) {
        self.upload.phase = UploadPhase::Failed { message };
        self.mark_dirty();
    }

    pub(crate) fn reset_upload(&mut self) {
        self.upload = UploadState::default();
        self.mark_dirty();
    }

    /// Job id and suggested file name of a finished job.
    pub(crate) fn download_target(&self) -> Option<(JobId, String)> {
        match &self.upload.phase {
            UploadPhase::Complete { job_id, summary } => {
                Some((job_id.clone(), result_view(job_id, summary).download.file_name))
            }
            _ => None,
        }
    }

    pub(crate) fn set_download_note(&mut self, note: String) {
        self.upload.download_note = Some(note);
        self.mark_dirty();
    }

    fn set_progress(&mut self, percent: u8, indicator: IndicatorKind, message: String) {
        self.upload.progress = Progress {
            percent,
            indicator,
            message,
        };
        self.mark_dirty();
    }

    // ---- view -----------------------------------------------------------

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            chat: self.chat_view(),
            upload: self.upload_view(),
        }
    }

    fn chat_view(&self) -> ChatView {
        ChatView {
            input: self.chat.input.clone(),
            messages: self
                .chat
                .messages
                .iter()
                .map(|m| ChatMessageView {
                    id: m.id,
                    role: m.role,
                    text: m.text.clone(),
                })
                .collect(),
            scroll_to: self.chat.scroll_to,
            pending_queries: self
                .chat
                .messages
                .iter()
                .filter(|m| m.role == Role::Loading)
                .count(),
        }
    }

    fn upload_view(&self) -> UploadView {
        let upload = &self.upload;
        let (section, error_message, result) = match (&upload.phase, &upload.rejection) {
            (UploadPhase::Idle, Some(rejection)) => (Section::Error, Some(rejection.clone()), None),
            (UploadPhase::Idle, None) => (Section::Upload, None, None),
            (UploadPhase::Uploading { .. } | UploadPhase::Polling { .. }, _) => {
                (Section::Status, None, None)
            }
            (UploadPhase::Complete { job_id, summary }, _) => {
                (Section::Result, None, Some(result_view(job_id, summary)))
            }
            (UploadPhase::Failed { message }, _) => (Section::Error, Some(message.clone()), None),
        };

        UploadView {
            section,
            selected_file_name: upload.selected.as_ref().map(|f| f.name.clone()),
            job_id: self.current_job_id().map(ToOwned::to_owned),
            indicator: upload.progress.indicator,
            status_message: upload.progress.message.clone(),
            progress_percent: upload.progress.percent,
            result,
            error_message,
            download_note: upload.download_note.clone(),
        }
    }
}

fn result_view(job_id: &str, summary: &ResultSummary) -> ResultView {
    let original_filename = summary
        .original_filename
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let download_name = summary.original_filename.as_deref().unwrap_or("document");
    ResultView {
        original_filename,
        extracted_text: format_with_commas(summary.extracted_text_length.unwrap_or(0)),
        num_chunks: summary.num_chunks.unwrap_or(0).to_string(),
        summary_length: format_with_commas(summary.summary_length.unwrap_or(0)),
        download: DownloadLink {
            href: format!("/pdf/download/{job_id}"),
            file_name: format!("processed_{download_name}"),
        },
    }
}
