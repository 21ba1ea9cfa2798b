//! pdfdesk core: pure chat and upload/poll state machine plus view-model helpers.
mod effect;
mod markup;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use markup::{escape_html, render_chat_html, render_message_html};
pub use msg::{Msg, QueryOutcome};
pub use state::{
    AppState, ChatMessage, IndicatorKind, JobId, JobStatus, MessageId, Progress, RequestId,
    ResultSummary, Role, SelectedFile, StatusReport, UploadId, UploadPhase, WELCOME_MESSAGE,
};
pub use update::update;
pub use view_model::{
    format_with_commas, AppViewModel, ChatMessageView, ChatView, DownloadLink, ResultView,
    Section, UploadView,
};
