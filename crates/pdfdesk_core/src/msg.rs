use std::path::PathBuf;

use crate::{JobId, RequestId, SelectedFile, StatusReport, UploadId};

/// How a chat query ended, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Server replied with a `response` text.
    Answer(String),
    /// Server replied with an `error` text and no `response`.
    ServerError(String),
    /// Server replied, but with neither field.
    Missing,
    /// The request never produced a decodable reply.
    TransportFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the chat input box.
    ChatInputChanged(String),
    /// User pressed Enter or clicked Send.
    ChatSubmitted,
    /// Engine finished a chat query.
    QueryCompleted {
        request_id: RequestId,
        outcome: QueryOutcome,
    },
    /// User picked (or cleared) the file in the upload form.
    FileSelected(Option<SelectedFile>),
    /// User submitted the upload form.
    UploadSubmitted,
    /// Upload endpoint accepted the file and assigned a job.
    UploadAccepted { upload_id: UploadId, job_id: JobId },
    /// Upload endpoint refused the file or could not be reached.
    UploadFailed { upload_id: UploadId, message: String },
    /// One poll tick produced a status report.
    StatusReceived { job_id: JobId, report: StatusReport },
    /// One poll tick failed.
    StatusFailed { job_id: JobId, message: String },
    /// User clicked "Upload another".
    NewUploadClicked,
    /// User clicked "Try again" on the error view.
    RetryClicked,
    /// User asked to save the processed artifact into `dir`.
    DownloadClicked { dir: PathBuf },
    /// Engine finished saving the artifact.
    DownloadFinished(Result<PathBuf, String>),
    NoOp,
}
