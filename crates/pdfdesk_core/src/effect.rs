use std::path::PathBuf;

use crate::{JobId, RequestId, SelectedFile, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the query to the answering endpoint.
    SubmitQuery { request_id: RequestId, query: String },
    /// Multipart upload of the selected PDF.
    UploadFile { upload_id: UploadId, file: SelectedFile },
    /// Replace any running poller with one for `job_id`.
    StartPolling { job_id: JobId },
    StopPolling,
    DownloadArtifact {
        job_id: JobId,
        file_name: String,
        dir: PathBuf,
    },
}
