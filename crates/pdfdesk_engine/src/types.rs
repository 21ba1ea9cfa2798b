use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type JobId = String;
pub type RequestId = u64;
pub type UploadId = u64;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub query: &'a str,
}

/// Body of `POST /query`. Either field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct QueryReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a successful `POST /pdf/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub job_id: JobId,
    #[serde(default)]
    pub original_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub extracted_text_length: Option<u64>,
    #[serde(default)]
    pub num_chunks: Option<u64>,
    #[serde(default)]
    pub summary_length: Option<u64>,
}

/// Body of `GET /pdf/status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub result: Option<JobResult>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusResponse {
    /// `complete` and `error` end the polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "complete" | "error")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    QueryCompleted {
        request_id: RequestId,
        result: Result<QueryReply, ClientError>,
    },
    UploadCompleted {
        upload_id: UploadId,
        result: Result<UploadReceipt, ClientError>,
    },
    StatusPolled {
        job_id: JobId,
        result: Result<StatusResponse, ClientError>,
    },
    DownloadCompleted {
        job_id: JobId,
        result: Result<PathBuf, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ClientError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Body was not the JSON we expected.
    Decode,
    /// Local file could not be read or written.
    File,
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::File => write!(f, "file error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
