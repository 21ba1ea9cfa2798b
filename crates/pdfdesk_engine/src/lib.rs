//! pdfdesk engine: HTTP client for the chat and PDF endpoints, status poller,
//! and effect execution.
mod backend;
mod engine;
mod filename;
mod persist;
mod poll;
mod sink;
mod types;

pub use backend::{Backend, ClientSettings, ReqwestBackend};
pub use engine::EngineHandle;
pub use filename::safe_file_name;
pub use persist::{write_atomic, PersistError, StagedFile};
pub use poll::{spawn_status_poller, PollHandle};
pub use sink::{ChannelEventSink, EventSink};
pub use types::{
    ClientError, EngineEvent, FailureKind, JobId, JobResult, QueryReply, RequestId,
    StatusResponse, UploadId, UploadReceipt,
};
