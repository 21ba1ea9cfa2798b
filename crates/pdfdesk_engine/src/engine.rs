use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_warn};

use crate::poll::{spawn_status_poller, PollHandle};
use crate::{
    Backend, ClientError, ClientSettings, EngineEvent, EventSink, JobId, ReqwestBackend,
    RequestId, UploadId,
};

enum EngineCommand {
    Query { request_id: RequestId, query: String },
    Upload {
        upload_id: UploadId,
        path: PathBuf,
        file_name: String,
    },
    StartPolling { job_id: JobId },
    StopPolling,
    Download {
        job_id: JobId,
        dir: PathBuf,
        file_name: String,
    },
}

/// Front door to the IO side: commands go in, results come out through the sink.
///
/// Requests run on a tokio runtime owned by a dedicated thread. At most one
/// status poller exists at a time; starting another cancels the previous one.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Engine talking to the real backend over HTTP.
    pub fn connect(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, ClientError> {
        let poll_interval = settings.poll_interval;
        let backend = Arc::new(ReqwestBackend::new(settings)?);
        Self::spawn(backend, poll_interval, sink).map_err(|err| {
            ClientError::new(crate::FailureKind::Network, format!("engine runtime: {err}"))
        })
    }

    pub fn spawn(
        backend: Arc<dyn Backend>,
        poll_interval: Duration,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::Builder::new()
            .name("pdfdesk-engine".to_string())
            .spawn(move || {
                let mut poller: Option<PollHandle> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::StartPolling { job_id } => {
                            if let Some(previous) = poller.take() {
                                engine_debug!("Replacing poller for job {}", previous.job_id());
                            }
                            poller = Some(spawn_status_poller(
                                runtime.handle(),
                                backend.clone(),
                                job_id,
                                poll_interval,
                                sink.clone(),
                            ));
                        }
                        EngineCommand::StopPolling => {
                            if let Some(previous) = poller.take() {
                                engine_debug!("Stopping poller for job {}", previous.job_id());
                            }
                        }
                        command => {
                            let backend = backend.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                handle_request(backend.as_ref(), command, sink.as_ref()).await;
                            });
                        }
                    }
                }
                drop(poller);
                engine_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn submit_query(&self, request_id: RequestId, query: impl Into<String>) {
        self.send(EngineCommand::Query {
            request_id,
            query: query.into(),
        });
    }

    pub fn upload(&self, upload_id: UploadId, path: PathBuf, file_name: impl Into<String>) {
        self.send(EngineCommand::Upload {
            upload_id,
            path,
            file_name: file_name.into(),
        });
    }

    pub fn start_polling(&self, job_id: impl Into<JobId>) {
        self.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn download(&self, job_id: impl Into<JobId>, dir: PathBuf, file_name: impl Into<String>) {
        self.send(EngineCommand::Download {
            job_id: job_id.into(),
            dir,
            file_name: file_name.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_request(backend: &dyn Backend, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::Query { request_id, query } => {
            let result = backend.query(&query).await;
            sink.emit(EngineEvent::QueryCompleted { request_id, result });
        }
        EngineCommand::Upload {
            upload_id,
            path,
            file_name,
        } => {
            let result = backend.upload(&path, &file_name).await;
            sink.emit(EngineEvent::UploadCompleted { upload_id, result });
        }
        EngineCommand::Download {
            job_id,
            dir,
            file_name,
        } => {
            let result = backend.download(&job_id, &dir, &file_name).await;
            sink.emit(EngineEvent::DownloadCompleted { job_id, result });
        }
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling => {}
    }
}
