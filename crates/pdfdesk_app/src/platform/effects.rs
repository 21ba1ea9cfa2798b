use std::sync::{mpsc, Arc};

use engine_logging::{engine_info, engine_warn};
use pdfdesk_core::{Effect, JobStatus, Msg, QueryOutcome, ResultSummary, StatusReport};
use pdfdesk_engine::{
    ClientError, ClientSettings, EngineEvent, EngineHandle, EventSink, QueryReply, StatusResponse,
};

use super::Input;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, input_tx: mpsc::Sender<Input>) -> Result<Self, ClientError> {
        let sink = Arc::new(MsgSink { tx: input_tx });
        let engine = EngineHandle::connect(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitQuery { request_id, query } => {
                    engine_info!("SubmitQuery request_id={} query_len={}", request_id, query.len());
                    self.engine.submit_query(request_id, query);
                }
                Effect::UploadFile { upload_id, file } => {
                    engine_info!(
                        "UploadFile upload_id={} name={} path={:?}",
                        upload_id,
                        file.name,
                        file.path
                    );
                    self.engine.upload(upload_id, file.path, file.name);
                }
                Effect::StartPolling { job_id } => {
                    engine_info!("StartPolling job_id={}", job_id);
                    self.engine.start_polling(job_id);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::DownloadArtifact {
                    job_id,
                    file_name,
                    dir,
                } => {
                    engine_info!("DownloadArtifact job_id={} dir={:?}", job_id, dir);
                    self.engine.download(job_id, dir, file_name);
                }
            }
        }
    }
}

/// Translates engine events into core messages for the main loop.
struct MsgSink {
    tx: mpsc::Sender<Input>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(Input::Engine(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::QueryCompleted { request_id, result } => Msg::QueryCompleted {
            request_id,
            outcome: map_query(result),
        },
        EngineEvent::UploadCompleted { upload_id, result } => match result {
            Ok(receipt) => {
                engine_info!(
                    "Upload {} accepted as job {} (server name {:?})",
                    upload_id,
                    receipt.job_id,
                    receipt.original_filename
                );
                Msg::UploadAccepted {
                    upload_id,
                    job_id: receipt.job_id,
                }
            }
            Err(err) => {
                engine_warn!("Upload {} failed: {}", upload_id, err.kind);
                Msg::UploadFailed {
                    upload_id,
                    message: err.message,
                }
            }
        },
        EngineEvent::StatusPolled { job_id, result } => match result {
            Ok(response) => Msg::StatusReceived {
                job_id,
                report: map_status(response),
            },
            Err(err) => Msg::StatusFailed {
                job_id,
                message: err.message,
            },
        },
        EngineEvent::DownloadCompleted { job_id, result } => {
            if let Err(err) = &result {
                engine_warn!("Download for job {} failed: {}", job_id, err.kind);
            }
            Msg::DownloadFinished(result.map_err(|err| err.message))
        }
    }
}

fn map_query(result: Result<QueryReply, ClientError>) -> QueryOutcome {
    match result {
        Ok(reply) => {
            let response = reply.response.filter(|text| !text.is_empty());
            let error = reply.error.filter(|text| !text.is_empty());
            match (response, error) {
                (Some(text), _) => QueryOutcome::Answer(text),
                (None, Some(text)) => QueryOutcome::ServerError(text),
                (None, None) => QueryOutcome::Missing,
            }
        }
        Err(err) => {
            engine_warn!("Query failed: {}", err.kind);
            QueryOutcome::TransportFailed(err.message)
        }
    }
}

fn map_status(response: StatusResponse) -> StatusReport {
    let result = response.result.unwrap_or_default();
    StatusReport {
        status: JobStatus::parse(&response.status),
        summary: ResultSummary {
            original_filename: response.original_filename,
            extracted_text_length: result.extracted_text_length,
            num_chunks: result.num_chunks,
            summary_length: result.summary_length,
        },
        error: response.error,
    }
}
