#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use pdfdesk_engine::{
    Backend, ClientError, EngineEvent, EventSink, QueryReply, StatusResponse, UploadReceipt,
};

pub fn status(raw: &str) -> StatusResponse {
    StatusResponse {
        status: raw.to_string(),
        original_filename: None,
        result: None,
        error: None,
    }
}

/// Backend double that replays queued status replies and counts requests.
#[derive(Default)]
pub struct ScriptedBackend {
    statuses: Mutex<VecDeque<Result<StatusResponse, ClientError>>>,
    status_jobs: Mutex<Vec<String>>,
    status_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn with_statuses(statuses: Vec<Result<StatusResponse, ClientError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.status_delay = delay;
        self
    }

    pub fn status_calls(&self) -> usize {
        self.status_jobs.lock().unwrap().len()
    }

    pub fn status_jobs(&self) -> Vec<String> {
        self.status_jobs.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn query(&self, query: &str) -> Result<QueryReply, ClientError> {
        Ok(QueryReply {
            response: Some(format!("echo: {query}")),
            error: None,
        })
    }

    async fn upload(&self, _path: &Path, file_name: &str) -> Result<UploadReceipt, ClientError> {
        Ok(UploadReceipt {
            job_id: "job-1".to_string(),
            original_filename: Some(file_name.to_string()),
        })
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, ClientError> {
        self.status_jobs.lock().unwrap().push(job_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.status_delay.is_zero() {
            tokio::time::sleep(self.status_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status("processing")))
    }

    async fn download(
        &self,
        _job_id: &str,
        dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ClientError> {
        Ok(dir.join(file_name))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
