use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::filename::safe_file_name;
use crate::persist::{PersistError, StagedFile};
use crate::types::QueryRequest;
use crate::{ClientError, FailureKind, QueryReply, StatusResponse, UploadReceipt};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin serving `/query` and `/pdf/*`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// `None` leaves requests unbounded, so a hung status check keeps the job polling.
    pub request_timeout: Option<Duration>,
    pub poll_interval: Duration,
    pub max_download_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            poll_interval: Duration::from_secs(2),
            max_download_bytes: 100 * 1024 * 1024,
        }
    }
}

/// The four backend endpoints the widgets talk to.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn query(&self, query: &str) -> Result<QueryReply, ClientError>;

    async fn upload(&self, path: &Path, file_name: &str) -> Result<UploadReceipt, ClientError>;

    async fn status(&self, job_id: &str) -> Result<StatusResponse, ClientError>;

    /// Saves the processed artifact as `{dir}/{file_name}` and returns the written path.
    async fn download(
        &self,
        job_id: &str,
        dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::new(FailureKind::InvalidUrl, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn query(&self, query: &str) -> Result<QueryReply, ClientError> {
        let url = self.endpoint(&["query"])?;
        engine_debug!("POST {} query_len={}", url, query.len());
        let response = self
            .client
            .post(url)
            .json(&QueryRequest { query })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        // The proxy answers failures with `{error}` and a 5xx, so the body is read regardless.
        if !response.status().is_success() {
            engine_warn!("Query endpoint returned {}", response.status());
        }
        decode_json(response).await
    }

    async fn upload(&self, path: &Path, file_name: &str) -> Result<UploadReceipt, ClientError> {
        let url = self.endpoint(&["pdf", "upload"])?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ClientError::new(
                FailureKind::File,
                format!("Could not read {}: {err}", path.display()),
            )
        })?;
        engine_info!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(map_reqwest_error)?;
        let response = self
            .client
            .post(url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("Upload failed: {}", reason(status)),
            ));
        }
        decode_json(response).await
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, ClientError> {
        let url = self.endpoint(&["pdf", "status", job_id])?;
        engine_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("Status check failed: {}", reason(status)),
            ));
        }
        decode_json(response).await
    }

    async fn download(
        &self,
        job_id: &str,
        dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, ClientError> {
        let url = self.endpoint(&["pdf", "download", job_id])?;
        engine_info!("Downloading artifact for job {} from {}", job_id, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("server answered {}", reason(status)),
            ));
        }

        let max_bytes = self.settings.max_download_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "artifact too large",
                ));
            }
        }

        let mut staged = StagedFile::create(dir, &safe_file_name(file_name)).map_err(file_error)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = staged.written() + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ClientError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "artifact too large",
                ));
            }
            staged.write_chunk(&chunk).map_err(file_error)?;
        }
        staged.commit().map_err(file_error)
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
}

fn file_error(err: PersistError) -> ClientError {
    ClientError::new(FailureKind::File, err.to_string())
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown status")
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
