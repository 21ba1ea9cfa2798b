use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use engine_logging::LogDestination;
use log::LevelFilter;
use pdfdesk_engine::ClientSettings;
use serde::Deserialize;

const CONFIG_FILENAME: &str = "pdfdesk.ron";
const CONFIG_PATH_VAR: &str = "PDFDESK_CONFIG";
const SERVER_URL_VAR: &str = "PDFDESK_SERVER_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub server_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    /// Unset means no per-request deadline.
    pub request_timeout_ms: Option<u64>,
    pub max_download_bytes: u64,
    pub download_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            server_url: client.base_url,
            poll_interval_ms: client.poll_interval.as_millis() as u64,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.map(|t| t.as_millis() as u64),
            max_download_bytes: client.max_download_bytes,
            download_dir: PathBuf::from("downloads"),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("pdfdesk.log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            max_download_bytes: self.max_download_bytes,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}

/// Loads `.env`, then the RON config file, then environment overrides.
///
/// Never fails: a missing file yields defaults and an unreadable one yields
/// defaults plus a warning for the caller to log once logging is up.
pub(crate) fn load_config() -> (AppConfig, Option<String>) {
    let _ = dotenv::dotenv();
    let path = env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let (mut config, warning) = read_config_file(&path);
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    (config, warning)
}

pub(crate) fn read_config_file(path: &Path) -> (AppConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (AppConfig::default(), None);
        }
        Err(err) => {
            return (
                AppConfig::default(),
                Some(format!("Failed to read config from {:?}: {}", path, err)),
            );
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => (
            AppConfig::default(),
            Some(format!("Failed to parse config from {:?}: {}", path, err)),
        ),
    }
}

fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(SERVER_URL_VAR).filter(|url| !url.trim().is_empty()) {
        config.server_url = url.trim().to_string();
    }
}
