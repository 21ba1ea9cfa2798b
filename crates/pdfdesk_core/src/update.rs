use engine_logging::engine_debug;

use crate::{AppState, Effect, JobStatus, Msg, QueryOutcome, Role, UploadPhase};

const NO_RESPONSE: &str = "No response received";
const NO_FILE: &str = "Please select a PDF file to upload.";
const NOT_A_PDF: &str = "Please select a valid PDF file.";
const UNKNOWN_PROCESSING_ERROR: &str = "An unknown error occurred during processing.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ChatInputChanged(text) => {
            state.set_chat_input(text);
            Vec::new()
        }
        Msg::ChatSubmitted => match state.take_chat_query() {
            Some(query) => {
                let request_id = state.begin_query(query.clone());
                vec![Effect::SubmitQuery { request_id, query }]
            }
            None => Vec::new(),
        },
        Msg::QueryCompleted {
            request_id,
            outcome,
        } => {
            let (role, text) = match outcome {
                QueryOutcome::Answer(text) => (Role::Agent, text),
                QueryOutcome::ServerError(text) | QueryOutcome::TransportFailed(text) => {
                    (Role::Error, text)
                }
                QueryOutcome::Missing => (Role::Error, NO_RESPONSE.to_string()),
            };
            state.finish_query(request_id, role, text);
            Vec::new()
        }
        Msg::FileSelected(file) => {
            state.select_file(file);
            Vec::new()
        }
        Msg::UploadSubmitted => submit_upload(&mut state),
        Msg::UploadAccepted { upload_id, job_id } => {
            if state.uploading_id() != Some(upload_id) {
                engine_debug!("Ignoring job {} from abandoned upload {}", job_id, upload_id);
                return (state, Vec::new());
            }
            state.start_polling(job_id.clone());
            vec![Effect::StopPolling, Effect::StartPolling { job_id }]
        }
        Msg::UploadFailed { upload_id, message } => {
            if state.uploading_id() != Some(upload_id) {
                engine_debug!("Ignoring failure of abandoned upload {}", upload_id);
                return (state, Vec::new());
            }
            state.show_error(format!("Failed to upload PDF: {message}"));
            Vec::new()
        }
        Msg::StatusReceived { job_id, report } => {
            if state.polling_job_id() != Some(job_id.as_str()) {
                engine_debug!("Ignoring stale status report for job {}", job_id);
                return (state, Vec::new());
            }
            match report.status {
                JobStatus::Uploaded | JobStatus::Processing => {
                    state.apply_interim_status(report.status);
                    Vec::new()
                }
                JobStatus::Complete => {
                    state.complete_job(job_id, report.summary);
                    vec![Effect::StopPolling]
                }
                JobStatus::Error => {
                    let message = report
                        .error
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| UNKNOWN_PROCESSING_ERROR.to_string());
                    state.show_error(message);
                    vec![Effect::StopPolling]
                }
                JobStatus::Other(raw) => {
                    engine_debug!("Job {} reported unrecognised status {:?}", job_id, raw);
                    Vec::new()
                }
            }
        }
        Msg::StatusFailed { job_id, message } => {
            if state.polling_job_id() != Some(job_id.as_str()) {
                return (state, Vec::new());
            }
            state.show_error(format!("Failed to check processing status: {message}"));
            vec![Effect::StopPolling]
        }
        Msg::NewUploadClicked | Msg::RetryClicked => {
            state.reset_upload();
            vec![Effect::StopPolling]
        }
        Msg::DownloadClicked { dir } => match state.download_target() {
            Some((job_id, file_name)) => vec![Effect::DownloadArtifact {
                job_id,
                file_name,
                dir,
            }],
            None => Vec::new(),
        },
        Msg::DownloadFinished(result) => {
            let note = match result {
                Ok(path) => format!("Saved to {}", path.display()),
                Err(message) => format!("Download failed: {message}"),
            };
            state.set_download_note(note);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_upload(state: &mut AppState) -> Vec<Effect> {
    if !matches!(state.phase(), UploadPhase::Idle) {
        return Vec::new();
    }
    let Some(file) = state.selected_file().cloned() else {
        state.reject_upload(NO_FILE);
        return Vec::new();
    };
    if !file.is_pdf() {
        state.reject_upload(NOT_A_PDF);
        return Vec::new();
    }
    let upload_id = state.start_upload(file.name.clone());
    vec![Effect::UploadFile { upload_id, file }]
}
