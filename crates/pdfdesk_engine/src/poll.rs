use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{Backend, EngineEvent, EventSink, JobId};

/// Owned status poller for one job. Dropping the handle stops the loop.
pub struct PollHandle {
    job_id: JobId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the loop has exited, whether cancelled or after a terminal report.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Starts polling `GET /pdf/status/{job_id}` every `period`, first request one
/// period from now.
///
/// Each tick waits for its request to finish before the next tick is armed, so
/// requests never overlap. The loop ends by itself after a `complete` or
/// `error` report or a failed request; nothing is emitted once cancelled.
pub fn spawn_status_poller(
    runtime: &Handle,
    backend: Arc<dyn Backend>,
    job_id: JobId,
    period: Duration,
    sink: Arc<dyn EventSink>,
) -> PollHandle {
    let cancel = CancellationToken::new();
    let task = runtime.spawn(poll_loop(
        backend,
        job_id.clone(),
        period,
        sink,
        cancel.clone(),
    ));
    engine_info!("Polling job {} every {:?}", job_id, period);
    PollHandle {
        job_id,
        cancel,
        task,
    }
}

async fn poll_loop(
    backend: Arc<dyn Backend>,
    job_id: JobId,
    period: Duration,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = backend.status(&job_id) => result,
        };
        if cancel.is_cancelled() {
            break;
        }

        let finished = match &result {
            Ok(report) => {
                engine_debug!("Job {} status {}", job_id, report.status);
                report.is_terminal()
            }
            Err(err) => {
                engine_warn!("Status check for job {} failed: {}", job_id, err);
                true
            }
        };
        sink.emit(EngineEvent::StatusPolled {
            job_id: job_id.clone(),
            result,
        });
        if finished {
            break;
        }
    }
    engine_debug!("Poller for job {} stopped", job_id);
}
