mod common;

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use common::ScriptedBackend;
use pdfdesk_engine::{ChannelEventSink, EngineEvent, EngineHandle};

const WAIT: Duration = Duration::from_secs(5);

fn start(backend: Arc<ScriptedBackend>) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::spawn(
        backend,
        Duration::from_millis(20),
        Arc::new(ChannelEventSink::new(tx)),
    )
    .expect("engine");
    (engine, rx)
}

fn drain(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    rx.try_iter().collect()
}

fn polled_jobs(events: &[EngineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::StatusPolled { job_id, .. } => Some(job_id.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn query_and_upload_results_come_back_as_events() {
    let (engine, rx) = start(Arc::new(ScriptedBackend::default()));

    engine.submit_query(7, "hello");
    match rx.recv_timeout(WAIT).expect("query event") {
        EngineEvent::QueryCompleted { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap().response.as_deref(), Some("echo: hello"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.upload(3, PathBuf::from("/tmp/report.pdf"), "report.pdf");
    match rx.recv_timeout(WAIT).expect("upload event") {
        EngineEvent::UploadCompleted { upload_id, result } => {
            assert_eq!(upload_id, 3);
            assert_eq!(result.unwrap().job_id, "job-1");
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.download("job-1", PathBuf::from("/tmp/out"), "processed_report.pdf");
    match rx.recv_timeout(WAIT).expect("download event") {
        EngineEvent::DownloadCompleted { job_id, result } => {
            assert_eq!(job_id, "job-1");
            assert_eq!(result.unwrap(), PathBuf::from("/tmp/out/processed_report.pdf"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn starting_a_new_poller_replaces_the_old_one() {
    let backend = Arc::new(ScriptedBackend::default());
    let (engine, rx) = start(backend.clone());

    engine.start_polling("job-a");
    assert!(rx.recv_timeout(WAIT).is_ok());

    engine.start_polling("job-b");
    thread::sleep(Duration::from_millis(100));
    drain(&rx);

    thread::sleep(Duration::from_millis(200));
    let later = polled_jobs(&drain(&rx));
    assert!(!later.is_empty());
    assert!(later.iter().all(|job| job == "job-b"), "{later:?}");
}

#[test]
fn stop_polling_silences_the_poller() {
    let backend = Arc::new(ScriptedBackend::default());
    let (engine, rx) = start(backend.clone());

    engine.start_polling("job-a");
    assert!(rx.recv_timeout(WAIT).is_ok());

    engine.stop_polling();
    thread::sleep(Duration::from_millis(100));
    drain(&rx);
    let calls = backend.status_calls();

    thread::sleep(Duration::from_millis(200));
    assert!(drain(&rx).is_empty());
    assert_eq!(backend.status_calls(), calls);
}
