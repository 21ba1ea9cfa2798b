use pdfdesk_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn download_result_without_finished_job_only_records_note() {
    let (mut next, effects) = update(
        AppState::new(),
        Msg::DownloadFinished(Err("server answered Not Found".to_string())),
    );

    assert!(effects.is_empty());
    assert!(next.consume_dirty());
    assert_eq!(
        next.view().upload.download_note.as_deref(),
        Some("Download failed: server answered Not Found")
    );
}
