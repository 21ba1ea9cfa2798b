use std::fs;
use std::path::Path;

use pdfdesk_engine::{write_atomic, PersistError, StagedFile};
use tempfile::TempDir;

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn staged_download_is_invisible_until_committed() {
    let temp = TempDir::new().unwrap();
    let mut staged = StagedFile::create(temp.path(), "processed_report.pdf").unwrap();
    staged.write_chunk(b"%PDF-1.7\n").unwrap();
    staged.write_chunk(b"summary").unwrap();

    assert_eq!(staged.written(), 16);
    assert!(!temp.path().join("processed_report.pdf").exists());
    let pending = entries(temp.path());
    assert_eq!(pending.len(), 1);
    assert!(pending[0].starts_with(".pdfdesk-") && pending[0].ends_with(".part"));

    let saved = staged.commit().unwrap();

    assert_eq!(saved, temp.path().join("processed_report.pdf"));
    assert_eq!(fs::read(&saved).unwrap(), b"%PDF-1.7\nsummary");
    assert_eq!(entries(temp.path()), vec!["processed_report.pdf".to_string()]);
}

#[test]
fn abandoned_download_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    let mut staged = StagedFile::create(temp.path(), "processed_big.pdf").unwrap();
    staged.write_chunk(&[0u8; 512]).unwrap();

    drop(staged);

    assert!(entries(temp.path()).is_empty());
}

#[test]
fn missing_download_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("downloads").join("2026");

    let saved = write_atomic(&dir, "processed_a.pdf", b"%PDF").unwrap();

    assert_eq!(saved, dir.join("processed_a.pdf"));
    assert!(dir.is_dir());
}

#[test]
fn saving_transcript_twice_replaces_the_first() {
    let temp = TempDir::new().unwrap();

    let first = write_atomic(temp.path(), "chat.html", "<div id=\"chatbox\"></div>").unwrap();
    let second = write_atomic(temp.path(), "chat.html", "<div id=\"chatbox\">later</div>").unwrap();

    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(&second).unwrap(),
        "<div id=\"chatbox\">later</div>"
    );
    assert_eq!(entries(temp.path()), vec!["chat.html".to_string()]);
}

#[test]
fn file_in_place_of_dir_is_reported() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("downloads");
    fs::write(&blocker, "x").unwrap();

    let err = write_atomic(&blocker, "processed_a.pdf", b"data").unwrap_err();

    assert!(matches!(err, PersistError::NotADirectory(ref path) if path == &blocker));
    assert_eq!(err.to_string(), format!("{} is not a directory", blocker.display()));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
