use super::stream::{Spool, is_http_uri, spool_stream};
use super::*;

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::Ordering;

#[test]
fn http_uris_are_classified_case_insensitively() {
    assert!(is_http_uri("http://stream.example/a"));
    assert!(is_http_uri("https://stream.example/a"));
    assert!(is_http_uri("HTTPS://STREAM.EXAMPLE/A"));
    assert!(!is_http_uri("/home/user/music/a.mp3"));
    assert!(!is_http_uri("file:///tmp/a.mp3"));
    assert!(!is_http_uri(""));
}

#[test]
fn spooling_counts_bytes_and_marks_completion() {
    let payload = vec![7u8; 40_000];
    let temp = tempfile::NamedTempFile::new().unwrap();
    let writer = temp.reopen().unwrap();
    let spool = Arc::new(Spool::default());

    spool_stream(Cursor::new(payload.clone()), writer, Arc::clone(&spool));

    assert!(spool.done.load(Ordering::SeqCst));
    assert_eq!(spool.bytes.load(Ordering::SeqCst), payload.len() as u64);
    assert_eq!(std::fs::read(temp.path()).unwrap(), payload);
}

#[test]
fn spooling_stops_when_aborted() {
    let payload = vec![7u8; 1_000_000];
    let temp = tempfile::NamedTempFile::new().unwrap();
    let writer = temp.reopen().unwrap();
    let spool = Arc::new(Spool::default());
    spool.abort.store(true, Ordering::SeqCst);

    spool_stream(Cursor::new(payload), writer, Arc::clone(&spool));

    assert!(spool.done.load(Ordering::SeqCst));
    assert_eq!(spool.bytes.load(Ordering::SeqCst), 0);
}

#[test]
fn creating_a_handle_for_a_missing_file_fails_cleanly() {
    let engine = StreamEngine::new(&crate::config::PlaybackSettings::default());
    let result = engine.create("/definitely/not/a/real/file.mp3");
    assert!(matches!(result, Err(EngineError::Io(_))));
}

#[test]
fn engine_status_defaults_to_silence() {
    let status = EngineStatus::default();
    assert!(!status.playing);
    assert!(!status.buffering);
    assert_eq!(status.position, std::time::Duration::ZERO);
    assert_eq!(status.duration, None);
    assert!(!status.finished);
}
