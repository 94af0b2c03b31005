use super::*;
use crate::test_support::{EnvGuard, env_lock};

use tempfile::tempdir;

#[test]
fn file_store_set_get_remove_roundtrip() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());

    assert!(store.get("current_station").unwrap().is_none());

    store.set("current_station", r#"{"uri":"http://x"}"#).unwrap();
    assert_eq!(
        store.get("current_station").unwrap().as_deref(),
        Some(r#"{"uri":"http://x"}"#)
    );

    store.remove("current_station").unwrap();
    assert!(store.get("current_station").unwrap().is_none());
}

#[test]
fn file_store_remove_of_missing_key_is_ok() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());
    store.remove("never_written").unwrap();
}

#[test]
fn file_store_overwrites_existing_value() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
}

#[test]
fn file_store_keys_cannot_escape_the_directory() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());

    store.set("../evil", "x").unwrap();
    // The blob must land inside the store directory, under a flattened name.
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["___evil.json".to_string()]);
}

#[test]
fn memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert!(store.get("k").unwrap().is_none());
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    store.remove("k").unwrap();
    assert!(store.get("k").unwrap().is_none());
}

#[test]
fn resolve_data_dir_prefers_onda_data_dir() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ONDA_DATA_DIR", "/tmp/onda-test-data");
    assert_eq!(
        resolve_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/onda-test-data")
    );
}

#[test]
fn default_data_dir_prefers_xdg_data_home() {
    let _lock = env_lock();
    let _g0 = EnvGuard::remove("ONDA_DATA_DIR");
    let _g1 = EnvGuard::set("XDG_DATA_HOME", "/tmp/xdg-data-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-data-home").join("onda")
    );
}

#[test]
fn default_data_dir_falls_back_to_home_local_share() {
    let _lock = env_lock();
    let _g0 = EnvGuard::remove("ONDA_DATA_DIR");
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_data_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("share")
            .join("onda")
    );
}
