use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use crate::test_support::{EnvGuard, env_lock};

#[test]
fn resolve_config_path_prefers_onda_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ONDA_CONFIG_PATH", "/tmp/onda-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/onda-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("onda")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("onda")
            .join("config.toml")
    );
}

#[test]
fn settings_default_to_the_public_directory() {
    let s = Settings::default();
    assert_eq!(s.directory.base_url, "https://de2.api.radio-browser.info");
    assert!(s.directory.user_agent.starts_with("onda/"));
    assert_eq!(s.directory.search_limit, 40);
    assert!(s.directory.hide_broken);
    assert_eq!(s.playback.prefetch_kb, 256);
    assert_eq!(s.playback.tick_ms, 500);
    assert!(s.storage.data_dir.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[directory]
base_url = "https://nl1.api.radio-browser.info"
user_agent = "onda-test/0"
timeout_secs = 5
search_limit = 10
hide_broken = false

[playback]
prefetch_kb = 64
tick_ms = 250

[storage]
data_dir = "/tmp/onda-data"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ONDA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ONDA__DIRECTORY__BASE_URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.directory.base_url, "https://nl1.api.radio-browser.info");
    assert_eq!(s.directory.user_agent, "onda-test/0");
    assert_eq!(s.directory.timeout_secs, 5);
    assert_eq!(s.directory.search_limit, 10);
    assert!(!s.directory.hide_broken);
    assert_eq!(s.playback.prefetch_kb, 64);
    assert_eq!(s.playback.tick_ms, 250);
    assert_eq!(
        s.storage.data_dir,
        Some(std::path::PathBuf::from("/tmp/onda-data"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
tick_ms = 500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ONDA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ONDA__PLAYBACK__TICK_MS", "100");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_ms, 100);
}

#[test]
fn validate_rejects_zero_intervals() {
    let mut s = Settings::default();
    s.playback.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.directory.timeout_secs = 0;
    assert!(s.validate().is_err());
}
