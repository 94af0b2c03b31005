use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/onda/config.toml` or `~/.config/onda/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ONDA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub directory: DirectorySettings,
    pub playback: PlaybackSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectorySettings {
    /// Base URL of the radio-browser API server to query.
    pub base_url: String,
    /// User-Agent sent with every directory request; the API asks clients to
    /// identify themselves.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of stations per search.
    pub search_limit: u32,
    /// Ask the directory to filter out stations it knows are dead.
    pub hide_broken: bool,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            base_url: "https://de2.api.radio-browser.info".to_string(),
            user_agent: concat!("onda/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            search_limit: 40,
            hide_broken: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Kilobytes of stream data to buffer before decoding starts.
    pub prefetch_kb: u64,
    /// Interval between engine status notifications (milliseconds).
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            prefetch_kb: 256,
            tick_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the data directory holding the persisted station,
    /// favourites and preferences. Defaults to `$XDG_DATA_HOME/onda`.
    pub data_dir: Option<PathBuf>,
}
