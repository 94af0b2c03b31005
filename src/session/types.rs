//! Session-level value types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A playable item.
///
/// `uri` is an opaque stream locator; it is never validated beyond being
/// non-empty. `station` carries the originating directory record through the
/// session untouched, so the UI can get back to the full station entry from a
/// restored track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<serde_json::Value>,
}

impl Track {
    /// Bare track with nothing but a stream locator.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: None,
            artist: None,
            artwork: None,
            station: None,
        }
    }
}

/// Where the session stands with respect to its engine handle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No engine handle. A restored track may still be present for display.
    #[default]
    Idle,
    /// A handle exists but playback has not been requested since loading.
    Loaded,
    Playing,
    Paused,
}

/// Live playback readout, recomputed on every engine notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackStatus {
    pub playing: bool,
    pub buffering: bool,
    /// Monotonic within a track; reset to zero on track switch and stop.
    pub position: Duration,
    /// Zero until the engine reports a length. Live streams may never do.
    pub duration: Duration,
}
