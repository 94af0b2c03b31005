//! Playback session: the one component that owns a live audio stream.
//!
//! `PlaybackSession` keeps at most one engine handle alive, exposes the
//! play/pause/resume/stop/load control surface, mirrors engine notifications
//! into an observable [`PlaybackStatus`], and remembers the last played
//! station across restarts through the injected key-value store.

mod player;
mod types;

pub use player::{CURRENT_STATION_KEY, PlaybackSession, StatusObserver};
pub use types::{PlaybackStatus, SessionPhase, Track};
