//! Audio engine abstraction.
//!
//! The playback session drives an [`AudioEngine`] purely through these
//! traits: it asks for a handle bound to one stream URI, starts and stops it,
//! and listens to its status notifications. The production implementation is
//! [`StreamEngine`]; tests substitute an in-memory fake.

mod stream;

pub use stream::StreamEngine;

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("stream request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("could not open source: {0}")]
    Io(#[from] std::io::Error),
}

/// One status notification from a live engine handle.
///
/// Emitted at a cadence the engine chooses; the session recomputes its
/// observable status from every event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineStatus {
    pub playing: bool,
    pub buffering: bool,
    pub position: Duration,
    /// `None` for live streams that never report a total length.
    pub duration: Option<Duration>,
    /// True exactly once, when the source ran out on its own.
    pub finished: bool,
}

/// Display metadata handed to the platform's media controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlsMetadata {
    pub title: String,
    pub artist: String,
    pub album_title: String,
    pub artwork_url: Option<String>,
}

/// Lock-screen / desktop media-control surface. Engines without one simply
/// never call it.
pub trait ForegroundControls: Send + Sync {
    fn show(&self, metadata: &ControlsMetadata);
    fn clear(&self);
}

// Send without Sync: listeners live behind a mutex, which already
// serializes calls, and channel senders are not Sync.
pub type StatusCallback = Box<dyn Fn(EngineStatus) + Send>;

pub trait AudioEngine {
    /// Build a handle bound to `uri`. A failed build must not leak resources;
    /// the caller never receives a half-constructed handle.
    fn create(&self, uri: &str) -> Result<Box<dyn EngineHandle>, EngineError>;
}

pub trait EngineHandle: Send {
    fn play(&self);
    fn pause(&self);
    /// Stop and release the underlying resources. Releasing an already
    /// released handle is a no-op.
    fn remove(&self);
    /// Install the single status listener for this handle. Later calls
    /// replace the listener.
    fn subscribe(&self, on_status: StatusCallback);
    /// Optional capability: surface or withdraw media controls describing the
    /// current track. The default does nothing, which is the correct
    /// behaviour for engines without a control surface.
    fn set_foreground_controls(&self, active: bool, metadata: &ControlsMetadata) {
        let _ = (active, metadata);
    }
}

#[cfg(test)]
mod tests;
