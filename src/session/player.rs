use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::{AudioEngine, ControlsMetadata, EngineHandle, EngineStatus, StatusCallback};
use crate::store::SharedStore;

use super::types::{PlaybackStatus, SessionPhase, Track};

/// Store key for the last played station blob.
pub const CURRENT_STATION_KEY: &str = "current_station";

pub type StatusObserver = Box<dyn Fn(&PlaybackStatus) + Send>;

#[derive(Default)]
struct SessionShared {
    status: PlaybackStatus,
    phase: SessionPhase,
    error: Option<String>,
}

/// Owns the single live engine handle and the observable playback state.
///
/// Created once at startup with its collaborators injected, and driven from
/// one thread (the runtime loop). Engine notifications arrive on whatever
/// thread the engine uses; they only touch the shared status, guarded by a
/// handle-generation check so a released handle's late events are dropped.
///
/// Operations never fail outward: every error is recovered locally and
/// surfaced through [`PlaybackSession::last_error`] as a short, presentable
/// message.
pub struct PlaybackSession {
    engine: Box<dyn AudioEngine>,
    store: SharedStore,
    current: Option<Track>,
    handle: Option<Box<dyn EngineHandle>>,
    shared: Arc<Mutex<SessionShared>>,
    observers: Arc<Mutex<Vec<(u64, StatusObserver)>>>,
    /// Generation of the live handle. Bumped before every release, so a
    /// listener created for an older handle can tell it is stale.
    live_generation: Arc<AtomicU64>,
    next_observer_id: u64,
}

impl PlaybackSession {
    pub fn new(engine: Box<dyn AudioEngine>, store: SharedStore) -> Self {
        Self {
            engine,
            store,
            current: None,
            handle: None,
            shared: Arc::new(Mutex::new(SessionShared::default())),
            observers: Arc::new(Mutex::new(Vec::new())),
            live_generation: Arc::new(AtomicU64::new(0)),
            next_observer_id: 0,
        }
    }

    /// Read the persisted last-played track, without starting playback.
    ///
    /// Missing, unreadable or corrupt blobs all come back as `None`; the
    /// latter two additionally surface an advisory error.
    pub fn restore(&mut self) -> Option<Track> {
        self.clear_error();
        let raw = match self.store.get(CURRENT_STATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.current = None;
                return None;
            }
            Err(e) => {
                warn!("could not read saved station: {e}");
                self.set_error("Failed to load saved station");
                self.current = None;
                return None;
            }
        };

        match serde_json::from_str::<Track>(&raw) {
            Ok(track) => {
                debug!(uri = %track.uri, "restored last played station");
                self.current = Some(track.clone());
                Some(track)
            }
            Err(e) => {
                warn!("discarding unreadable saved station: {e}");
                self.set_error("Failed to load saved station");
                self.current = None;
                None
            }
        }
    }

    /// Bind a new engine handle to `track` without persisting or playing.
    ///
    /// Any previous handle is paused and released first; there is never a
    /// moment with two live handles. The status readout is reset before the
    /// new handle can emit, so observers never see the old track's position.
    pub fn load(&mut self, track: Track) {
        self.clear_error();
        if track.uri.is_empty() {
            // Callers are expected to filter these out; an empty locator is
            // never handed to the engine.
            self.set_error("Station has no stream URL");
            return;
        }

        self.release_handle();
        self.reset_status();

        match self.engine.create(&track.uri) {
            Ok(handle) => {
                let generation = self.live_generation.load(Ordering::SeqCst);
                handle.subscribe(self.status_listener(generation));
                self.handle = Some(handle);
                self.current = Some(track);
                self.set_phase(SessionPhase::Loaded);
            }
            Err(e) => {
                warn!(uri = %track.uri, "engine rejected stream: {e}");
                self.set_error("Could not play station");
                self.set_phase(SessionPhase::Idle);
            }
        }
    }

    /// Load `track`, remember it as the last played station, and start it.
    ///
    /// Persisting is best-effort: a store failure is logged and surfaced as
    /// an advisory error, and playback proceeds regardless.
    pub fn play(&mut self, track: Track) {
        self.load(track);
        if self.handle.is_none() {
            // load already surfaced the failure.
            return;
        }
        self.persist_current();
        self.start_loaded();
    }

    /// `play` without a new track: resume the loaded handle, or rebuild one
    /// for the restored track when none exists yet. No-op without a current
    /// track.
    pub fn resume(&mut self) {
        if self.handle.is_some() {
            self.clear_error();
            self.start_loaded();
            return;
        }
        let Some(track) = self.current.clone() else {
            return;
        };
        self.load(track);
        if self.handle.is_some() {
            self.start_loaded();
        }
    }

    /// Pause the live handle and withdraw media controls. No-op when idle.
    pub fn pause(&mut self) {
        let Some(handle) = &self.handle else {
            return;
        };
        handle.pause();
        handle.set_foreground_controls(false, &self.controls_metadata());
        self.set_phase(SessionPhase::Paused);
    }

    /// Pause and rewind the readout. The handle stays loaded so `resume`
    /// stays cheap; only `load` and `clear_persisted` release it.
    pub fn stop(&mut self) {
        let Some(handle) = &self.handle else {
            return;
        };
        handle.pause();
        handle.set_foreground_controls(false, &self.controls_metadata());
        if let Ok(mut s) = self.shared.lock() {
            s.status.position = Duration::ZERO;
        }
        self.set_phase(SessionPhase::Paused);
    }

    /// Live streams are not seekable. This adjusts only the reported
    /// position so a display can move; the engine and the audible stream are
    /// untouched.
    pub fn seek(&mut self, position: Duration) {
        warn!("seek is unsupported for streamed sources; updating displayed position only");
        if let Ok(mut s) = self.shared.lock() {
            s.status.position = position;
        }
    }

    /// Forget the persisted station and drop back to idle, releasing any
    /// live handle.
    pub fn clear_persisted(&mut self) {
        self.clear_error();
        if let Err(e) = self.store.remove(CURRENT_STATION_KEY) {
            warn!("could not clear saved station: {e}");
            self.set_error("Failed to clear saved station");
        }
        self.release_handle();
        self.current = None;
        self.reset_status();
        self.set_phase(SessionPhase::Idle);
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.shared.lock().map(|s| s.status.clone()).unwrap_or_default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.shared.lock().map(|s| s.phase).unwrap_or_default()
    }

    /// Advisory error from the most recent operation, already phrased for
    /// display.
    pub fn last_error(&self) -> Option<String> {
        self.shared.lock().ok().and_then(|s| s.error.clone())
    }

    /// Register a status observer; it fires on every engine notification.
    /// Returns an id for [`PlaybackSession::unsubscribe`].
    pub fn subscribe(&mut self, observer: StatusObserver) -> u64 {
        self.next_observer_id += 1;
        let id = self.next_observer_id;
        if let Ok(mut obs) = self.observers.lock() {
            obs.push((id, observer));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: u64) {
        if let Ok(mut obs) = self.observers.lock() {
            obs.retain(|(oid, _)| *oid != id);
        }
    }

    /// Listener installed on each new handle. Events race with teardown, so
    /// the generation captured at subscription time is checked against the
    /// live one before anything is touched.
    fn status_listener(&self, generation: u64) -> StatusCallback {
        let shared = Arc::clone(&self.shared);
        let observers = Arc::clone(&self.observers);
        let live = Arc::clone(&self.live_generation);
        Box::new(move |event: EngineStatus| {
            if live.load(Ordering::SeqCst) != generation {
                // Late notification from a handle that was already released.
                return;
            }
            let snapshot = {
                let Ok(mut s) = shared.lock() else { return };
                s.status.playing = event.playing;
                s.status.buffering = event.buffering;
                s.status.position = event.position;
                s.status.duration = event.duration.unwrap_or_default();
                if event.finished {
                    // The source ran out on its own: park as paused at the
                    // start. There is no queue to advance to.
                    s.status.playing = false;
                    s.status.position = Duration::ZERO;
                    s.phase = SessionPhase::Paused;
                }
                s.status.clone()
            };
            if let Ok(obs) = observers.lock() {
                for (_, cb) in obs.iter() {
                    cb(&snapshot);
                }
            }
        })
    }

    fn start_loaded(&mut self) {
        let Some(handle) = &self.handle else {
            return;
        };
        handle.play();
        handle.set_foreground_controls(true, &self.controls_metadata());
        self.set_phase(SessionPhase::Playing);
    }

    fn persist_current(&mut self) {
        let Some(track) = &self.current else {
            return;
        };
        let raw = match serde_json::to_string(track) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not serialize station: {e}");
                self.set_error("Failed to save station");
                return;
            }
        };
        if let Err(e) = self.store.set(CURRENT_STATION_KEY, &raw) {
            warn!("could not save station: {e}");
            self.set_error("Failed to save station");
        }
    }

    /// Invalidate the current generation, then tear the handle down. The
    /// bump comes first so a callback racing with teardown is dropped.
    fn release_handle(&mut self) {
        self.live_generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.pause();
            handle.remove();
        }
    }

    fn controls_metadata(&self) -> ControlsMetadata {
        let track = self.current.as_ref();
        ControlsMetadata {
            title: track
                .and_then(|t| t.title.clone())
                .unwrap_or_else(|| "Audio".to_string()),
            artist: track
                .and_then(|t| t.artist.clone())
                .unwrap_or_else(|| "onda".to_string()),
            album_title: "Radio".to_string(),
            artwork_url: track.and_then(|t| t.artwork.clone()),
        }
    }

    fn reset_status(&self) {
        if let Ok(mut s) = self.shared.lock() {
            s.status = PlaybackStatus::default();
        }
    }

    fn set_phase(&self, phase: SessionPhase) {
        if let Ok(mut s) = self.shared.lock() {
            s.phase = phase;
        }
    }

    fn set_error(&self, message: &str) {
        if let Ok(mut s) = self.shared.lock() {
            s.error = Some(message.to_string());
        }
    }

    fn clear_error(&self) {
        if let Ok(mut s) = self.shared.lock() {
            s.error = None;
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release_handle();
    }
}
