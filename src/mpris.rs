//! MPRIS media-controls sidecar.
//!
//! Exposes `org.mpris.MediaPlayer2.onda` on the session bus so desktop
//! media keys and `playerctl` can drive playback. Inbound commands are
//! forwarded to the runtime over a channel; outbound state arrives through
//! [`MprisHandle`], which doubles as the engine's foreground-controls
//! capability.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::engine::{ControlsMetadata, ForegroundControls};
use crate::session::SessionPhase;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
}

#[derive(Debug, Default)]
struct SharedState {
    phase: SessionPhase,
    active: bool,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    art_url: Option<String>,
}

#[derive(Clone)]
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, phase: SessionPhase) {
        if let Ok(mut s) = self.state.lock() {
            s.phase = phase;
        }
    }
}

impl ForegroundControls for MprisHandle {
    fn show(&self, metadata: &ControlsMetadata) {
        if let Ok(mut s) = self.state.lock() {
            s.active = true;
            s.title = Some(metadata.title.clone());
            s.artist = Some(metadata.artist.clone());
            s.album = Some(metadata.album_title.clone());
            s.art_url = metadata.artwork_url.clone();
        }
    }

    fn clear(&self) {
        if let Ok(mut s) = self.state.lock() {
            s.active = false;
            s.title = None;
            s.artist = None;
            s.album = None;
            s.art_url = None;
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for a terminal player.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "onda"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        // NOTE: This returns a &'static str; we map state into static strings.
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.phase {
            SessionPhase::Playing => "Playing",
            SessionPhase::Paused => "Paused",
            SessionPhase::Idle | SessionPhase::Loaded => "Stopped",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        // Live streams are not seekable; say so instead of ignoring Seek.
        false
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };
        if !s.active {
            return map;
        }

        let mut put = |key: &str, value: Option<&String>| {
            if let Some(v) = value {
                if let Ok(owned) = OwnedValue::try_from(Value::from(v.clone())) {
                    map.insert(key.to_string(), owned);
                }
            }
        };
        put("xesam:title", s.title.as_ref());
        put("xesam:album", s.album.as_ref());
        put("mpris:artUrl", s.art_url.as_ref());
        drop(put);

        if let Some(artist) = s.artist.as_ref() {
            if let Ok(owned) = OwnedValue::try_from(Value::from(vec![artist.clone()])) {
                map.insert("xesam:artist".to_string(), owned);
            }
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name("org.mpris.MediaPlayer2.onda").await {
                warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
