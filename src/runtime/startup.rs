use std::sync::{Arc, mpsc};

use tracing::{info, warn};

use crate::config::Settings;
use crate::directory::{DirectoryClient, StationQuery};
use crate::engine::StreamEngine;
use crate::mpris::MprisHandle;
use crate::prefs::{Favourites, UserPrefs};
use crate::session::{PlaybackSession, PlaybackStatus, Track};
use crate::store::{FileStore, MemoryStore, SharedStore};

/// Everything the event loop drives, built once at startup.
pub struct Services {
    pub session: PlaybackSession,
    pub favourites: Favourites,
    pub prefs: UserPrefs,
    pub directory: DirectoryClient,
    /// Session status updates, forwarded out of the observer callback so the
    /// loop can drain them at its own pace.
    pub status_rx: mpsc::Receiver<PlaybackStatus>,
}

pub fn build(settings: &Settings, mpris: MprisHandle) -> Services {
    let store = open_store(settings);
    let engine = StreamEngine::new(&settings.playback).with_controls(Arc::new(mpris));
    let mut session = PlaybackSession::new(Box::new(engine), Arc::clone(&store));

    let (status_tx, status_rx) = mpsc::channel();
    session.subscribe(Box::new(move |status| {
        let _ = status_tx.send(status.clone());
    }));

    Services {
        session,
        favourites: Favourites::new(Arc::clone(&store)),
        prefs: UserPrefs::new(Arc::clone(&store)),
        directory: DirectoryClient::new(&settings.directory),
        status_rx,
    }
}

fn open_store(settings: &Settings) -> SharedStore {
    if let Some(dir) = &settings.storage.data_dir {
        return Arc::new(FileStore::new(dir.clone()));
    }
    match FileStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("falling back to in-memory storage: {e}");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Bring back the last played station for display; audio stays off until the
/// user asks for it.
pub fn restore_last_station(services: &mut Services) {
    if let Some(track) = services.session.restore() {
        let name = track.title.as_deref().unwrap_or(track.uri.as_str());
        eprintln!("onda: last played {name} (press space to resume)");
    }
}

/// Resolve the CLI argument: a direct stream URL plays as-is, a directory
/// uuid is looked up, and anything else is a search narrowed by the saved
/// country/language preferences.
pub fn play_target(services: &mut Services, target: &str) {
    if target.starts_with("http://") || target.starts_with("https://") {
        services.session.play(Track::from_uri(target));
        return;
    }

    if looks_like_uuid(target) {
        match services.directory.by_uuid(target) {
            Ok(Some(station)) => {
                info!(name = %station.name, "playing station by uuid");
                services.session.play(station.to_track());
            }
            Ok(None) => eprintln!("onda: no station with uuid '{target}'"),
            Err(e) => {
                warn!("station lookup failed: {e}");
                eprintln!("onda: could not load radio stations, check the network or the directory");
            }
        }
        return;
    }

    let query = StationQuery {
        name: Some(target.to_string()),
        country_code: services.prefs.country_code(),
        language_codes: services.prefs.language_code(),
        tag: None,
    };
    match services.directory.search(&query) {
        Ok(stations) => match stations.first() {
            Some(station) => {
                info!(name = %station.name, uuid = %station.stationuuid, "playing first match");
                services.session.play(station.to_track());
            }
            None => eprintln!("onda: no stations match '{target}'"),
        },
        Err(e) => {
            warn!("station search failed: {e}");
            eprintln!("onda: could not load radio stations, check the network or the directory");
        }
    }
}

/// Directory uuids are 8-4-4-4-12 hex groups.
fn looks_like_uuid(target: &str) -> bool {
    let groups: Vec<&str> = target.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8usize, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::looks_like_uuid;

    #[test]
    fn uuid_detection() {
        assert!(looks_like_uuid("9617a958-0601-11e8-ae97-52543be04c81"));
        assert!(!looks_like_uuid("jazz"));
        assert!(!looks_like_uuid("9617a958-0601-11e8-ae97"));
        assert!(!looks_like_uuid("9617a958-0601-11e8-ae97-52543be04cZZ"));
    }
}
