use super::*;
use std::sync::mpsc;

fn metadata() -> ControlsMetadata {
    ControlsMetadata {
        title: "Example FM".to_string(),
        artist: "onda".to_string(),
        album_title: "Radio".to_string(),
        artwork_url: Some("https://example.fm/logo.png".to_string()),
    }
}

#[test]
fn show_and_clear_update_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.show(&metadata());
    {
        let s = state.lock().unwrap();
        assert!(s.active);
        assert_eq!(s.title.as_deref(), Some("Example FM"));
        assert_eq!(s.artist.as_deref(), Some("onda"));
        assert_eq!(s.album.as_deref(), Some("Radio"));
        assert_eq!(s.art_url.as_deref(), Some("https://example.fm/logo.png"));
    }

    handle.clear();
    {
        let s = state.lock().unwrap();
        assert!(!s.active);
        assert_eq!(s.title, None);
        assert_eq!(s.artist, None);
        assert_eq!(s.album, None);
        assert_eq!(s.art_url, None);
    }
}

#[test]
fn playback_status_maps_phase_to_spec_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().phase = SessionPhase::Loaded;
    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().phase = SessionPhase::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().phase = SessionPhase::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    MprisHandle {
        state: state.clone(),
    }
    .show(&metadata());

    let map = iface.metadata();
    for k in ["xesam:title", "xesam:artist", "xesam:album", "mpris:artUrl"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_when_nothing_is_shown() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());
}
