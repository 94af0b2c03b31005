use super::*;
use crate::directory::Station;
use crate::store::{KvStore, MemoryStore};

use std::sync::Arc;

fn station(uuid: &str, name: &str) -> Station {
    Station {
        stationuuid: uuid.to_string(),
        name: name.to_string(),
        url: format!("http://stream.example/{uuid}"),
        ..Default::default()
    }
}

#[test]
fn favourites_start_empty() {
    let favourites = Favourites::new(Arc::new(MemoryStore::new()));
    assert!(favourites.load().is_empty());
    assert!(!favourites.contains(&station("a", "A")));
}

#[test]
fn toggle_adds_then_removes_by_uuid() {
    let favourites = Favourites::new(Arc::new(MemoryStore::new()));
    let a = station("a", "A FM");
    let b = station("b", "B FM");

    favourites.toggle(&a).unwrap();
    let list = favourites.toggle(&b).unwrap();
    assert_eq!(list.len(), 2);
    assert!(favourites.contains(&a));

    // Same uuid with different display data still counts as the same station.
    let mut renamed_a = a.clone();
    renamed_a.name = "A FM (renamed)".to_string();
    let list = favourites.toggle(&renamed_a).unwrap();
    assert_eq!(list.len(), 1);
    assert!(!favourites.contains(&a));
    assert!(favourites.contains(&b));
}

#[test]
fn favourites_survive_reopening_the_store() {
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let a = station("a", "A FM");

    Favourites::new(store.clone()).toggle(&a).unwrap();

    let reopened = Favourites::new(store);
    assert_eq!(reopened.load(), vec![a]);
}

#[test]
fn corrupt_favourites_blob_degrades_to_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(FAVOURITE_STATIONS_KEY, "not a list").unwrap();

    let favourites = Favourites::new(store);
    assert!(favourites.load().is_empty());
}

#[test]
fn user_prefs_default_when_unset() {
    let prefs = UserPrefs::new(Arc::new(MemoryStore::new()));
    assert!(prefs.country_code().is_none());
    assert!(prefs.language_code().is_none());
    assert_eq!(prefs.color_scheme(), ColorScheme::System);
}

#[test]
fn user_prefs_roundtrip() {
    let prefs = UserPrefs::new(Arc::new(MemoryStore::new()));

    prefs.set_country_code("ES").unwrap();
    prefs.set_language_code("es").unwrap();
    prefs.set_color_scheme(ColorScheme::Dark).unwrap();

    assert_eq!(prefs.country_code().as_deref(), Some("ES"));
    assert_eq!(prefs.language_code().as_deref(), Some("es"));
    assert_eq!(prefs.color_scheme(), ColorScheme::Dark);
}

#[test]
fn empty_country_code_clears_the_preference() {
    let prefs = UserPrefs::new(Arc::new(MemoryStore::new()));
    prefs.set_country_code("ES").unwrap();
    prefs.set_country_code("").unwrap();
    assert!(prefs.country_code().is_none());
}

#[test]
fn unknown_color_scheme_falls_back_to_system() {
    let store = Arc::new(MemoryStore::new());
    store.set("color_scheme", "sepia").unwrap();
    let prefs = UserPrefs::new(store);
    assert_eq!(prefs.color_scheme(), ColorScheme::System);
}
