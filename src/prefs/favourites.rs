use tracing::warn;

use crate::directory::Station;
use crate::store::{SharedStore, StoreError};

/// Store key for the favourite-station list blob.
pub const FAVOURITE_STATIONS_KEY: &str = "favourite_stations";

/// Favourite stations, kept as one JSON array blob.
pub struct Favourites {
    store: SharedStore,
}

impl Favourites {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Read the favourite list. Missing, unreadable or corrupt blobs all
    /// degrade to an empty list.
    pub fn load(&self) -> Vec<Station> {
        let raw = match self.store.get(FAVOURITE_STATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("could not read favourite stations: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(stations) => stations,
            Err(e) => {
                warn!("discarding unreadable favourite stations: {e}");
                Vec::new()
            }
        }
    }

    pub fn save(&self, stations: &[Station]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(stations).unwrap_or_else(|_| "[]".to_string());
        self.store.set(FAVOURITE_STATIONS_KEY, &raw)
    }

    /// Add `station` to the favourites, or drop it when already present.
    /// Membership is by directory uuid. Returns the updated list.
    pub fn toggle(&self, station: &Station) -> Result<Vec<Station>, StoreError> {
        let mut stations = self.load();
        let before = stations.len();
        stations.retain(|s| s.stationuuid != station.stationuuid);
        if stations.len() == before {
            stations.push(station.clone());
        }
        self.save(&stations)?;
        Ok(stations)
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.load()
            .iter()
            .any(|s| s.stationuuid == station.stationuuid)
    }
}
