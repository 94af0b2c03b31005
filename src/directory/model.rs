use serde::{Deserialize, Serialize};

use crate::session::Track;

/// One radio-browser station record.
///
/// The API omits or nulls fields freely, so everything defaults; a station is
/// only unusable when both stream URLs are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Station {
    pub stationuuid: String,
    pub name: String,
    pub url: String,
    pub url_resolved: String,
    pub homepage: String,
    pub favicon: String,
    pub tags: String,
    pub country: String,
    pub countrycode: String,
    pub language: String,
    pub languagecodes: String,
    pub codec: String,
    pub bitrate: u32,
    pub clickcount: u32,
    pub votes: i64,
    pub geo_lat: Option<f64>,
    pub geo_long: Option<f64>,
}

impl Station {
    /// Preferred stream locator: the resolved URL when the directory has
    /// followed redirects/playlists for us, the raw one otherwise.
    pub fn stream_url(&self) -> &str {
        if self.url_resolved.is_empty() {
            &self.url
        } else {
            &self.url_resolved
        }
    }

    /// Map this station into a playable track. The full record rides along
    /// as the opaque back-reference so it survives persistence.
    pub fn to_track(&self) -> Track {
        Track {
            uri: self.stream_url().to_string(),
            title: if self.name.is_empty() {
                None
            } else {
                Some(self.name.clone())
            },
            artist: None,
            artwork: if self.favicon.is_empty() {
                None
            } else {
                Some(self.favicon.clone())
            },
            station: serde_json::to_value(self).ok(),
        }
    }
}
