use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use ureq::Agent;

use crate::config::DirectorySettings;

use super::model::Station;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("could not parse directory response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Filters for a station search. Empty/None fields are left out of the
/// request entirely, mirroring how the directory treats absent parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationQuery {
    pub name: Option<String>,
    pub country_code: Option<String>,
    pub language_codes: Option<String>,
    pub tag: Option<String>,
}

impl StationQuery {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Build the query string: fixed paging/ordering first, then the active
    /// filters, percent-encoded.
    pub(super) fn to_query_string(&self, limit: u32, hide_broken: bool) -> String {
        let mut q = format!("limit={limit}&hidebroken={hide_broken}&order=votes&reverse=true");
        let mut push = |key: &str, value: &Option<String>| {
            if let Some(v) = value {
                let v = v.trim();
                if !v.is_empty() {
                    q.push_str(&format!("&{key}={}", urlencoding::encode(v)));
                }
            }
        };
        push("name", &self.name);
        push("countrycode", &self.country_code);
        push("languagecodes", &self.language_codes);
        push("tag", &self.tag);
        q
    }
}

/// Blocking radio-browser client. One request per call, typed errors, no
/// retries; the caller decides what a failure means.
pub struct DirectoryClient {
    agent: Agent,
    base_url: String,
    search_limit: u32,
    hide_broken: bool,
}

impl DirectoryClient {
    pub fn new(settings: &DirectorySettings) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.timeout_secs)))
            .user_agent(settings.user_agent.as_str())
            .build();

        Self {
            agent: config.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            search_limit: settings.search_limit,
            hide_broken: settings.hide_broken,
        }
    }

    /// `GET /json/stations/search` with the query's filters applied.
    pub fn search(&self, query: &StationQuery) -> Result<Vec<Station>, DirectoryError> {
        let url = format!(
            "{}/json/stations/search?{}",
            self.base_url,
            query.to_query_string(self.search_limit, self.hide_broken)
        );
        debug!(%url, "searching stations");

        let response = self.agent.get(&url).call()?;
        // response: http::Response<ureq::Body>
        let (_parts, body) = response.into_parts();
        let stations: Vec<Station> = serde_json::from_reader(body.into_reader())?;
        Ok(stations)
    }

    /// Look a single station up by its directory uuid.
    pub fn by_uuid(&self, uuid: &str) -> Result<Option<Station>, DirectoryError> {
        let url = format!(
            "{}/json/stations/byuuid?uuids={}",
            self.base_url,
            urlencoding::encode(uuid)
        );
        debug!(%url, "fetching station");

        let response = self.agent.get(&url).call()?;
        let (_parts, body) = response.into_parts();
        let mut stations: Vec<Station> = serde_json::from_reader(body.into_reader())?;
        if stations.is_empty() {
            Ok(None)
        } else {
            Ok(Some(stations.remove(0)))
        }
    }
}
