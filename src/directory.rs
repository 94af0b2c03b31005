//! Client for the public radio-browser station directory.
//!
//! One plain request/response call per lookup; no caching layer and no
//! retries. Results map into session [`Track`](crate::session::Track)s via
//! [`Station::to_track`].

mod client;
mod model;

pub use client::{DirectoryClient, DirectoryError, StationQuery};
pub use model::Station;
