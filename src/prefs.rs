//! Lightweight personal state: favourite stations and user preferences.
//!
//! Everything here is a thin, fail-soft layer over the injected key-value
//! store; the session owns the last-played blob, these helpers own theirs.

mod favourites;
mod user;

pub use favourites::{FAVOURITE_STATIONS_KEY, Favourites};
pub use user::{ColorScheme, UserPrefs};

#[cfg(test)]
mod tests;
