//! onda: a terminal internet-radio player.
//!
//! The heart of the crate is [`session::PlaybackSession`], which owns at most
//! one live audio stream, persists the last played station, and projects
//! playback status to observers. Around it sit the collaborators it is handed
//! at construction time: an [`engine::AudioEngine`] that turns stream URLs
//! into controllable handles, and a [`store::KvStore`] for durable blobs.
//! Stations come from the public radio-browser directory via
//! [`directory::DirectoryClient`]; favourites and user preferences live in
//! [`prefs`]; the terminal frontend and MPRIS wiring live in [`runtime`] and
//! [`mpris`].

pub mod config;
pub mod directory;
pub mod engine;
pub mod mpris;
pub mod prefs;
pub mod runtime;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;
