//! Key-value persistence used for the last-played station, favourites and
//! user preferences.
//!
//! The session and the preference helpers receive a store by injection; the
//! file-backed implementation keeps one JSON blob per key under the XDG data
//! directory.

mod file;
mod memory;

pub use file::{FileStore, default_data_dir, resolve_data_dir};
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("no usable data directory")]
    NoDataDir,
}

/// Durable get/set/remove of string blobs. Every operation may fail; callers
/// treat failures as non-fatal.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn KvStore>;

#[cfg(test)]
mod tests;
