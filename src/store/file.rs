use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{KvStore, StoreError};

/// File-backed store: one `<key>.json` file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open the store at the default data directory, creating it if needed.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = resolve_data_dir().ok_or(StoreError::NoDataDir)?;
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are internal identifiers; flatten anything path-like so a key
        // can never escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Write-then-rename so a crash mid-write never leaves a torn blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Resolve the data directory from `ONDA_DATA_DIR` or XDG defaults.
pub fn resolve_data_dir() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("ONDA_DATA_DIR") {
        return Some(PathBuf::from(p));
    }
    default_data_dir()
}

/// Compute the default data directory under `$XDG_DATA_HOME/onda` or
/// `~/.local/share/onda` when `XDG_DATA_HOME` is not set.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = std::env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };

    data_home.map(|d| d.join("onda"))
}
