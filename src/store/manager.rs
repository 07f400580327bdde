//! JSON file store for persisting application state to disk
//!
//! Provides a `Store` that keeps one JSON file per fixed key, wrapped with the
//! time it was saved. Each write goes through its own temporary file in the
//! data directory and is renamed into place, so readers never observe a
//! half-written entry and concurrent writers never share a temp path.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur when writing to the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("Failed to serialize store entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Wrapper struct for values stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct StoreEntry<T> {
    /// The stored value
    data: T,
    /// When the value was written
    saved_at: DateTime<Utc>,
}

/// Key-value store backed by JSON files
///
/// Stores data in an XDG-compliant data directory (`~/.local/share/trendmart/`
/// on Linux). Missing or unparseable entries read as `None`, so corrupt state
/// degrades to defaults instead of failing.
#[derive(Debug, Clone)]
pub struct Store {
    /// Directory where entry files are stored
    data_dir: PathBuf,
}

impl Store {
    /// Creates a new Store using the XDG-compliant data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "trendmart")?;
        let data_dir = project_dirs.data_dir().to_path_buf();
        Some(Self { data_dir })
    }

    /// Creates a new Store rooted at a custom directory
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the directory entries are written to
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Writes a value under `key`, replacing any previous value
    ///
    /// The entry is written to a uniquely named temporary file in the data
    /// directory and then renamed over `<key>.json`. With several writers on
    /// one key, the last rename wins and the file always holds one whole entry.
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;

        let entry = StoreEntry {
            data,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)?;

        let mut tmp = NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;

        debug!("Wrote store entry '{}'", key);
        Ok(())
    }

    /// Reads the value stored under `key`
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<StoreEntry<T>>(&content) {
            Ok(entry) => Some(entry.data),
            Err(e) => {
                warn!("Ignoring malformed store entry '{}': {}", key, e);
                None
            }
        }
    }
}
