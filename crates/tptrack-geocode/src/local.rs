//! The per-client persistent coordinate store (tier 2).
//!
//! One JSON document on local disk mapping namespaced keys
//! (`"tp tracker " + address`) to coordinates, the durable equivalent of a
//! browser's local storage. Entries are written only on promotion and live
//! for the lifetime of the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tptrack_core::Coordinates;

use crate::error::GeocodeError;

const KEY_PREFIX: &str = "tp tracker ";

/// File-backed key-value store for locally cached coordinates.
#[derive(Debug, Clone)]
pub struct LocalCoordStore {
    path: PathBuf,
}

impl LocalCoordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Looks up an address. Local faults (unreadable or malformed file) are
    /// logged and reported as a miss; this tier never fails a resolution.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<Coordinates> {
        self.read_entries().get(&storage_key(address)).copied()
    }

    /// Stores coordinates for an address, replacing the whole document via
    /// temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Io`] if the store file cannot be written.
    pub fn put(&self, address: &str, coords: Coordinates) -> Result<(), GeocodeError> {
        let mut entries = self.read_entries();
        entries.insert(storage_key(address), coords);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let body = serde_json::to_string(&entries).map_err(|e| GeocodeError::Deserialize {
            context: self.path.display().to_string(),
            source: e,
        })?;
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, Coordinates> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "local coordinate store unreadable");
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "local coordinate store malformed");
                BTreeMap::new()
            }
        }
    }
}

fn storage_key(address: &str) -> String {
    format!("{KEY_PREFIX}{address}")
}
