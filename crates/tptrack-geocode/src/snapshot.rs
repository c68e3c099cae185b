//! The build-time snapshot: a static address → coordinates mapping bundled
//! with each deployment.
//!
//! The file is produced offline (by the batch geocoder or the snapshot
//! export) and is immutable for the lifetime of a deployed build. Writes
//! always replace the whole document via a temp file and rename, so readers
//! never observe a partially written map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tptrack_core::Coordinates;

use crate::error::GeocodeError;

/// Address → coordinates mapping, ordered for stable serialization.
pub type GeocodeMap = BTreeMap<String, Coordinates>;

/// In-memory snapshot tier, loaded once per process.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    entries: GeocodeMap,
}

impl SnapshotCache {
    /// Loads the snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Io`] if the file cannot be read or
    /// [`GeocodeError::Deserialize`] if it does not parse. Callers that can
    /// run without the snapshot tier should treat either as "tier disabled".
    pub fn load(path: &Path) -> Result<Self, GeocodeError> {
        Ok(Self {
            entries: load_map(path)?,
        })
    }

    #[must_use]
    pub fn from_map(entries: GeocodeMap) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<Coordinates> {
        self.entries.get(address).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads a geocode map from disk. A missing file yields an empty map; any
/// other I/O fault or a malformed document is an error.
///
/// # Errors
///
/// Returns [`GeocodeError::Io`] on filesystem faults other than
/// `NotFound`, or [`GeocodeError::Deserialize`] on a malformed document.
pub fn load_map(path: &Path) -> Result<GeocodeMap, GeocodeError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(GeocodeMap::new()),
        Err(err) => return Err(err.into()),
    };
    serde_json::from_str(&raw).map_err(|e| GeocodeError::Deserialize {
        context: path.display().to_string(),
        source: e,
    })
}

/// Replaces the geocode map on disk in a single atomic step: the document
/// is written to a sibling temp file, then renamed over the target.
///
/// # Errors
///
/// Returns [`GeocodeError::Io`] if the write or rename fails.
pub fn write_map_atomic(path: &Path, map: &GeocodeMap) -> Result<(), GeocodeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let body = serde_json::to_string(map).map_err(|e| GeocodeError::Deserialize {
        context: path.display().to_string(),
        source: e,
    })?;
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
