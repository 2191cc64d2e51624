//! Device snapshot file store
//!
//! A JSON or YAML file holding every profile list and the ONU registry of one
//! device. [`SnapshotStore`] serves it through [`ProfileStore`] and writes
//! the file back after every successful mutation, which makes offline
//! editing sessions behave like sessions against the device.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pon_schema::ProfileKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::memory::MemoryStore;
use crate::onu::OnuRegistration;
use crate::profile::Profile;
use crate::store::{ProfileStore, StoreError};

/// Serialized content of a device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Raw device bodies per kind
    #[serde(default)]
    pub profiles: BTreeMap<ProfileKind, Vec<JsonValue>>,
    /// ONU registry
    #[serde(default)]
    pub onus: Vec<OnuRegistration>,
}

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl SnapshotFormat {
    /// Format implied by the file extension; JSON unless `.yaml`/`.yml`
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Snapshot file failure
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// File could not be read or written
    #[error("snapshot I/O on {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid JSON
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML
    #[error("invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Snapshot content violates the store contract
    #[error("invalid snapshot content: {0}")]
    Content(#[from] StoreError),
}

impl DeviceSnapshot {
    /// Parse snapshot text
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the text does not parse.
    pub fn parse(text: &str, format: SnapshotFormat) -> Result<Self, SnapshotError> {
        Ok(match format {
            SnapshotFormat::Json => serde_json::from_str(text)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(text)?,
        })
    }

    /// Render snapshot text
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if serialization fails.
    pub fn render(&self, format: SnapshotFormat) -> Result<String, SnapshotError> {
        Ok(match format {
            SnapshotFormat::Json => serde_json::to_string_pretty(self)?,
            SnapshotFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }
}

/// [`ProfileStore`] backed by a snapshot file
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    format: SnapshotFormat,
    inner: MemoryStore,
}

impl SnapshotStore {
    /// Open a snapshot file
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the file cannot be read or parsed, or
    /// lists a name twice within a kind.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path);
        let text = fs::read_to_string(&path).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        let snapshot = DeviceSnapshot::parse(&text, format)?;
        let inner = MemoryStore::from_snapshot(snapshot)?;
        info!(path = %path.display(), "opened device snapshot");
        Ok(Self { path, format, inner })
    }

    /// Create a new snapshot file from `snapshot`
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the content is invalid or the file cannot
    /// be written.
    pub fn initialize(path: impl Into<PathBuf>, snapshot: DeviceSnapshot) -> Result<Self, SnapshotError> {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path);
        let store = Self {
            inner: MemoryStore::from_snapshot(snapshot)?,
            path,
            format,
        };
        store.persist()?;
        Ok(store)
    }

    /// Snapshot file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current content back to the file
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if rendering or writing fails.
    pub fn persist(&self) -> Result<(), SnapshotError> {
        let text = self.inner.snapshot().render(self.format)?;
        let tmp = self.path.with_extension("tmp");
        let io = |source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, text).map_err(io)?;
        fs::rename(&tmp, &self.path).map_err(io)?;
        debug!(path = %self.path.display(), "persisted device snapshot");
        Ok(())
    }

    fn persist_after(&self, result: Result<(), StoreError>) -> Result<(), StoreError> {
        result?;
        self.persist().map_err(|e| StoreError::Unavailable { reason: e.to_string() })
    }
}

impl ProfileStore for SnapshotStore {
    fn list(&self, kind: ProfileKind) -> Result<Vec<Profile>, StoreError> {
        self.inner.list(kind)
    }

    fn get_by_name(&self, kind: ProfileKind, name: &str) -> Result<Profile, StoreError> {
        self.inner.get_by_name(kind, name)
    }

    fn delete(&self, kind: ProfileKind, name: &str) -> Result<(), StoreError> {
        self.persist_after(self.inner.delete(kind, name))
    }

    fn create(&self, kind: ProfileKind, body: &JsonValue) -> Result<(), StoreError> {
        self.persist_after(self.inner.create(kind, body))
    }

    fn onu_registry(&self) -> Result<Vec<OnuRegistration>, StoreError> {
        self.inner.onu_registry()
    }
}
