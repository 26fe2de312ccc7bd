//! Persistence of the session subset across restarts.
//!
//! DESIGN
//! ======
//! The record is a small JSON document wrapped in a versioned envelope:
//! `{ "state": { user, token, isAuthenticated }, "version": 0 }`. The store
//! calls [`SessionStorage::save`] explicitly after each transition that
//! changes the persisted subset; storage never observes in-memory mutation.
//!
//! TRADE-OFFS
//! ==========
//! `FileStorage` uses blocking `std::fs`. The record is a few hundred bytes
//! and written once per transition, so a blocking write inside the store's
//! critical section keeps write order identical to transition order.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::types::PersistedSession;

pub const RECORD_VERSION: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait SessionStorage: Send + Sync {
    /// Load the record, `None` if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record exists but cannot be read.
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;

    /// Replace the record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the record cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: PersistedSession,
    version: u32,
}

// =============================================================================
// FILE STORAGE
// =============================================================================

/// JSON record on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let envelope: Envelope = serde_json::from_str(&raw)?;
        if envelope.version != RECORD_VERSION {
            tracing::warn!(
                path = %self.path.display(),
                version = envelope.version,
                "ignoring session record with unknown version"
            );
            return Ok(None);
        }
        Ok(Some(envelope.state))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        let envelope = Envelope { state: session.clone(), version: RECORD_VERSION };
        let json = serde_json::to_vec_pretty(&envelope)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// In-process record, for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<Option<PersistedSession>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(session: PersistedSession) -> Self {
        Self { record: Mutex::new(Some(session)) }
    }

    /// Current record, bypassing the trait's `Result`.
    #[must_use]
    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        *self
            .record
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
