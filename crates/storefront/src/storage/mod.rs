//! Durable key-value slot storage for client state.
//!
//! Each container persists its state into a named slot as a JSON document.
//! The adapter fails soft in both directions: an absent or unreadable slot
//! yields the caller-supplied default, and a failed write is logged without
//! being propagated - the in-memory state stays authoritative.
//!
//! Two backends are provided behind the [`StorageBackend`] seam:
//!
//! - [`FileBackend`] - one `<key>.json` file per slot under a data directory
//! - [`MemoryBackend`] - a process-local map, for tests and ephemeral runs

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Slot names used by the state containers.
pub mod keys {
    /// Key for the persisted cart item list.
    pub const CART: &str = "cart";

    /// Key for the persisted wishlist.
    pub const WISHLIST: &str = "wishlist";

    /// Key for the persisted authentication token.
    pub const AUTH_TOKEN: &str = "auth_token";
}

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw slot access, keyed by a fixed name per container.
///
/// Implementations move strings in and out of durable storage; JSON
/// (de)serialization happens in [`Storage`].
pub trait StorageBackend: Send + Sync {
    /// Read the raw contents of a slot. `Ok(None)` means the slot is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the raw contents of a slot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be deleted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// FileBackend
// =============================================================================

/// File-based backend: one `<key>.json` file per slot under a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemoryBackend
// =============================================================================

/// In-memory backend for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Handle to durable slot storage shared by the state containers.
///
/// Cheaply cloneable; clones share the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    /// Create a storage handle over an arbitrary backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a file-backed storage handle rooted at `dir`.
    #[must_use]
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(dir))
    }

    /// Create an in-memory storage handle.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// Load a slot, falling back to `default` when the slot is absent,
    /// unreadable, or does not deserialize. Never fails.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "Discarding unreadable slot contents");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "Failed to read slot");
                default
            }
        }
    }

    /// Persist a value into a slot. Failures are logged, never propagated -
    /// the in-memory state remains the source of truth.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize slot value");
                return;
            }
        };

        if let Err(e) = self.backend.write(key, &raw) {
            warn!(key, error = %e, "Failed to persist slot");
        }
    }

    /// Delete a slot. Failures are logged, never propagated.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            warn!(key, error = %e, "Failed to remove slot");
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
