//! Key/value persistence for client-side state.
//!
//! Stores serialize themselves to a string and hand it to a [`Storage`]
//! backend under a fixed key. [`FileStorage`] writes one JSON file per key;
//! [`MemoryStorage`] keeps everything in a map and is used by tests and
//! ephemeral runs.

mod file;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

pub use file::FileStorage;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Snapshot could not be encoded.
    #[error("Failed to encode snapshot for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}

/// A persistence backend addressed by string keys.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the delete fails.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape the storage namespace.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
