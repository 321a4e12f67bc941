//! File-backed storage: one JSON file per key.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Storage, StorageError, validate_key};

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory is created on the first write. Each write goes to its own
/// uniquely named temporary file in the same directory, which is then renamed
/// over the target. A reader never sees a partially written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(key, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::io(key, e))?;
        tmp.write_all(value.as_bytes())
            .map_err(|e| StorageError::io(key, e))?;
        tmp.persist(&path)
            .map_err(|e| StorageError::io(key, e.error))?;

        debug!(key, path = %path.display(), bytes = value.len(), "snapshot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(key, e)),
        }
    }
}
