//! String-valued key-value storage backing the reading state store.
//!
//! Two backends are provided: [`FileStorage`] keeps one JSON file per key
//! inside a data directory, [`MemoryStorage`] keeps values in a map and can
//! enforce a byte quota.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Synchronous key-value storage with string values.
///
/// `get` distinguishes "absent" (`Ok(None)`) from a failed read (`Err`).
/// `set` replaces the whole value.
pub trait KeyValueStorage {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage, optionally bounded by a total byte quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Creates an empty, unbounded storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty storage that rejects writes once keys and values
    /// together would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: HashMap::new(),
            quota: Some(bytes),
        }
    }

    /// Changes the quota. `None` removes the bound.
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.values.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let current = self
                .values
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let available = quota.saturating_sub(self.used_bytes() - current);
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }

        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: key `k` lives in `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path used for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Ensure data directory exists
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}
