//! Offline key-value snapshot store.
//!
//! The cart store persists a JSON snapshot of its items here so a refreshed
//! or offline session can restore the cart without the order service.
//! Mirrors the persistent storage surface a PWA gets from the browser:
//! string keys, string values, get/put/remove.
//!
//! [`FileStore`] is the production implementation (one file per key under a
//! cache directory); [`MemoryStore`] backs tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Errors that can occur reading or writing the offline store.
#[derive(Debug, Error)]
pub enum OfflineStoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key is not a valid storage slug.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Durable string key-value storage.
///
/// Operations are synchronous; callers treat the store as fast local state,
/// not as a remote service.
pub trait OfflineStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails; a missing key is
    /// `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, OfflineStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the write fails.
    fn put(&self, key: &str, value: &str) -> Result<(), OfflineStoreError>;

    /// Delete the value stored under `key`. Deleting an absent key is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn remove(&self, key: &str) -> Result<(), OfflineStoreError>;
}

// =============================================================================
// FileStore
// =============================================================================

/// File-backed offline store: one `<key>.json` file per key.
///
/// Writes go through a temp file followed by a rename, so a crash mid-write
/// never leaves a truncated snapshot behind.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, OfflineStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, OfflineStoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl OfflineStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, OfflineStoreError> {
        let path = self.entry_path(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), OfflineStoreError> {
        let path = self.entry_path(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), OfflineStoreError> {
        let path = self.entry_path(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys become file names, so restrict them to a safe slug alphabet.
fn validate_key(key: &str) -> Result<(), OfflineStoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(OfflineStoreError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// MemoryStore
// =============================================================================

/// In-memory offline store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OfflineStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, OfflineStoreError> {
        validate_key(key)?;
        Ok(self.lock_entries().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), OfflineStoreError> {
        validate_key(key)?;
        self.lock_entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), OfflineStoreError> {
        validate_key(key)?;
        self.lock_entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.put("potlucky_cart", "[1,2,3]").unwrap();
        assert_eq!(
            store.get("potlucky_cart").unwrap().as_deref(),
            Some("[1,2,3]")
        );
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(store.get("potlucky_cart").unwrap().is_none());
    }

    #[test]
    fn test_file_store_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.put("slot", "first").unwrap();
        store.put("slot", "second").unwrap();
        assert_eq!(store.get("slot").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store.put("slot", "value").unwrap();
        store.remove("slot").unwrap();
        store.remove("slot").unwrap();
        assert!(store.get("slot").unwrap().is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileStore::new(dir.path()).unwrap();
            store.put("potlucky_cart", "persisted").unwrap();
        }

        let reopened = FileStore::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("potlucky_cart").unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[test]
    fn test_file_store_rejects_path_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        for key in ["../escape", "a/b", "", "dot.dot"] {
            let result = store.put(key, "value");
            assert!(
                matches!(result, Err(OfflineStoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        store.put("potlucky_cart", "[]").unwrap();
        assert_eq!(store.get("potlucky_cart").unwrap().as_deref(), Some("[]"));

        store.remove("potlucky_cart").unwrap();
        assert!(store.get("potlucky_cart").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_validates_keys() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.put("../escape", "value"),
            Err(OfflineStoreError::InvalidKey(_))
        ));
    }
}
