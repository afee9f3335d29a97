//! File-based repository implementation
//!
//! A single JSON object on disk, rewritten on every change. Used as the
//! durable key-value backend for the admin session.

use super::traits::KeyValueStore;
use crate::app_log;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::LogLevel;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable key-value store persisted as a JSON file
pub struct JsonFileStore {
    store_path: PathBuf,
    // Cached file contents; also serializes writers
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store, loading existing contents if the file exists
    pub fn open(store_path: impl Into<PathBuf>) -> FeedbackResult<Self> {
        let store_path = store_path.into();
        let values = Self::read_file(&store_path)?;
        app_log!(
            LogLevel::Debug,
            "Opened key-value store at {} ({} keys)",
            store_path.display(),
            values.len()
        );
        Ok(Self {
            store_path,
            values: Mutex::new(values),
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Unparseable or non-object contents are discarded; only IO errors fail
    fn read_file(path: &Path) -> FeedbackResult<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            FeedbackError::StorageLoadFailed(format!("{}: {}", path.display(), e))
        })?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                app_log!(
                    LogLevel::Warn,
                    "{} does not contain a JSON object, starting empty",
                    path.display()
                );
                Ok(Map::new())
            }
            Err(e) => {
                app_log!(
                    LogLevel::Warn,
                    "Discarding unreadable store {}: {}",
                    path.display(),
                    e
                );
                Ok(Map::new())
            }
        }
    }

    fn save(&self, values: &Map<String, Value>) -> FeedbackResult<()> {
        if let Some(parent) = self.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.store_path, json).map_err(|e| {
            FeedbackError::StorageSaveFailed(format!("{}: {}", self.store_path.display(), e))
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> FeedbackResult<Option<Value>> {
        Ok(self.values.lock()?.get(key).cloned())
    }

    // The cache only changes once the file write has succeeded
    fn set(&self, key: &str, value: Value) -> FeedbackResult<()> {
        let mut values = self.values.lock()?;
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        self.save(&updated)?;
        *values = updated;
        Ok(())
    }

    fn delete(&self, key: &str) -> FeedbackResult<()> {
        let mut values = self.values.lock()?;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(key);
        self.save(&updated)?;
        *values = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.get("user").unwrap().is_none());
        assert!(!store.store_path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set("user", json!({"id": "1", "email": "a@b.c"})).unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("user").unwrap().unwrap()["email"], "a@b.c");

        reopened.delete("user").unwrap();
        let again = JsonFileStore::open(&path).unwrap();
        assert!(!again.has("user").unwrap());
    }

    #[test]
    fn test_non_object_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("user").unwrap().is_none());
    }

    #[test]
    fn test_truncated_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{\"user\": {\"id\": \"1\", \"em").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("user").unwrap().is_none());

        // Next write replaces the damaged file
        store.set("user", json!({"id": "1"})).unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("user").unwrap().unwrap()["id"], "1");
    }

    #[test]
    fn test_failed_set_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = JsonFileStore::open(blocker.join("store.json")).unwrap();
        assert!(store.set("user", json!({"id": "1"})).is_err());
        assert!(store.get("user").unwrap().is_none());
    }

    #[test]
    fn test_failed_delete_keeps_cache() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let store = JsonFileStore::open(sub.join("store.json")).unwrap();
        store.set("user", json!({"id": "1"})).unwrap();

        // Replace the parent directory with a regular file
        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, "not a directory").unwrap();

        assert!(store.delete("user").is_err());
        assert_eq!(store.get("user").unwrap().unwrap()["id"], "1");
    }
}
