//! Durable key-value storage
//!
//! Small string values (such as the recent-items list) are kept in an
//! embedded `sled` database. Every write is flushed before returning so a
//! value that was acknowledged survives a crash.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use directories::ProjectDirs;
use sled::Db;

use crate::error::{Result, SyncError};

/// Environment variable that overrides the default store location.
pub const STORE_PATH_ENV: &str = "JULESYNC_STORE_PATH";

/// Synchronous string key-value persistence.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, durably.
    fn set_string(&self, key: &str, value: &str) -> Result<()>;
}

/// `sled`-backed store.
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a store at `path`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Storage` if the database cannot be opened.
    ///
    /// # Examples
    ///
    /// ```
    /// use julesync::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> julesync::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("store"))?;
    /// store.set_string("greeting", "hello")?;
    /// assert_eq!(store.get_string("greeting")?.as_deref(), Some("hello"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let db = sled::open(path)
            .map_err(|e| SyncError::Storage(format!("Failed to open database: {}", e)))?;
        tracing::debug!("Opened store at {}", path.display());
        Ok(Self { db })
    }

    /// Default store location.
    ///
    /// `JULESYNC_STORE_PATH` wins; otherwise the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(STORE_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("com", "julesync", "julesync")
            .ok_or_else(|| SyncError::Storage("Could not determine data directory".into()))?;
        Ok(dirs.data_dir().join("store"))
    }
}

impl KeyValueStore for SledStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| SyncError::Storage(format!("Get failed: {}", e)))?;
        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| SyncError::Storage(format!("Value is not UTF-8: {}", e)))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| SyncError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| SyncError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

/// Volatile store, used by tests and when no durable location is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
