//! JSON-file-backed key-value store.
//!
//! The whole store is one flat `HashMap<String, String>` serialized as JSON.
//! Reads are served from an in-memory cache loaded at open; every write is
//! flushed back to disk through a temp-file rename so a crash mid-write never
//! leaves a truncated store behind.

use crate::paths::SunaPaths;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use suna_core::error::{Result, SunaError};
use suna_core::storage::KeyValueStore;
use tokio::sync::Mutex;

/// Durable key-value store over a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// An unreadable store file is treated as empty rather than fatal; the
    /// engine degrades the same way it does for any other storage failure.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let cache = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "discarding unreadable store: {e}");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Opens the store at its platform default location.
    pub async fn open_default() -> Result<Self> {
        let path = SunaPaths::store_file()
            .map_err(|e| SunaError::config(e.to_string()))?;
        Self::open(path).await
    }

    /// Writes the cache to disk, atomically replacing the store file.
    async fn flush(&self, cache: &HashMap<String, String>) -> Result<()> {
        let payload = serde_json::to_string_pretty(cache)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut cache = self.cache.lock().await;
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut cache = self.cache.lock().await;
        if cache.remove(key).is_some() {
            self.flush(&cache).await?;
        }
        Ok(())
    }
}
