//! Local JSON file key-value store.
//!
//! All keys live in one JSON object file. Every write replaces the whole
//! file through a temp file + rename so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use passvault_core::error::{CoreError, CoreResult};
use passvault_core::traits::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// `KeyValueStore` persisted to a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<Entries>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; the file is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                CoreError::SerializationError(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Entries::new(),
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        log::info!(
            "Opened file store {} ({} keys)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &Entries) -> CoreResult<()> {
        let io_err =
            |e: std::io::Error| CoreError::StorageError(format!("{}: {e}", self.path.display()));

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        }

        let text = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    /// Apply `change` to a copy of the entries, persist it, then commit.
    async fn update<F>(&self, change: F) -> CoreResult<()>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let mut entries = self.entries.write().await;
        let mut staged = entries.clone();
        change(&mut staged);
        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn delete(&self, key: &str) -> CoreResult<()> {
        if !self.entries.read().await.contains_key(key) {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        Ok(self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
