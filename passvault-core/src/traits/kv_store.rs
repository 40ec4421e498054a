//! 键值存储抽象 Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::CoreResult;

/// Key-value store Trait
///
/// Every document (a user's password tree, a user's icon collection) is
/// stored as one JSON string under one key.
///
/// Platform implementation:
/// - `InMemoryKeyValueStore` (this crate, default and tests)
/// - `HttpKeyValueStore` (passvault-app, remote `/api/storage` endpoint)
/// - `JsonFileStore` (passvault-app, local JSON file)
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Returns
    /// * `Ok(Some(value))` - key exists
    /// * `Ok(None)` - key does not exist
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Write (create or overwrite) a value
    ///
    /// # Arguments
    /// * `key` - storage key
    /// * `value` - serialized document
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Delete a key (deleting a missing key is not an error)
    async fn delete(&self, key: &str) -> CoreResult<()>;

    /// List all keys starting with `prefix`
    async fn list(&self, prefix: &str) -> CoreResult<Vec<String>>;
}

/// In-memory key-value store
///
/// Default implementation, available on all platforms. Data lives only as
/// long as the process.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> CoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
