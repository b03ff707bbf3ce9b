//! In-Memory Key-Value Store
//!
//! Mutex-guarded map implementing the `KeyValueStore` port. Backs the
//! integration tests and any wiring that doesn't need a disk.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::ports::kv_store::KeyValueStore;

/// Process-local key-value store.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
