//! Key-Value Store Port - Persistence Boundary
//!
//! The engine's only view of durable storage: async get/set/remove of
//! serialized text blobs by string key. Single-key operations are
//! assumed atomic and crash-safe by the backing implementation; the
//! engine layers its own caching and schema handling on top.

use async_trait::async_trait;

/// Trait for key-value persistence providers.
///
/// Values are opaque serialized text. Removing an absent key must not
/// be an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Fetch the blob stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove `key` entirely. Succeeds when the key is already absent.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
