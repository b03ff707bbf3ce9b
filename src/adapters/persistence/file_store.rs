//! File Key-Value Store - Atomic Per-Key JSON Files
//!
//! Stores each key as `<data_dir>/<key>.json` using atomic writes
//! (write to tmp file, then rename). This guarantees crash safety
//! and prevents partial writes from corrupting a log.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, instrument};

use crate::ports::kv_store::KeyValueStore;

/// Atomic per-key file store.
///
/// A value is written to a `.tmp` sibling first, then atomically
/// renamed over the final path, so the file on disk is always either
/// the old or the new blob, never a partial write.
pub struct FileKvStore {
    /// Directory holding one `<key>.json` file per key.
    data_dir: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// it doesn't exist.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .context("Failed to create data directory")?;
        Ok(Self { data_dir: dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json.tmp"))
    }

    /// Check that the data directory is writable.
    pub async fn is_healthy(&self) -> bool {
        let probe = self.data_dir.join(".health_check");
        let result = fs::write(&probe, b"ok").await;
        let _ = fs::remove_file(&probe).await;
        result.is_ok()
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let tmp = self.tmp_path_for(key);
        let path = self.path_for(key);

        fs::write(&tmp, value)
            .await
            .with_context(|| format!("Failed to write tmp file for key {key}"))?;

        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to rename tmp file for key {key}"))?;

        debug!(path = %path.display(), "Key written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
