//! Configuration Module - TOML-based Engine Configuration
//!
//! Loads and validates configuration from `config.toml`. Storage keys
//! and the cache TTL are externalized here - nothing is hardcoded in
//! the domain layer. Every field has a serde default so the binary
//! also runs without a config file.

pub mod loader;

use serde::Deserialize;

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// App identity and logging.
    pub app: AppSection,
    /// Key-value storage layout.
    pub storage: StorageConfig,
    /// Snapshot cache behavior.
    pub cache: CacheConfig,
}

/// App identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// Human-readable app name.
    pub name: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Key-value storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the per-key JSON files.
    pub data_dir: String,
    /// Storage key of the primary (abstinence) log.
    pub abstinence_key: String,
    /// Storage key of the secondary (alcohol) log.
    pub alcohol_key: String,
}

/// Snapshot cache configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Snapshot lifetime in milliseconds.
    pub ttl_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "habit-ledger".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            abstinence_key: "abstinenceRecords".to_string(),
            alcohol_key: "alcoholRecords".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_ms: 5000 }
    }
}

impl CacheConfig {
    /// TTL as a `Duration` for the repositories.
    pub fn ttl(&self) -> tokio::time::Duration {
        tokio::time::Duration::from_millis(self.ttl_ms)
    }
}
