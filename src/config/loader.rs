//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        data_dir = %config.storage.data_dir,
        cache_ttl_ms = config.cache.ttl_ms,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.storage.data_dir.is_empty(),
        "storage.data_dir must not be empty"
    );
    anyhow::ensure!(
        !config.storage.abstinence_key.is_empty(),
        "storage.abstinence_key must not be empty"
    );
    anyhow::ensure!(
        !config.storage.alcohol_key.is_empty(),
        "storage.alcohol_key must not be empty"
    );
    anyhow::ensure!(
        config.storage.abstinence_key != config.storage.alcohol_key,
        "storage keys must be distinct, both are {}",
        config.storage.abstinence_key
    );
    anyhow::ensure!(
        config.cache.ttl_ms > 0,
        "cache.ttl_ms must be positive, got {}",
        config.cache.ttl_ms
    );

    Ok(())
}
