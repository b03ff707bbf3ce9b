//! habit-ledger — Entry Point
//!
//! Read-only report over the persisted logs. The write API is the
//! library surface consumed by the UI layer; this binary wires the
//! file store and prints what the engine derives from it.
//!
//! Wiring sequence:
//! 1. Load config.toml (defaults when absent) + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Open the file-backed key-value store + health probe
//! 4. Build the combined tracker over both logs
//! 5. Log feed summary, streaks, and drink statistics

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::persistence::FileKvStore;
use usecases::CombinedTracker;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = if std::path::Path::new(&config_path).exists() {
        config::loader::load_config(&config_path).context("Failed to load configuration")?
    } else {
        config::AppConfig::default()
    };

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.storage.data_dir,
        "Starting habit-ledger report"
    );

    // ── 3. Open the file-backed key-value store ─────────────
    let store = Arc::new(
        FileKvStore::new(&config.storage.data_dir)
            .await
            .context("Failed to open data directory")?,
    );
    if !store.is_healthy().await {
        warn!(data_dir = %config.storage.data_dir, "Data directory is not writable");
    }

    // ── 4. Build the combined tracker over both logs ────────
    let mut tracker = CombinedTracker::with_store(
        Arc::clone(&store),
        config.storage.abstinence_key.clone(),
        config.storage.alcohol_key.clone(),
        config.cache.ttl(),
    );

    // ── 5. Report ───────────────────────────────────────────
    let feed = tracker.load().await;
    info!(
        total_records = feed.total_records,
        total_days = feed.total_days,
        primary_records = feed.primary_records,
        primary_days = feed.primary_days,
        secondary_records = feed.secondary_records,
        secondary_days = feed.secondary_days,
        "Combined feed loaded"
    );

    for record in feed.records.iter().take(10) {
        info!(
            id = %record.id,
            date = %record.display_date,
            time = %record.time,
            kind = ?record.kind,
            seq = record.seq,
            "Recent record"
        );
    }

    let today = Local::now().date_naive();
    let stats = tracker.drinks_mut().statistics(today).await;
    info!(
        current_streak = stats.current_streak,
        longest_streak = stats.longest_streak,
        total_days = stats.total_days,
        total_records = stats.total_records,
        total_alcohol_g = stats.total_alcohol_content,
        total_volume_ml = stats.total_volume,
        week_alcohol_g = stats.this_week_alcohol,
        month_alcohol_g = stats.this_month_alcohol,
        "Drink statistics"
    );

    for (kind, breakdown) in &stats.by_type {
        if breakdown.count > 0 {
            info!(
                kind = %kind,
                count = breakdown.count,
                alcohol_g = breakdown.alcohol_content,
                volume_ml = breakdown.volume,
                "Drink type breakdown"
            );
        }
    }

    Ok(())
}
