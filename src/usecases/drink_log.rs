//! Secondary record repository — the alcohol log.
//!
//! Same load/save/cache skeleton as the primary log, extended with
//! in-place record updates and the statistics/calendar entry points.
//! Records arrive fully formed from the caller (they carry their own
//! line items); the repository's job is bucket roll-up consistency.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::calendar::{DayMarker, drink_calendar_markers};
use crate::domain::drink::{DrinkDayBucket, DrinkRecord, DrinkStore};
use crate::domain::record::DateKey;
use crate::domain::stats::{DrinkStatistics, drink_statistics};
use crate::ports::kv_store::KeyValueStore;
use crate::usecases::cache::SnapshotCache;

/// Repository for the secondary (alcohol) log.
pub struct DrinkLog<S> {
    store: Arc<S>,
    key: String,
    cache: SnapshotCache<DrinkStore>,
}

impl<S: KeyValueStore> DrinkLog<S> {
    pub fn new(store: Arc<S>, key: impl Into<String>, cache_ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            cache: SnapshotCache::new(cache_ttl),
        }
    }

    /// Storage key this log persists under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Load the log, serving a fresh cached snapshot when available.
    ///
    /// Fail-soft like the primary log; decode failures are not cached.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&mut self) -> DrinkStore {
        if let Some(snapshot) = self.cache.get() {
            return snapshot.clone();
        }

        match self.store.get(&self.key).await {
            Ok(None) => {
                let empty = DrinkStore::new();
                self.cache.put(empty.clone());
                empty
            }
            Ok(Some(payload)) => match serde_json::from_str::<DrinkStore>(&payload) {
                Ok(data) => {
                    debug!(days = data.len(), "Drink log loaded");
                    self.cache.put(data.clone());
                    data
                }
                Err(e) => {
                    warn!(error = %e, "Drink log payload unparsable, substituting empty store");
                    DrinkStore::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Drink log read failed, substituting empty store");
                DrinkStore::new()
            }
        }
    }

    /// Persist the log, then update the cache to match (write-through).
    #[instrument(skip(self, data), fields(key = %self.key, days = data.len()))]
    pub async fn save(&mut self, data: &DrinkStore) -> Result<()> {
        let payload = serde_json::to_string(data).context("Failed to serialize drink log")?;
        self.store
            .set(&self.key, &payload)
            .await
            .context("Failed to write drink log")?;
        self.cache.put(data.clone());
        Ok(())
    }

    /// Add a caller-supplied session under its own date.
    pub async fn add_record(&mut self, record: DrinkRecord) -> Result<DrinkStore> {
        let mut data = self.load().await;

        match data.get_mut(&record.date) {
            Some(bucket) => bucket.push(record),
            None => {
                data.insert(record.date.clone(), DrinkDayBucket::single(record));
            }
        }

        self.save(&data).await?;
        Ok(data)
    }

    /// Delete the session with the given id, subtracting its totals.
    ///
    /// Removes the date key entirely when the bucket empties. Unknown
    /// date or id is a silent no-op returning the unchanged store.
    pub async fn delete_record(&mut self, date_key: &str, record_id: &str) -> Result<DrinkStore> {
        let mut data = self.load().await;

        if let Some(bucket) = data.get_mut(date_key) {
            if bucket.remove(record_id) && bucket.is_empty() {
                data.remove(date_key);
            }
        }

        self.save(&data).await?;
        Ok(data)
    }

    /// Replace the session with the given id in place: old totals are
    /// subtracted, new ones added, positional order preserved. Unknown
    /// date or id is a silent no-op.
    pub async fn update_record(
        &mut self,
        date_key: &str,
        record_id: &str,
        updated: DrinkRecord,
    ) -> Result<DrinkStore> {
        let mut data = self.load().await;

        if let Some(bucket) = data.get_mut(date_key) {
            bucket.replace(record_id, updated);
        }

        self.save(&data).await?;
        Ok(data)
    }

    /// Remove the persisted key entirely and drop the cache.
    pub async fn clear_all(&mut self) -> Result<()> {
        self.store
            .remove(&self.key)
            .await
            .context("Failed to clear drink log")?;
        self.cache.clear();
        Ok(())
    }

    /// Full statistics snapshot relative to `today`.
    ///
    /// A failed load flows through as an empty store, so every output
    /// is zero rather than an error.
    pub async fn statistics(&mut self, today: NaiveDate) -> DrinkStatistics {
        let data = self.load().await;
        drink_statistics(&data, today)
    }

    /// Calendar markers for every recorded date.
    pub async fn calendar_markers(&mut self) -> HashMap<DateKey, DayMarker> {
        let data = self.load().await;
        drink_calendar_markers(&data)
    }
}
