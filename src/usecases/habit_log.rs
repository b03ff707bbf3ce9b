//! Primary record repository — the abstinence log.
//!
//! Single source of truth for one persisted log. All reads and writes go
//! through a TTL snapshot cache: reads are fail-soft (an unreadable or
//! unparsable payload is logged and replaced by an empty store), writes
//! propagate their error and only update the cache after the store
//! accepted them.
//!
//! No per-key locking: calls are assumed to be issued sequentially from
//! a single-threaded UI interaction model. Overlapping mutations race
//! and the later save wins; the integration tests pin that behavior.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::format::{clock_time, generate_record_id};
use crate::domain::record::{DayBucket, HabitEvent, HabitStore};
use crate::ports::kv_store::KeyValueStore;
use crate::usecases::cache::SnapshotCache;
use crate::usecases::schema::decode_habit_log;

/// Repository for the primary (abstinence) log.
pub struct HabitLog<S> {
    store: Arc<S>,
    key: String,
    cache: SnapshotCache<HabitStore>,
}

impl<S: KeyValueStore> HabitLog<S> {
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
    /// Fail-soft: read or decode failures are logged and an empty store
    /// is returned. The decode-failure path does not populate the cache,
    /// so a transiently corrupt payload is retried on the next load.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&mut self) -> HabitStore {
        if let Some(snapshot) = self.cache.get() {
            return snapshot.clone();
        }

        match self.store.get(&self.key).await {
            Ok(None) => {
                let empty = HabitStore::new();
                self.cache.put(empty.clone());
                empty
            }
            Ok(Some(payload)) => match decode_habit_log(&payload) {
                Ok(data) => {
                    debug!(days = data.len(), "Habit log loaded");
                    self.cache.put(data.clone());
                    data
                }
                Err(e) => {
                    warn!(error = %e, "Habit log payload unparsable, substituting empty store");
                    HabitStore::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Habit log read failed, substituting empty store");
                HabitStore::new()
            }
        }
    }

    /// Persist the log, then update the cache to match (write-through).
    ///
    /// Write failures propagate to the caller and leave the cache
    /// untouched.
    #[instrument(skip(self, data), fields(key = %self.key, days = data.len()))]
    pub async fn save(&mut self, data: &HabitStore) -> Result<()> {
        let payload = serde_json::to_string(data).context("Failed to serialize habit log")?;
        self.store
            .set(&self.key, &payload)
            .await
            .context("Failed to write habit log")?;
        self.cache.put(data.clone());
        Ok(())
    }

    /// Record a new event on the given date at the current local time.
    ///
    /// Creates the date bucket on first event, appends otherwise, and
    /// keeps the roll-ups consistent. Returns the updated store.
    pub async fn add_event(&mut self, date_key: &str) -> Result<HabitStore> {
        let mut data = self.load().await;

        let now = Local::now();
        let event = HabitEvent {
            id: generate_record_id(date_key),
            timestamp: now.to_rfc3339(),
            time: clock_time(now),
        };

        match data.get_mut(date_key) {
            Some(bucket) => bucket.push(event),
            None => {
                data.insert(date_key.to_string(), DayBucket::single(event));
            }
        }

        self.save(&data).await?;
        Ok(data)
    }

    /// Delete the event with the given id from a date's bucket.
    ///
    /// Removes the date key entirely when the bucket empties. Unknown
    /// date or id is a silent no-op returning the unchanged store.
    pub async fn delete_event(&mut self, date_key: &str, event_id: &str) -> Result<HabitStore> {
        let mut data = self.load().await;

        if let Some(bucket) = data.get_mut(date_key) {
            if bucket.remove(event_id) && bucket.is_empty() {
                data.remove(date_key);
            }
        }

        self.save(&data).await?;
        Ok(data)
    }

    /// Remove the persisted key entirely and drop the cache.
    ///
    /// Succeeds when the key was never written.
    pub async fn clear_all(&mut self) -> Result<()> {
        self.store
            .remove(&self.key)
            .await
            .context("Failed to clear habit log")?;
        self.cache.clear();
        Ok(())
    }
}
