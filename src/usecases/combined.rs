//! Combined-view builder and cross-log facade.
//!
//! Merges both logs into one chronologically sorted feed: every event of
//! every date becomes a flat item tagged with its source log, its date's
//! record count within that log, and its 1-based position in the bucket
//! (insertion order). The descending-timestamp sort is the single global
//! ordering guarantee. Deletion and clear-all route to the owning
//! repository based on the tag; there are no cross-log side effects.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::instrument;

use crate::domain::format::format_display_date;
use crate::ports::kv_store::KeyValueStore;
use crate::usecases::drink_log::DrinkLog;
use crate::usecases::habit_log::HabitLog;

/// Which log a combined feed item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Abstinence log.
    Primary,
    /// Alcohol log.
    Secondary,
}

/// One event flattened into the combined feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRecord {
    pub id: String,
    pub date: String,
    /// Locale display form of `date`.
    pub display_date: String,
    /// "HH:MM" display label of the event.
    pub time: String,
    /// RFC 3339 instant used for the global sort.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Events sharing this date within the same log.
    pub day_count: u32,
    /// 1-based position within the date's bucket, insertion order.
    pub seq: u32,
}

/// The flat feed plus its scalar summaries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedFeed {
    /// Most recent first.
    pub records: Vec<CombinedRecord>,
    pub total_records: u32,
    /// Distinct dates across both logs (union).
    pub total_days: u32,
    pub primary_records: u32,
    pub secondary_records: u32,
    pub primary_days: u32,
    pub secondary_days: u32,
}

/// Facade owning both repositories.
pub struct CombinedTracker<S> {
    habits: HabitLog<S>,
    drinks: DrinkLog<S>,
}

/// Sort key for the descending-timestamp ordering. Unparsable
/// timestamps sink to the bottom of the feed.
fn timestamp_millis(timestamp: &str) -> i64 {
    DateTime::parse_from_rfc3339(timestamp)
        .map_or(i64::MIN, |t| t.timestamp_millis())
}

impl<S: KeyValueStore> CombinedTracker<S> {
    pub fn new(habits: HabitLog<S>, drinks: DrinkLog<S>) -> Self {
        Self { habits, drinks }
    }

    /// Wire both logs over one shared store.
    pub fn with_store(
        store: Arc<S>,
        habit_key: impl Into<String>,
        drink_key: impl Into<String>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            habits: HabitLog::new(Arc::clone(&store), habit_key, cache_ttl),
            drinks: DrinkLog::new(store, drink_key, cache_ttl),
        }
    }

    /// The abstinence-log repository, for log-specific operations.
    pub fn habits_mut(&mut self) -> &mut HabitLog<S> {
        &mut self.habits
    }

    /// The alcohol-log repository, for log-specific operations.
    pub fn drinks_mut(&mut self) -> &mut DrinkLog<S> {
        &mut self.drinks
    }

    /// Build the combined feed from both logs.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> CombinedFeed {
        let habit_data = self.habits.load().await;
        let drink_data = self.drinks.load().await;

        let mut records = Vec::new();
        let mut all_dates: HashSet<&str> = HashSet::new();
        let mut primary_records: u32 = 0;
        let mut secondary_records: u32 = 0;

        for (date, bucket) in &habit_data {
            all_dates.insert(date);
            let day_count = bucket.records.len() as u32;
            primary_records += day_count;
            for (index, event) in bucket.records.iter().enumerate() {
                records.push(CombinedRecord {
                    id: event.id.clone(),
                    date: date.clone(),
                    display_date: format_display_date(date),
                    time: event.time.clone(),
                    timestamp: event.timestamp.clone(),
                    kind: RecordKind::Primary,
                    day_count,
                    seq: index as u32 + 1,
                });
            }
        }

        for (date, bucket) in &drink_data {
            all_dates.insert(date);
            let day_count = bucket.records.len() as u32;
            secondary_records += day_count;
            for (index, record) in bucket.records.iter().enumerate() {
                records.push(CombinedRecord {
                    id: record.id.clone(),
                    date: date.clone(),
                    display_date: format_display_date(date),
                    time: record.time.clone(),
                    timestamp: record.timestamp.clone(),
                    kind: RecordKind::Secondary,
                    day_count,
                    seq: index as u32 + 1,
                });
            }
        }

        // Most recent first — the single global ordering guarantee.
        records.sort_by_key(|r| std::cmp::Reverse(timestamp_millis(&r.timestamp)));

        CombinedFeed {
            total_records: records.len() as u32,
            total_days: all_dates.len() as u32,
            primary_records,
            secondary_records,
            primary_days: habit_data.len() as u32,
            secondary_days: drink_data.len() as u32,
            records,
        }
    }

    /// Delete one record, routed to its owning log by tag.
    pub async fn delete(
        &mut self,
        kind: RecordKind,
        date_key: &str,
        record_id: &str,
    ) -> Result<()> {
        match kind {
            RecordKind::Primary => {
                self.habits.delete_event(date_key, record_id).await?;
            }
            RecordKind::Secondary => {
                self.drinks.delete_record(date_key, record_id).await?;
            }
        }
        Ok(())
    }

    /// Clear both logs.
    pub async fn clear_all(&mut self) -> Result<()> {
        self.habits.clear_all().await?;
        self.drinks.clear_all().await?;
        Ok(())
    }
}
