//! Abstinence-log domain types.
//!
//! The primary tracked behavior is recorded as timestamped events grouped
//! into one bucket per calendar date. Buckets carry denormalized roll-up
//! fields (count, last record time) that must stay consistent with the
//! `records` list after every mutation; the mutators here are the only
//! code allowed to touch those fields.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Calendar-date key in `YYYY-MM-DD` form. Sorts chronologically as a string.
pub type DateKey = String;

/// Time label for legacy records that were stored without a clock time.
pub const NO_TIME_LABEL: &str = "기록 시간 없음";

/// A single recorded event (lapse) of the primary tracked behavior.
///
/// Immutable once created except for deletion. `time` is the display
/// label ("HH:MM"), `timestamp` the full RFC 3339 instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEvent {
    /// Unique within its date bucket.
    pub id: String,
    /// RFC 3339 creation instant.
    pub timestamp: String,
    /// "HH:MM" display label.
    pub time: String,
}

/// All events recorded on one calendar date, plus roll-up fields.
///
/// Invariants: `count == records.len()`; `last_record_time` equals the
/// `time` of the last element (append order, not timestamp order). An
/// empty bucket must never be kept in a store — remove the date key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub count: u32,
    pub last_record_time: String,
    pub records: Vec<HabitEvent>,
}

/// The whole persisted primary log: date key → bucket. Iteration order is
/// irrelevant; callers sort explicitly.
pub type HabitStore = HashMap<DateKey, DayBucket>;

impl DayBucket {
    /// Bucket containing exactly one event.
    pub fn single(event: HabitEvent) -> Self {
        Self {
            count: 1,
            last_record_time: event.time.clone(),
            records: vec![event],
        }
    }

    /// Append an event and refresh the roll-ups.
    pub fn push(&mut self, event: HabitEvent) {
        self.last_record_time = event.time.clone();
        self.records.push(event);
        self.count = self.records.len() as u32;
    }

    /// Remove the event with the given id, refreshing the roll-ups.
    ///
    /// Returns `false` when no record matched (silent no-op for callers).
    /// The caller is responsible for dropping the date key when the
    /// bucket becomes empty.
    pub fn remove(&mut self, event_id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != event_id);
        if self.records.len() == before {
            return false;
        }
        self.count = self.records.len() as u32;
        if let Some(last) = self.records.last() {
            self.last_record_time = last.time.clone();
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
