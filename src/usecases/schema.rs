//! Versioned decoder for the persisted primary log.
//!
//! The current wire shape is a `{date: bucket}` object. Early app
//! versions stored a bare JSON array of date strings; those payloads are
//! upgraded on read to one synthetic event per date and never rejected.
//! Current-shape buckets are healed field by field: a missing or zero
//! count falls back to 1, a missing or empty time label to the sentinel,
//! and a missing records list to one synthetic event. A partially-shaped
//! bucket must never cost the user their data.

use serde::Deserialize;

use crate::domain::record::{DayBucket, HabitEvent, HabitStore, NO_TIME_LABEL};

/// Current-shape bucket as it may actually appear on the wire: every
/// field optional, healed by [`heal_bucket`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDayBucket {
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    last_record_time: Option<String>,
    #[serde(default)]
    records: Option<Vec<HabitEvent>>,
}

/// The two wire shapes the primary log has ever been stored in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedHabitLog {
    /// Current shape: date key → day bucket, possibly partial.
    Current(std::collections::HashMap<String, RawDayBucket>),
    /// Legacy shape: bare array of `YYYY-MM-DD` strings.
    Legacy(Vec<String>),
}

/// Decode a persisted payload into the current store shape.
///
/// Legacy arrays are upgraded via [`upgrade_legacy_dates`]; partial
/// current-shape buckets are healed via [`heal_bucket`]. Payloads
/// matching neither shape return the JSON error for the caller to log.
pub fn decode_habit_log(payload: &str) -> Result<HabitStore, serde_json::Error> {
    match serde_json::from_str::<PersistedHabitLog>(payload)? {
        PersistedHabitLog::Current(raw) => Ok(raw
            .into_iter()
            .map(|(date, bucket)| {
                let healed = heal_bucket(&date, bucket);
                (date, healed)
            })
            .collect()),
        PersistedHabitLog::Legacy(dates) => Ok(upgrade_legacy_dates(dates)),
    }
}

/// Fill a partially-shaped bucket's missing fields: count falls back to
/// 1 (also when stored as 0), the time label to the sentinel, and an
/// absent records list to one synthetic event carrying that label.
fn heal_bucket(date: &str, raw: RawDayBucket) -> DayBucket {
    let last_record_time = match raw.last_record_time {
        Some(time) if !time.is_empty() => time,
        _ => NO_TIME_LABEL.to_string(),
    };
    let records = raw.records.unwrap_or_else(|| {
        vec![HabitEvent {
            id: format!("{date}-1"),
            timestamp: format!("{date}T00:00:00Z"),
            time: last_record_time.clone(),
        }]
    });
    let count = match raw.count {
        Some(count) if count > 0 => count,
        _ => 1,
    };

    DayBucket {
        count,
        last_record_time,
        records,
    }
}

/// Upgrade a legacy date list: one synthetic event per date with a
/// deterministic `"{date}-1"` id, a midnight timestamp, and the
/// "no time recorded" sentinel label.
pub fn upgrade_legacy_dates(dates: Vec<String>) -> HabitStore {
    dates
        .into_iter()
        .map(|date| {
            let bucket = DayBucket::single(HabitEvent {
                id: format!("{date}-1"),
                timestamp: format!("{date}T00:00:00Z"),
                time: NO_TIME_LABEL.to_string(),
            });
            (date, bucket)
        })
        .collect()
}
