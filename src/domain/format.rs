//! Date/time display labels and record ID generation.
//!
//! Display strings follow the product's Korean locale conventions.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use uuid::Uuid;

/// Sunday-first weekday labels, indexed by `num_days_from_sunday`.
const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

/// Long display form: `"2024-01-15"` → `"2024년 1월 15일 (월)"`.
///
/// An unparsable key is returned unchanged rather than erroring; the
/// caller is rendering, not validating.
pub fn format_display_date(date_key: &str) -> String {
    match NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
        Ok(date) => format!(
            "{}년 {}월 {}일 ({})",
            date.year(),
            date.month(),
            date.day(),
            weekday_label(date)
        ),
        Err(_) => date_key.to_string(),
    }
}

/// Short display form: `"2024-01-15"` → `"1/15 (월)"`.
pub fn format_date_short(date_key: &str) -> String {
    match NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
        Ok(date) => format!("{}/{} ({})", date.month(), date.day(), weekday_label(date)),
        Err(_) => date_key.to_string(),
    }
}

/// `YYYY-MM-DD` storage key for a date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "HH:MM" display label for an instant.
pub fn clock_time(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// Fresh record ID: `{date}-{unix_ms}-{8-char random}`.
///
/// The timestamp keeps IDs roughly sortable; the random suffix keeps two
/// records created within the same millisecond distinct.
pub fn generate_record_id(date_key: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{date_key}-{millis}-{}", &suffix[..8])
}
