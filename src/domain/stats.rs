//! Aggregation engine for the alcohol log.
//!
//! One pass over the per-date buckets produces all-time, this-week and
//! this-month totals plus a per-drink-type breakdown. Pure given the
//! loaded store and a reference date; a fail-soft empty store simply
//! yields all-zero output.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::domain::drink::{DrinkStore, DrinkType};
use crate::domain::streak::{current_streak, longest_streak, parse_date_keys};

/// Per-drink-type totals. `count` sums serving quantities, not line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub count: u32,
    pub alcohol_content: f64,
    pub volume: f64,
}

/// Full statistics snapshot for the alcohol log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkStatistics {
    pub total_days: u32,
    pub total_records: u32,
    pub total_alcohol_content: f64,
    pub total_volume: f64,

    pub this_week_days: u32,
    pub this_week_records: u32,
    pub this_week_alcohol: f64,
    pub this_week_volume: f64,

    pub this_month_days: u32,
    pub this_month_records: u32,
    pub this_month_alcohol: f64,
    pub this_month_volume: f64,

    /// Days since the last drinking day.
    pub current_streak: u32,
    /// Longest run of consecutive drinking days.
    pub longest_streak: u32,

    /// Always contains every `DrinkType`, even at zero.
    pub by_type: BTreeMap<DrinkType, TypeBreakdown>,
}

/// Monday of the week containing `today`; Sunday belongs to the week
/// that started six days earlier (Sunday is day 7).
fn start_of_week(today: NaiveDate) -> NaiveDate {
    let back = u64::from(today.weekday().num_days_from_monday());
    today - Days::new(back)
}

/// Compute the full statistics snapshot in one pass over the store.
pub fn drink_statistics(store: &DrinkStore, today: NaiveDate) -> DrinkStatistics {
    let week_start = start_of_week(today);
    let week_end = week_start + Days::new(6);
    let month_prefix = format!("{:04}-{:02}", today.year(), today.month());

    let mut stats = DrinkStatistics {
        total_days: 0,
        total_records: 0,
        total_alcohol_content: 0.0,
        total_volume: 0.0,
        this_week_days: 0,
        this_week_records: 0,
        this_week_alcohol: 0.0,
        this_week_volume: 0.0,
        this_month_days: 0,
        this_month_records: 0,
        this_month_alcohol: 0.0,
        this_month_volume: 0.0,
        current_streak: 0,
        longest_streak: 0,
        by_type: DrinkType::ALL
            .into_iter()
            .map(|t| (t, TypeBreakdown::default()))
            .collect(),
    };

    for (date_key, bucket) in store {
        stats.total_days += 1;
        stats.total_records += bucket.records.len() as u32;
        stats.total_alcohol_content += bucket.total_alcohol_content;
        stats.total_volume += bucket.total_volume;

        let in_week = NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
            .is_ok_and(|d| d >= week_start && d <= week_end);
        if in_week {
            stats.this_week_days += 1;
            stats.this_week_records += bucket.records.len() as u32;
            stats.this_week_alcohol += bucket.total_alcohol_content;
            stats.this_week_volume += bucket.total_volume;
        }

        if date_key.starts_with(&month_prefix) {
            stats.this_month_days += 1;
            stats.this_month_records += bucket.records.len() as u32;
            stats.this_month_alcohol += bucket.total_alcohol_content;
            stats.this_month_volume += bucket.total_volume;
        }

        for record in &bucket.records {
            for drink in &record.drinks {
                let entry = stats.by_type.entry(drink.kind).or_default();
                entry.count += drink.quantity;
                entry.alcohol_content += drink.alcohol_content;
                entry.volume += drink.total_volume();
            }
        }
    }

    let dates = parse_date_keys(store.keys().map(String::as_str));
    stats.current_streak = current_streak(&dates, today);
    stats.longest_streak = longest_streak(&dates);

    stats
}
