//! Property-Based Tests for Domain Logic
//!
//! Uses proptest to verify invariants of the bucket roll-ups, the streak
//! calculators, and the ethanol math across randomized inputs.

use std::collections::BTreeSet;

use chrono::{Duration as ChronoDuration, NaiveDate};
use proptest::prelude::*;

use habit_ledger::domain::drink::{
    alcohol_grams, DrinkDayBucket, DrinkEntry, DrinkRecord, DrinkType, DrinkUnit,
};
use habit_ledger::domain::record::{DayBucket, HabitEvent};
use habit_ledger::domain::streak::{current_streak, longest_streak, parse_date_keys};
use habit_ledger::usecases::schema::{decode_habit_log, upgrade_legacy_dates};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn date_at(offset_days: i64) -> NaiveDate {
    epoch() + ChronoDuration::days(offset_days)
}

fn habit_event(index: usize) -> HabitEvent {
    HabitEvent {
        id: format!("e{index}"),
        timestamp: format!("2024-01-15T{:02}:00:00+09:00", index % 24),
        time: format!("{:02}:00", index % 24),
    }
}

fn drink_session(index: usize, volume: f64, pct: f64, quantity: u32) -> DrinkRecord {
    let entry = DrinkEntry::new(
        format!("d{index}"),
        DrinkType::Beer,
        volume,
        pct,
        quantity,
        DrinkUnit::Bottle,
    )
    .unwrap();
    DrinkRecord::new(
        format!("r{index}"),
        "2024-01-15",
        format!("2024-01-15T{:02}:00:00+09:00", index % 24),
        format!("{:02}:00", index % 24),
        vec![entry],
    )
}

#[derive(Debug, Clone)]
enum BucketOp {
    Add,
    Remove(usize),
}

fn bucket_ops() -> impl Strategy<Value = Vec<BucketOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(BucketOp::Add),
            1 => (0usize..32).prop_map(BucketOp::Remove),
        ],
        1..40,
    )
}

proptest! {
    /// count and last_record_time track the records list through any
    /// interleaving of appends and deletions.
    #[test]
    fn prop_day_bucket_rollups_consistent(ops in bucket_ops()) {
        let mut bucket = DayBucket::single(habit_event(0));
        let mut next_id = 1usize;

        for op in ops {
            match op {
                BucketOp::Add => {
                    bucket.push(habit_event(next_id));
                    next_id += 1;
                }
                BucketOp::Remove(pick) => {
                    bucket.remove(&format!("e{}", pick % next_id));
                }
            }
            prop_assert_eq!(bucket.count as usize, bucket.records.len());
            if let Some(last) = bucket.records.last() {
                prop_assert_eq!(&bucket.last_record_time, &last.time);
            }
        }
    }

    /// The drink bucket's numeric totals always equal the sums over its
    /// records, through appends, deletions, and in-place replacements.
    #[test]
    fn prop_drink_bucket_totals_match_sums(
        ops in bucket_ops(),
        volume in 10.0f64..2000.0,
        pct in 0.0f64..60.0,
    ) {
        let mut bucket = DrinkDayBucket::single(drink_session(0, volume, pct, 1));
        let mut next_id = 1usize;

        for op in ops {
            match op {
                BucketOp::Add => {
                    bucket.push(drink_session(next_id, volume, pct, 2));
                    next_id += 1;
                }
                BucketOp::Remove(pick) => {
                    let id = format!("r{}", pick % next_id);
                    if pick % 3 == 0 {
                        bucket.replace(&id, drink_session(pick % next_id, volume / 2.0, pct, 1));
                    } else {
                        bucket.remove(&id);
                    }
                }
            }
            let grams: f64 = bucket.records.iter().map(|r| r.total_alcohol_content).sum();
            let ml: f64 = bucket.records.iter().map(|r| r.total_volume).sum();
            prop_assert!((bucket.total_alcohol_content - grams).abs() < 1e-6);
            prop_assert!((bucket.total_volume - ml).abs() < 1e-6);
        }
    }

    /// The longest run can never exceed the number of lapse dates, and a
    /// non-empty set always has a run of at least one.
    #[test]
    fn prop_longest_streak_bounded(offsets in prop::collection::btree_set(0i64..3650, 0..120)) {
        let dates: BTreeSet<NaiveDate> = offsets.iter().map(|&o| date_at(o)).collect();
        let run = longest_streak(&dates);
        prop_assert!(run as usize <= dates.len());
        prop_assert_eq!(run == 0, dates.is_empty());
    }

    /// A fully consecutive date range has a run equal to its length.
    #[test]
    fn prop_longest_streak_consecutive_range(start in 0i64..3000, len in 1i64..60) {
        let dates: BTreeSet<NaiveDate> = (start..start + len).map(date_at).collect();
        prop_assert_eq!(longest_streak(&dates) as i64, len);
    }

    /// The current streak is exactly the day distance from the latest
    /// lapse to today, floored at zero.
    #[test]
    fn prop_current_streak_is_distance_to_latest(
        offsets in prop::collection::btree_set(0i64..3650, 1..120),
        today_offset in 0i64..4000,
    ) {
        let dates: BTreeSet<NaiveDate> = offsets.iter().map(|&o| date_at(o)).collect();
        let today = date_at(today_offset);
        let latest = *dates.iter().next_back().unwrap();

        let expected = (today - latest).num_days().max(0) as u32;
        prop_assert_eq!(current_streak(&dates, today), expected);
    }

    /// Gram content scales linearly in volume and is zero iff ABV is zero.
    #[test]
    fn prop_alcohol_grams_linear(volume in 1.0f64..5000.0, pct in 0.0f64..100.0) {
        let one = alcohol_grams(volume, pct);
        let two = alcohol_grams(volume * 2.0, pct);
        prop_assert!(one >= 0.0);
        prop_assert!((two - one * 2.0).abs() < 1e-6);
        prop_assert_eq!(alcohol_grams(volume, 0.0), 0.0);
    }

    /// An entry's derived content matches the formula over its total
    /// poured volume for any valid quantity.
    #[test]
    fn prop_entry_content_includes_quantity(
        volume in 1.0f64..2000.0,
        pct in 0.0f64..100.0,
        quantity in 1u32..20,
    ) {
        let entry =
            DrinkEntry::new("d", DrinkType::Soju, volume, pct, quantity, DrinkUnit::Glass).unwrap();
        let expected = alcohol_grams(volume * f64::from(quantity), pct);
        prop_assert!((entry.alcohol_content - expected).abs() < 1e-6);
    }

    /// Current-shape payloads survive a serialize/decode round trip.
    #[test]
    fn prop_habit_store_round_trips(offsets in prop::collection::btree_set(0i64..3650, 0..30)) {
        let store: habit_ledger::domain::record::HabitStore = offsets
            .iter()
            .map(|&o| {
                let key = date_at(o).format("%Y-%m-%d").to_string();
                (key, DayBucket::single(habit_event(o as usize)))
            })
            .collect();

        let payload = serde_json::to_string(&store).unwrap();
        let decoded = decode_habit_log(&payload).unwrap();
        prop_assert_eq!(decoded, store);
    }

    /// Upgrading a legacy date list yields one single-event bucket per
    /// distinct date, and every upgraded key parses back as a date.
    #[test]
    fn prop_legacy_upgrade_one_bucket_per_date(
        offsets in prop::collection::btree_set(0i64..3650, 0..30),
    ) {
        let keys: Vec<String> = offsets
            .iter()
            .map(|&o| date_at(o).format("%Y-%m-%d").to_string())
            .collect();

        let store = upgrade_legacy_dates(keys.clone());
        prop_assert_eq!(store.len(), keys.len());
        for (date, bucket) in &store {
            prop_assert_eq!(bucket.count, 1);
            prop_assert_eq!(&bucket.records[0].id, &format!("{date}-1"));
        }

        let parsed = parse_date_keys(store.keys().map(String::as_str));
        prop_assert_eq!(parsed.len(), store.len());
    }
}
