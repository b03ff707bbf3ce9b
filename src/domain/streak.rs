//! Streak calculator — pure, deterministic, no I/O.
//!
//! Semantics are inverted from intuition: a date with a recorded event is
//! a *lapse*, not a success. `current_streak` counts days since the most
//! recent lapse; `longest_streak` measures the longest run of consecutive
//! lapse days (worst-case cluster size), which is a different axis — see
//! DESIGN.md for why the name is kept as-is.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Parse `YYYY-MM-DD` keys into sorted unique dates, skipping any key
/// that does not parse.
pub fn parse_date_keys<'a, I>(keys: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter_map(|k| NaiveDate::parse_from_str(k, "%Y-%m-%d").ok())
        .collect()
}

/// Days elapsed since the most recent lapse, relative to `today`.
///
/// Empty input returns 0: with no recorded lapse there is no reference
/// point for when tracking began, so no streak can be asserted. A lapse
/// on `today` itself also returns 0.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last_lapse) = dates.iter().next_back() else {
        return 0;
    };
    let diff = (today - *last_lapse).num_days();
    if diff <= 0 {
        return 0;
    }
    diff as u32
}

/// Longest run of consecutive calendar days that each contain a lapse.
///
/// Empty input returns 0; a single date counts as a run of 1. The final
/// run is included.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut iter = dates.iter();
    let Some(mut prev) = iter.next().copied() else {
        return 0;
    };

    let mut max_run: u32 = 1;
    let mut run: u32 = 1;
    for date in iter {
        if (*date - prev).num_days() == 1 {
            run += 1;
        } else {
            max_run = max_run.max(run);
            run = 1;
        }
        prev = *date;
    }
    max_run.max(run)
}
