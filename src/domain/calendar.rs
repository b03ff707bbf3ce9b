//! Calendar markers for the alcohol log.
//!
//! Condenses each date bucket into the small struct the calendar screen
//! renders: a capped dot count plus a color intensity tier derived from
//! the day's total ethanol grams.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::drink::DrinkStore;
use crate::domain::record::DateKey;

/// Most dots a single calendar cell will show.
pub const MAX_CALENDAR_DOTS: u32 = 5;

/// Render data for one marked calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMarker {
    /// Number of dots to draw, capped at [`MAX_CALENDAR_DOTS`].
    pub dots: u32,
    /// Color alpha in 0.3–1.0, heavier days render darker.
    pub intensity: f64,
    pub count: u32,
    pub last_record_time: String,
    pub total_alcohol_content: f64,
    pub total_volume: f64,
}

/// Intensity tier for a day's total grams: ≤20 light, ≤40 medium,
/// ≤60 heavy, above that full; 0.3 base when nothing was drunk.
fn intensity_for(grams: f64) -> f64 {
    if grams <= 0.0 {
        0.3
    } else if grams <= 20.0 {
        0.4
    } else if grams <= 40.0 {
        0.6
    } else if grams <= 60.0 {
        0.8
    } else {
        1.0
    }
}

/// Build the marker map for every date in the store.
pub fn drink_calendar_markers(store: &DrinkStore) -> HashMap<DateKey, DayMarker> {
    store
        .iter()
        .map(|(date, bucket)| {
            let count = bucket.records.len() as u32;
            (
                date.clone(),
                DayMarker {
                    dots: count.min(MAX_CALENDAR_DOTS),
                    intensity: intensity_for(bucket.total_alcohol_content),
                    count,
                    last_record_time: bucket.last_record_time.clone(),
                    total_alcohol_content: bucket.total_alcohol_content,
                    total_volume: bucket.total_volume,
                },
            )
        })
        .collect()
}
