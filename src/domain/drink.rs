//! Alcohol-log domain types, drink presets, and ethanol math.
//!
//! A `DrinkRecord` is one drinking session: a timestamped event carrying
//! line items (`DrinkEntry`). Derived gram/volume totals are recomputed
//! on every change and never stored stale. Presets and unit volumes
//! mirror the Korean market defaults of the product.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::record::DateKey;

/// Ethanol density in g/ml, used to convert volume × ABV into grams.
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;

/// Pure ethanol in grams for a given volume and alcohol percentage.
///
/// `alcohol_grams(500.0, 4.5)` ≈ 17.7525.
pub fn alcohol_grams(volume_ml: f64, percentage: f64) -> f64 {
    volume_ml * percentage / 100.0 * ETHANOL_DENSITY_G_PER_ML
}

/// Validation failures when building a drink line item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrinkError {
    #[error("volume must be positive, got {0}")]
    NonPositiveVolume(String),
    #[error("alcohol percentage must be in [0, 100], got {0}")]
    PercentageOutOfRange(String),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Beverage category. Fixed set; statistics always report every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkType {
    Beer,
    Soju,
    Wine,
    Whiskey,
    Cocktail,
    Makgeolli,
    Other,
}

impl DrinkType {
    /// Every variant, in display order.
    pub const ALL: [Self; 7] = [
        Self::Beer,
        Self::Soju,
        Self::Wine,
        Self::Whiskey,
        Self::Cocktail,
        Self::Makgeolli,
        Self::Other,
    ];

    /// Korean display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Beer => "맥주",
            Self::Soju => "소주",
            Self::Wine => "와인",
            Self::Whiskey => "위스키",
            Self::Cocktail => "칵테일",
            Self::Makgeolli => "막걸리",
            Self::Other => "기타",
        }
    }

    /// Emoji icon for list rows and calendar legends.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Beer => "🍺",
            Self::Soju | Self::Makgeolli => "🍶",
            Self::Wine => "🍷",
            Self::Whiskey => "🥃",
            Self::Cocktail => "🍸",
            Self::Other => "🥤",
        }
    }

    /// Common serving presets for this drink type.
    ///
    /// The arrays live in `const` items so the returned borrows are
    /// `'static` (a slice literal built from `const fn` calls would be a
    /// stack temporary).
    pub fn presets(self) -> &'static [DrinkPreset] {
        const BEER: [DrinkPreset; 3] = [
            DrinkPreset::new(500.0, 4.5, DrinkUnit::Bottle),
            DrinkPreset::new(330.0, 5.0, DrinkUnit::Can),
            DrinkPreset::new(250.0, 4.5, DrinkUnit::Glass),
        ];
        const SOJU: [DrinkPreset; 2] = [
            DrinkPreset::new(360.0, 17.0, DrinkUnit::Bottle),
            DrinkPreset::new(50.0, 17.0, DrinkUnit::Shot),
        ];
        const WINE: [DrinkPreset; 2] = [
            DrinkPreset::new(750.0, 12.0, DrinkUnit::Bottle),
            DrinkPreset::new(150.0, 12.0, DrinkUnit::Glass),
        ];
        const WHISKEY: [DrinkPreset; 2] = [
            DrinkPreset::new(30.0, 40.0, DrinkUnit::Shot),
            DrinkPreset::new(700.0, 40.0, DrinkUnit::Bottle),
        ];
        const COCKTAIL: [DrinkPreset; 1] = [DrinkPreset::new(200.0, 15.0, DrinkUnit::Glass)];
        const MAKGEOLLI: [DrinkPreset; 2] = [
            DrinkPreset::new(750.0, 6.0, DrinkUnit::Bottle),
            DrinkPreset::new(200.0, 6.0, DrinkUnit::Cup),
        ];
        const OTHER: [DrinkPreset; 1] = [DrinkPreset::new(100.0, 0.0, DrinkUnit::Ml)];

        match self {
            Self::Beer => &BEER,
            Self::Soju => &SOJU,
            Self::Wine => &WINE,
            Self::Whiskey => &WHISKEY,
            Self::Cocktail => &COCKTAIL,
            Self::Makgeolli => &MAKGEOLLI,
            Self::Other => &OTHER,
        }
    }
}

impl std::fmt::Display for DrinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Serving unit for a drink line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkUnit {
    Bottle,
    Can,
    Glass,
    Shot,
    Cup,
    Ml,
}

impl DrinkUnit {
    /// Default serving volume in ml when no preset applies.
    pub fn default_volume_ml(self) -> f64 {
        match self {
            Self::Bottle => 500.0,
            Self::Can => 330.0,
            Self::Glass => 200.0,
            Self::Shot => 30.0,
            Self::Cup => 250.0,
            Self::Ml => 1.0,
        }
    }

    /// Korean display name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bottle => "병",
            Self::Can => "캔",
            Self::Glass | Self::Shot => "잔",
            Self::Cup => "컵",
            Self::Ml => "ml",
        }
    }
}

/// A predefined serving (volume + ABV + unit) offered by the record UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrinkPreset {
    pub volume_ml: f64,
    pub alcohol_percentage: f64,
    pub unit: DrinkUnit,
}

impl DrinkPreset {
    const fn new(volume_ml: f64, alcohol_percentage: f64, unit: DrinkUnit) -> Self {
        Self {
            volume_ml,
            alcohol_percentage,
            unit,
        }
    }
}

/// One line item inside a drinking session.
///
/// `alcohol_content` is derived: volume × quantity × ABV / 100 × 0.789.
/// Use [`DrinkEntry::new`] or the setters so it can never go stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DrinkType,
    /// Serving volume in ml (per unit, not multiplied by quantity).
    pub volume: f64,
    /// ABV in percent, 0–100.
    pub alcohol_percentage: f64,
    /// Derived ethanol grams across all `quantity` servings.
    pub alcohol_content: f64,
    /// Number of servings, at least 1.
    pub quantity: u32,
    pub unit: DrinkUnit,
}

impl DrinkEntry {
    /// Build a validated line item with its derived content computed.
    pub fn new(
        id: impl Into<String>,
        kind: DrinkType,
        volume: f64,
        alcohol_percentage: f64,
        quantity: u32,
        unit: DrinkUnit,
    ) -> Result<Self, DrinkError> {
        if !(volume > 0.0) {
            return Err(DrinkError::NonPositiveVolume(volume.to_string()));
        }
        if !(0.0..=100.0).contains(&alcohol_percentage) {
            return Err(DrinkError::PercentageOutOfRange(
                alcohol_percentage.to_string(),
            ));
        }
        if quantity == 0 {
            return Err(DrinkError::ZeroQuantity);
        }

        let mut entry = Self {
            id: id.into(),
            kind,
            volume,
            alcohol_percentage,
            alcohol_content: 0.0,
            quantity,
            unit,
        };
        entry.recompute_content();
        Ok(entry)
    }

    /// Build a line item from one of the type's presets.
    pub fn from_preset(
        id: impl Into<String>,
        kind: DrinkType,
        preset: &DrinkPreset,
        quantity: u32,
    ) -> Result<Self, DrinkError> {
        Self::new(
            id,
            kind,
            preset.volume_ml,
            preset.alcohol_percentage,
            quantity,
            preset.unit,
        )
    }

    /// Total poured volume across all servings, in ml.
    pub fn total_volume(&self) -> f64 {
        self.volume * f64::from(self.quantity)
    }

    /// Recompute the derived gram content from the current fields.
    pub fn recompute_content(&mut self) {
        self.alcohol_content = alcohol_grams(self.total_volume(), self.alcohol_percentage);
    }

    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        self.recompute_content();
    }

    pub fn set_percentage(&mut self, percentage: f64) {
        self.alcohol_percentage = percentage;
        self.recompute_content();
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.recompute_content();
    }
}

/// One drinking session: a timestamped event with line items and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkRecord {
    pub id: String,
    /// `YYYY-MM-DD` date this session belongs to.
    pub date: String,
    /// RFC 3339 creation instant.
    pub timestamp: String,
    /// "HH:MM" display label.
    pub time: String,
    pub drinks: Vec<DrinkEntry>,
    /// Sum of the line items' derived gram contents.
    pub total_alcohol_content: f64,
    /// Sum of the line items' `volume × quantity`, in ml.
    pub total_volume: f64,
}

impl DrinkRecord {
    /// Build a session with its totals computed from the line items.
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        timestamp: impl Into<String>,
        time: impl Into<String>,
        drinks: Vec<DrinkEntry>,
    ) -> Self {
        let mut record = Self {
            id: id.into(),
            date: date.into(),
            timestamp: timestamp.into(),
            time: time.into(),
            drinks,
            total_alcohol_content: 0.0,
            total_volume: 0.0,
        };
        record.recompute_totals();
        record
    }

    /// Recompute both totals from the line items.
    pub fn recompute_totals(&mut self) {
        self.total_alcohol_content = self.drinks.iter().map(|d| d.alcohol_content).sum();
        self.total_volume = self.drinks.iter().map(DrinkEntry::total_volume).sum();
    }
}

/// All drinking sessions on one calendar date, plus roll-up totals.
///
/// Same invariants as the primary log's `DayBucket`, extended to the two
/// numeric totals: they must equal the sums across `records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkDayBucket {
    pub records: Vec<DrinkRecord>,
    pub total_alcohol_content: f64,
    pub total_volume: f64,
    pub last_record_time: String,
}

/// The whole persisted alcohol log: date key → bucket.
pub type DrinkStore = HashMap<DateKey, DrinkDayBucket>;

impl DrinkDayBucket {
    /// Bucket containing exactly one session.
    pub fn single(record: DrinkRecord) -> Self {
        Self {
            total_alcohol_content: record.total_alcohol_content,
            total_volume: record.total_volume,
            last_record_time: record.time.clone(),
            records: vec![record],
        }
    }

    /// Append a session and add its contribution to the totals.
    pub fn push(&mut self, record: DrinkRecord) {
        self.total_alcohol_content += record.total_alcohol_content;
        self.total_volume += record.total_volume;
        self.last_record_time = record.time.clone();
        self.records.push(record);
    }

    /// Remove the session with the given id, subtracting its contribution.
    ///
    /// Returns `false` when no record matched. The caller drops the date
    /// key when the bucket becomes empty.
    pub fn remove(&mut self, record_id: &str) -> bool {
        let Some(index) = self.records.iter().position(|r| r.id == record_id) else {
            return false;
        };
        let removed = self.records.remove(index);
        self.total_alcohol_content -= removed.total_alcohol_content;
        self.total_volume -= removed.total_volume;
        if let Some(last) = self.records.last() {
            self.last_record_time = last.time.clone();
        }
        true
    }

    /// Replace the session with the given id in place, preserving its
    /// position: subtract the old contribution, add the new one.
    ///
    /// Returns `false` when no record matched.
    pub fn replace(&mut self, record_id: &str, updated: DrinkRecord) -> bool {
        let Some(index) = self.records.iter().position(|r| r.id == record_id) else {
            return false;
        };
        let old = &self.records[index];
        self.total_alcohol_content -= old.total_alcohol_content;
        self.total_volume -= old.total_volume;

        self.total_alcohol_content += updated.total_alcohol_content;
        self.total_volume += updated.total_volume;
        self.records[index] = updated;

        if let Some(last) = self.records.last() {
            self.last_record_time = last.time.clone();
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
