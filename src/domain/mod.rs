//! Domain layer - Core record and statistics logic.
//!
//! Pure types and math for the two tracked logs. No I/O here
//! (hexagonal architecture inner ring); everything is serializable
//! and testable in isolation.

pub mod calendar;
pub mod drink;
pub mod format;
pub mod record;
pub mod stats;
pub mod streak;

// Re-export core types for convenience
pub use calendar::DayMarker;
pub use drink::{
    DrinkDayBucket, DrinkEntry, DrinkError, DrinkRecord, DrinkStore, DrinkType, DrinkUnit,
};
pub use record::{DayBucket, HabitEvent, HabitStore};
pub use stats::DrinkStatistics;
