//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with the key-value port to implement the
//! engine's record workflows.
//!
//! Use cases:
//! - `HabitLog`: primary (abstinence) record repository
//! - `DrinkLog`: secondary (alcohol) record repository
//! - `CombinedTracker`: merged feed + cross-log delete/clear routing
//! - `SnapshotCache`: TTL cache shared by both repositories
//! - `schema`: versioned decoder for the primary log's wire shapes

pub mod cache;
pub mod combined;
pub mod drink_log;
pub mod habit_log;
pub mod schema;

pub use cache::SnapshotCache;
pub use combined::{CombinedFeed, CombinedRecord, CombinedTracker, RecordKind};
pub use drink_log::DrinkLog;
pub use habit_log::HabitLog;
