//! TTL snapshot cache for a loaded log.
//!
//! One `{ value, stored_at }` slot owned by its repository instance and
//! passed in by construction, so tests get isolation for free. Writes
//! replace the snapshot (write-through) rather than merely clearing it.
//! Uses `tokio::time::Instant` so paused-clock tests can drive expiry.

use tokio::time::{Duration, Instant};

/// Default snapshot lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(5000);

/// Single-slot cache with time-based invalidation.
#[derive(Debug)]
pub struct SnapshotCache<T> {
    slot: Option<(T, Instant)>,
    ttl: Duration,
}

impl<T> SnapshotCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// The cached snapshot, if one exists and is still fresh.
    pub fn get(&self) -> Option<&T> {
        let (value, stored_at) = self.slot.as_ref()?;
        if stored_at.elapsed() < self.ttl {
            Some(value)
        } else {
            None
        }
    }

    /// Replace the snapshot and restart its lifetime.
    pub fn put(&mut self, value: T) {
        self.slot = Some((value, Instant::now()));
    }

    /// Drop the snapshot entirely.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
