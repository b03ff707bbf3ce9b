//! Persistence Adapters - KeyValueStore Implementations
//!
//! `FileKvStore` keeps one JSON file per key with atomic tmp+rename
//! writes; `InMemoryKvStore` backs tests and diskless wiring.
//! No database dependency — lightweight and crash-recoverable.

pub mod file_store;
pub mod memory;

pub use file_store::FileKvStore;
pub use memory::InMemoryKvStore;
