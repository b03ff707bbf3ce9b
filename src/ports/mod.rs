//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the engine requires from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `KeyValueStore`: durable storage of serialized text blobs by key

pub mod kv_store;

pub use kv_store::KeyValueStore;
