//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies.
//!
//! Adapter categories:
//! - `persistence`: file-backed and in-memory key-value stores

pub mod persistence;
