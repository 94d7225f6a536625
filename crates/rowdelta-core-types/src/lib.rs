//! Core types shared across rowdelta crates
//!
//! This crate provides foundational types used by the diff core, the
//! logging facility and the loaders:
//!
//! - **Correlation types**: SnapshotId, SessionId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{SessionId, SnapshotId};
