//! Rowdelta Core - Snapshot capture and change computation
//!
//! This crate captures the rows of tables and query results at two points
//! in time and computes the row-level changes between them:
//! - Typed values with total classification, equality, ordering and rendering
//! - Rows, columns and snapshots with primary-key correlation
//! - Deterministic change computation (creations, modifications, deletions)
//! - An indexed aggregate of changes with filtered lookups
//! - Memoized cursor-based navigation over changes and snapshots
//! - Start point / end point tracking through a pluggable loader

pub mod capture;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod navigation;
pub mod render;
pub mod value;

// Canonical field keys, used by the logging macros through `$crate`
pub use rowdelta_core_types::schema;

// Re-export commonly used types
pub use capture::{capture_snapshot, ChangeTracker, DataLoader, MemoryLoader, TrackerConfig};
pub use diff::{compute_changes, ChangeFilter, Changes};
pub use errors::{DeltaError, ExError, ExErrorKind, Result};
pub use model::{Change, ChangeType, Column, DataKind, DataSource, Row, Snapshot};
pub use navigation::{ChangesNavigator, SnapshotNavigator};
pub use value::{RawValue, Value, ValueType};
