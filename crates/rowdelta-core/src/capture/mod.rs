//! Loading data sources into snapshots and tracking them over time.

pub mod config;
pub mod loader;
pub mod snapshot;
pub mod tracker;

pub use config::TrackerConfig;
pub use loader::{DataLoader, MemoryLoader};
pub use snapshot::capture_snapshot;
pub use tracker::ChangeTracker;
