//! Change computation and the aggregate of changes.

pub mod changes;
pub mod engine;

pub use changes::{ChangeFilter, Changes};
pub use engine::compute_changes;
