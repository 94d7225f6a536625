//! Plain-text and Markdown rendering of rows, changes and change sets.
//!
//! Output is informational only; it uses [`represent`](crate::value::represent)
//! and never feeds back into equality.

mod grid;

pub mod change;
pub mod row;
pub mod summary;

pub use change::render_change;
pub use row::render_row;
pub use summary::render_changes_summary;
