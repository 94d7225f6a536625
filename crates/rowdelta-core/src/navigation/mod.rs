//! Memoized navigation over changes and snapshots.
//!
//! Every navigator holds its own cursors. Navigating twice to the same
//! index of the same owner returns the identical `Rc`, so chained
//! navigation can be repeated without building new objects.

pub mod change_nav;
pub mod changes_nav;
pub mod cursor;
pub mod data_nav;

pub use change_nav::{ChangeColumnNavigator, ChangeNavigator, ChangeRowNavigator};
pub use changes_nav::{ChangesNavigator, ChangesView};
pub use cursor::{CursorState, Point, TwoPointCursor};
pub use data_nav::{ColumnNavigator, RowNavigator, SnapshotNavigator};
