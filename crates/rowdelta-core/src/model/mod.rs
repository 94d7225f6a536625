pub mod change;
pub mod column;
pub mod data_source;
pub mod row;
pub mod snapshot;

pub use change::{Change, ChangeType, ColumnDiff};
pub use column::Column;
pub use data_source::{DataKind, DataSource, RequestSource, TableSource};
pub use row::Row;
pub use snapshot::{RowKey, Snapshot};
