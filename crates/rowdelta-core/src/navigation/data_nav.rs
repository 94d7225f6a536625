//! Navigation over one snapshot, outside of any change.

use super::cursor::CursorState;
use crate::errors::{DeltaError, Result};
use crate::model::{Column, Row, Snapshot};
use crate::value::Value;
use std::rc::Rc;
use std::sync::Arc;

/// Rows and columns of a captured table or request
#[derive(Debug)]
pub struct SnapshotNavigator {
    snapshot: Arc<Snapshot>,
    rows: CursorState<RowNavigator>,
    columns: CursorState<ColumnNavigator>,
}

impl SnapshotNavigator {
    pub fn new(snapshot: impl Into<Arc<Snapshot>>) -> Self {
        Self {
            snapshot: snapshot.into(),
            rows: CursorState::new(),
            columns: CursorState::new(),
        }
    }

    pub fn get(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn row_cursor(&self) -> &CursorState<RowNavigator> {
        &self.rows
    }

    pub fn column_cursor(&self) -> &CursorState<ColumnNavigator> {
        &self.columns
    }

    fn build_row(&self, index: usize) -> Result<Rc<RowNavigator>> {
        let row = self
            .snapshot
            .row(index)
            .ok_or_else(|| DeltaError::index_out_of_range("rows", index, self.snapshot.row_count()))?;
        Ok(Rc::new(RowNavigator {
            row: row.clone(),
            index,
            values: CursorState::new(),
        }))
    }

    fn build_column(&self, index: usize) -> Result<Rc<ColumnNavigator>> {
        let column = self.snapshot.column(index).ok_or_else(|| {
            DeltaError::index_out_of_range("columns", index, self.snapshot.column_count())
        })?;
        Ok(Rc::new(ColumnNavigator {
            column,
            index,
            values: CursorState::new(),
        }))
    }

    /// Next row
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the last row.
    pub fn row(&self) -> Result<Rc<RowNavigator>> {
        self.rows
            .next_with("rows", self.snapshot.row_count(), |i| self.build_row(i))
    }

    /// Row at `index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside `[0, row count)`.
    pub fn row_at(&self, index: usize) -> Result<Rc<RowNavigator>> {
        self.rows
            .at_with("rows", index, self.snapshot.row_count(), |i| self.build_row(i))
    }

    /// Next column
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the last column.
    pub fn column(&self) -> Result<Rc<ColumnNavigator>> {
        self.columns
            .next_with("columns", self.snapshot.column_count(), |i| self.build_column(i))
    }

    /// Column at `index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside `[0, column count)`.
    pub fn column_at(&self, index: usize) -> Result<Rc<ColumnNavigator>> {
        self.columns.at_with(
            "columns",
            index,
            self.snapshot.column_count(),
            |i| self.build_column(i),
        )
    }

    /// Column by name, case-insensitive; same object as by index
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown column.
    pub fn column_named(&self, name: &str) -> Result<Rc<ColumnNavigator>> {
        let upper = name.to_uppercase();
        let index = self
            .snapshot
            .column_names()
            .iter()
            .position(|n| *n == upper)
            .ok_or_else(|| DeltaError::not_found("column", upper))?;
        self.column_at(index)
    }
}

fn build_value(values: &[Value], index: usize) -> Result<Rc<Value>> {
    values
        .get(index)
        .cloned()
        .map(Rc::new)
        .ok_or_else(|| DeltaError::index_out_of_range("values", index, values.len()))
}

/// One row of a snapshot
#[derive(Debug)]
pub struct RowNavigator {
    row: Row,
    index: usize,
    values: CursorState<Value>,
}

impl RowNavigator {
    pub fn get(&self) -> &Row {
        &self.row
    }

    /// Position of the row in its snapshot
    pub fn index(&self) -> usize {
        self.index
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last value.
    pub fn value(&self) -> Result<Rc<Value>> {
        self.values
            .next_with("values", self.row.len(), |i| build_value(self.row.values(), i))
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the row.
    pub fn value_at(&self, index: usize) -> Result<Rc<Value>> {
        self.values.at_with("values", index, self.row.len(), |i| {
            build_value(self.row.values(), i)
        })
    }

    /// Value by column name, case-insensitive
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown column.
    pub fn value_named(&self, name: &str) -> Result<Rc<Value>> {
        let index = self
            .row
            .column_index(name)
            .ok_or_else(|| DeltaError::not_found("column", name.to_uppercase()))?;
        self.value_at(index)
    }
}

/// One column of a snapshot, values in row order
#[derive(Debug)]
pub struct ColumnNavigator {
    column: Column,
    index: usize,
    values: CursorState<Value>,
}

impl ColumnNavigator {
    pub fn get(&self) -> &Column {
        &self.column
    }

    pub fn name(&self) -> &str {
        self.column.name()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` past the last row.
    pub fn value(&self) -> Result<Rc<Value>> {
        self.values.next_with("values", self.column.len(), |i| {
            build_value(self.column.values(), i)
        })
    }

    /// # Errors
    ///
    /// `IndexOutOfRange` outside the column.
    pub fn value_at(&self, index: usize) -> Result<Rc<Value>> {
        self.values.at_with("values", index, self.column.len(), |i| {
            build_value(self.column.values(), i)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataSource;
    use crate::value::RawValue;
    use bigdecimal::BigDecimal;

    fn snapshot() -> Snapshot {
        Snapshot::new(
            DataSource::table("actor"),
            ["id", "name"],
            ["id"],
            vec![
                vec![RawValue::I32(1), RawValue::from("Weaver")],
                vec![RawValue::I32(2), RawValue::from("Phoenix")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_then_values() {
        let nav = SnapshotNavigator::new(snapshot());
        let first = nav.row().unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(first.value().unwrap().as_number().unwrap(), BigDecimal::from(1));
        let name = first.value_named("Name").unwrap();
        assert!(Rc::ptr_eq(&name, &first.value_at(1).unwrap()));
        assert!(Rc::ptr_eq(&first, &nav.row_at(0).unwrap()));
        assert_eq!(nav.row().unwrap().index(), 1);
        assert!(matches!(
            nav.row().unwrap_err(),
            DeltaError::IndexOutOfRange { index: 2, end: 2, .. }
        ));
    }

    #[test]
    fn test_column_by_name_is_column_by_index() {
        let nav = SnapshotNavigator::new(snapshot());
        let by_name = nav.column_named("name").unwrap();
        assert!(Rc::ptr_eq(&by_name, &nav.column_at(1).unwrap()));
        assert_eq!(by_name.name(), "NAME");
        assert_eq!(by_name.value_at(1).unwrap().as_text().unwrap(), "Phoenix");
        assert_eq!(nav.column_cursor().next_index(), 0);
    }

    #[test]
    fn test_unknown_column_is_not_found() {
        let nav = SnapshotNavigator::new(snapshot());
        assert_eq!(
            nav.column_named("birth").unwrap_err(),
            DeltaError::not_found("column", "BIRTH")
        );
    }
}
