//! Navigation inside one change: its columns and its two rows.

use super::cursor::{CursorState, Point, TwoPointCursor};
use crate::errors::{DeltaError, Result};
use crate::model::{Change, Row};
use crate::value::Value;
use std::rc::Rc;
use std::sync::Arc;

/// One change reached from a [`ChangesNavigator`](super::ChangesNavigator)
#[derive(Debug)]
pub struct ChangeNavigator {
    change: Arc<Change>,
    position: usize,
    columns: CursorState<ChangeColumnNavigator>,
    rows: TwoPointCursor<ChangeRowNavigator>,
}

impl ChangeNavigator {
    pub(crate) fn new(change: Arc<Change>, position: usize) -> Self {
        Self {
            change,
            position,
            columns: CursorState::new(),
            rows: TwoPointCursor::new(),
        }
    }

    pub fn get(&self) -> &Arc<Change> {
        &self.change
    }

    /// Position of the change in the unfiltered list
    pub fn position(&self) -> usize {
        self.position
    }

    /// Column cursor state, for inspection
    pub fn column_cursor(&self) -> &CursorState<ChangeColumnNavigator> {
        &self.columns
    }

    fn build_column(&self, index: usize) -> Result<Rc<ChangeColumnNavigator>> {
        let name = self
            .change
            .column_names()
            .get(index)
            .cloned()
            .ok_or_else(|| DeltaError::index_out_of_range("columns", index, self.change.column_count()))?;
        Ok(Rc::new(ChangeColumnNavigator {
            change: Arc::clone(&self.change),
            name,
            index,
            values: TwoPointCursor::new(),
        }))
    }

    /// Next column
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` past the last column.
    pub fn column(&self) -> Result<Rc<ChangeColumnNavigator>> {
        self.columns
            .next_with("columns", self.change.column_count(), |i| self.build_column(i))
    }

    /// Column at `index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` outside `[0, column count)`.
    pub fn column_at(&self, index: usize) -> Result<Rc<ChangeColumnNavigator>> {
        self.columns
            .at_with("columns", index, self.change.column_count(), |i| self.build_column(i))
    }

    /// Column by name, case-insensitive; same object as by index
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown column.
    pub fn column_named(&self, name: &str) -> Result<Rc<ChangeColumnNavigator>> {
        let upper = name.to_uppercase();
        let index = self
            .change
            .column_names()
            .iter()
            .position(|n| *n == upper)
            .ok_or_else(|| DeltaError::not_found("column", upper))?;
        self.column_at(index)
    }

    fn row_at(&self, point: Point) -> Rc<ChangeRowNavigator> {
        self.rows.get_or_build(point, |point| {
            let row = match point {
                Point::Start => self.change.row_at_start_point(),
                Point::End => self.change.row_at_end_point(),
            };
            ChangeRowNavigator {
                data_source: self.change.data_source().to_string(),
                point,
                row: row.cloned(),
                values: CursorState::new(),
            }
        })
    }

    /// Row at start point; absent for a creation
    pub fn row_at_start_point(&self) -> Rc<ChangeRowNavigator> {
        self.row_at(Point::Start)
    }

    /// Row at end point; absent for a deletion
    pub fn row_at_end_point(&self) -> Rc<ChangeRowNavigator> {
        self.row_at(Point::End)
    }
}

/// One column of a change with its start and end values
#[derive(Debug)]
pub struct ChangeColumnNavigator {
    change: Arc<Change>,
    name: String,
    index: usize,
    values: TwoPointCursor<Value>,
}

impl ChangeColumnNavigator {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the column is among the modified columns of the change
    pub fn is_modified(&self) -> bool {
        self.change
            .modified_columns()
            .iter()
            .any(|d| d.index == self.index)
    }

    fn value(&self, point: Point) -> Result<Rc<Value>> {
        self.values.at_with(point, |point| {
            let (start, end) = self.change.column_values(&self.name)?;
            Ok(match point {
                Point::Start => start,
                Point::End => end,
            })
        })
    }

    /// Value at start point; NULL when there is no row at start point
    ///
    /// # Errors
    ///
    /// `NotFound` if the column vanished from the change, which cannot
    /// happen for a navigator built by [`ChangeNavigator`].
    pub fn value_at_start_point(&self) -> Result<Rc<Value>> {
        self.value(Point::Start)
    }

    /// Value at end point; NULL when there is no row at end point
    ///
    /// # Errors
    ///
    /// Same as [`ChangeColumnNavigator::value_at_start_point`].
    pub fn value_at_end_point(&self) -> Result<Rc<Value>> {
        self.value(Point::End)
    }
}

/// The row of a change at one point in time, possibly absent
#[derive(Debug)]
pub struct ChangeRowNavigator {
    data_source: String,
    point: Point,
    row: Option<Row>,
    values: CursorState<Value>,
}

impl ChangeRowNavigator {
    pub fn point(&self) -> Point {
        self.point
    }

    /// Whether a row exists at this point in time
    pub fn exists(&self) -> bool {
        self.row.is_some()
    }

    pub fn get(&self) -> Option<&Row> {
        self.row.as_ref()
    }

    fn present(&self) -> Result<&Row> {
        self.row.as_ref().ok_or_else(|| {
            DeltaError::not_found(format!("row at {}", self.point.as_str()), &self.data_source)
        })
    }

    fn build_value(row: &Row, index: usize) -> Result<Rc<Value>> {
        row.value(index)
            .cloned()
            .map(Rc::new)
            .ok_or_else(|| DeltaError::index_out_of_range("values", index, row.len()))
    }

    /// Next value of the row
    ///
    /// # Errors
    ///
    /// `NotFound` when the row is absent, `IndexOutOfRange` past the last
    /// value.
    pub fn value(&self) -> Result<Rc<Value>> {
        let row = self.present()?;
        self.values
            .next_with("values", row.len(), |i| Self::build_value(row, i))
    }

    /// Value at `index`
    ///
    /// # Errors
    ///
    /// `NotFound` when the row is absent, `IndexOutOfRange` outside the
    /// row.
    pub fn value_at(&self, index: usize) -> Result<Rc<Value>> {
        let row = self.present()?;
        self.values
            .at_with("values", index, row.len(), |i| Self::build_value(row, i))
    }

    /// Value by column name, case-insensitive; same object as by index
    ///
    /// # Errors
    ///
    /// `NotFound` when the row is absent or has no such column.
    pub fn value_named(&self, name: &str) -> Result<Rc<Value>> {
        let row = self.present()?;
        let index = row
            .column_index(name)
            .ok_or_else(|| DeltaError::not_found("column", name.to_uppercase()))?;
        self.value_at(index)
    }
}
