//! Row-level deltas between two snapshots.

use super::data_source::DataKind;
use super::row::Row;
use super::snapshot::describe_pk;
use crate::errors::{DeltaError, Result};
use crate::value::{are_equal, Value};
use serde::{Deserialize, Serialize};

/// Classification of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Creation,
    Modification,
    Deletion,
}

impl ChangeType {
    pub const ALL: [ChangeType; 3] = [
        ChangeType::Creation,
        ChangeType::Modification,
        ChangeType::Deletion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Creation => "CREATION",
            ChangeType::Modification => "MODIFICATION",
            ChangeType::Deletion => "DELETION",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One differing column of a change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDiff {
    /// Upper-cased column name
    pub name: String,
    /// Position of the column in the change's column list
    pub index: usize,
    pub at_start_point: Value,
    pub at_end_point: Value,
}

/// A created, modified or deleted row.
///
/// - `Creation`: no row at start point, a row at end point;
/// - `Deletion`: the inverse;
/// - `Modification`: both rows, and at least one column differs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    data_source: String,
    data_kind: DataKind,
    /// `actor table` or `'<sql>' request`
    source_label: String,
    change_type: ChangeType,
    pk_names: Vec<String>,
    pk_values: Vec<Value>,
    row_at_start_point: Option<Row>,
    row_at_end_point: Option<Row>,
    modified: Vec<ColumnDiff>,
}

impl Change {
    /// A row present only at end point
    pub fn creation(data_source: impl Into<String>, data_kind: DataKind, row: Row) -> Self {
        let modified = presence_diffs(&row, |v| (Value::null_for_column(column_of(v)), v.clone()));
        let data_source = data_source.into();
        Self {
            source_label: default_label(&data_source, data_kind),
            data_source,
            data_kind,
            change_type: ChangeType::Creation,
            pk_names: row.pk_names().to_vec(),
            pk_values: row.pk_values().into_iter().cloned().collect(),
            row_at_start_point: None,
            row_at_end_point: Some(row),
            modified,
        }
    }

    /// A row present only at start point
    pub fn deletion(data_source: impl Into<String>, data_kind: DataKind, row: Row) -> Self {
        let modified = presence_diffs(&row, |v| (v.clone(), Value::null_for_column(column_of(v))));
        let data_source = data_source.into();
        Self {
            source_label: default_label(&data_source, data_kind),
            data_source,
            data_kind,
            change_type: ChangeType::Deletion,
            pk_names: row.pk_names().to_vec(),
            pk_values: row.pk_values().into_iter().cloned().collect(),
            row_at_start_point: Some(row),
            row_at_end_point: None,
            modified,
        }
    }

    /// Compare two rows with the same key, column by column by name.
    ///
    /// Returns `None` when every column is equal.
    ///
    /// # Errors
    ///
    /// `SchemaMismatch` when the two rows do not have the same column names.
    pub fn modification(
        data_source: impl Into<String>,
        data_kind: DataKind,
        start: Row,
        end: Row,
    ) -> Result<Option<Self>> {
        let data_source = data_source.into();
        let only_at_start: Vec<String> = start
            .column_names()
            .iter()
            .filter(|n| end.column_index(n).is_none())
            .cloned()
            .collect();
        let only_at_end: Vec<String> = end
            .column_names()
            .iter()
            .filter(|n| start.column_index(n).is_none())
            .cloned()
            .collect();
        if !only_at_start.is_empty() || !only_at_end.is_empty() {
            return Err(DeltaError::SchemaMismatch {
                data_source,
                pk: describe_pk(&start.pk_values()),
                only_at_start,
                only_at_end,
            });
        }

        let modified: Vec<ColumnDiff> = start
            .column_names()
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let before = start.value(index)?;
                let after = end.value_named(name)?;
                (!are_equal(before, after)).then(|| ColumnDiff {
                    name: name.clone(),
                    index,
                    at_start_point: before.clone(),
                    at_end_point: after.clone(),
                })
            })
            .collect();
        if modified.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            source_label: default_label(&data_source, data_kind),
            data_source,
            data_kind,
            change_type: ChangeType::Modification,
            pk_names: start.pk_names().to_vec(),
            pk_values: start.pk_values().into_iter().cloned().collect(),
            row_at_start_point: Some(start),
            row_at_end_point: Some(end),
            modified,
        }))
    }

    /// Replace the human label of the source, e.g. with the query text of
    /// a request
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn data_kind(&self) -> DataKind {
        self.data_kind
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn pk_names(&self) -> &[String] {
        &self.pk_names
    }

    pub fn pk_values(&self) -> &[Value] {
        &self.pk_values
    }

    pub fn row_at_start_point(&self) -> Option<&Row> {
        self.row_at_start_point.as_ref()
    }

    pub fn row_at_end_point(&self) -> Option<&Row> {
        self.row_at_end_point.as_ref()
    }

    /// Whether this change concerns the named source, case-insensitive
    pub fn is_on(&self, data_source: &str) -> bool {
        self.data_source.to_uppercase() == data_source.to_uppercase()
    }

    /// Columns in start-point order, or end-point order for a creation
    pub fn column_names(&self) -> &[String] {
        self.row_at_start_point
            .as_ref()
            .or(self.row_at_end_point.as_ref())
            .map(Row::column_names)
            .unwrap_or(&[])
    }

    pub fn column_count(&self) -> usize {
        self.column_names().len()
    }

    /// Start and end values of a column; NULL on an absent side
    ///
    /// # Errors
    ///
    /// `NotFound` when the change has no such column.
    pub fn column_values(&self, name: &str) -> Result<(Value, Value)> {
        let upper = name.to_uppercase();
        if !self.column_names().contains(&upper) {
            return Err(DeltaError::not_found("column", upper));
        }
        Ok((
            side_value(self.row_at_start_point.as_ref(), &upper),
            side_value(self.row_at_end_point.as_ref(), &upper),
        ))
    }

    /// Start and end values of the column at `index`
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` beyond the column count.
    pub fn column_values_at(&self, index: usize) -> Result<(Value, Value)> {
        let name = self
            .column_names()
            .get(index)
            .ok_or_else(|| DeltaError::index_out_of_range("columns", index, self.column_count()))?
            .clone();
        self.column_values(&name)
    }

    /// Differing columns; for creations and deletions the non-null columns
    pub fn modified_columns(&self) -> &[ColumnDiff] {
        &self.modified
    }

    pub fn indexes_of_modified_columns(&self) -> Vec<usize> {
        self.modified.iter().map(|d| d.index).collect()
    }

    /// Whether the key values equal `expected` position by position
    pub fn has_pk_values(&self, expected: &[Value]) -> bool {
        self.pk_values.len() == expected.len()
            && self
                .pk_values
                .iter()
                .zip(expected)
                .all(|(v, e)| are_equal(v, e))
    }
}

fn default_label(data_source: &str, data_kind: DataKind) -> String {
    match data_kind {
        DataKind::Table => format!("{} table", data_source),
        DataKind::Request => format!("'{}' request", data_source),
    }
}

fn side_value(row: Option<&Row>, name: &str) -> Value {
    row.and_then(|r| r.value_named(name))
        .cloned()
        .unwrap_or_else(|| Value::null_for_column(name))
}

fn column_of(value: &Value) -> String {
    value.column_name().unwrap_or_default().to_string()
}

fn presence_diffs<F>(row: &Row, pair: F) -> Vec<ColumnDiff>
where
    F: Fn(&Value) -> (Value, Value),
{
    row.values()
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(index, v)| {
            let (at_start_point, at_end_point) = pair(v);
            ColumnDiff {
                name: column_of(v),
                index,
                at_start_point,
                at_end_point,
            }
        })
        .collect()
}
