//! The loader interface and an in-memory implementation.

use crate::errors::{DeltaError, Result};
use crate::model::DataSource;
use crate::value::{are_equal, RawValue, Value};
use std::collections::BTreeMap;

/// Source of column names and row tuples for a data source.
///
/// Implementations perform the I/O; the core never does. Rows must be
/// index-aligned with the columns returned by `load_columns`.
pub trait DataLoader {
    /// Column names in result order
    ///
    /// # Errors
    ///
    /// Implementation-defined, usually `Loader` or `NotFound`.
    fn load_columns(&self, source: &DataSource) -> Result<Vec<String>>;

    /// Row tuples in result order
    ///
    /// # Errors
    ///
    /// Implementation-defined, usually `Loader` or `NotFound`.
    fn load_rows(&self, source: &DataSource) -> Result<Vec<Vec<RawValue>>>;

    /// Declared primary key columns of a table; may be empty
    ///
    /// # Errors
    ///
    /// Implementation-defined, usually `Loader` or `NotFound`.
    fn primary_key_columns(&self, source: &DataSource) -> Result<Vec<String>>;

    /// Every table the loader can read, used when nothing is configured
    ///
    /// # Errors
    ///
    /// Implementation-defined, usually `Loader`.
    fn list_tables(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Default)]
struct MemoryTable {
    columns: Vec<String>,
    pk_names: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl MemoryTable {
    fn pk_positions(&self) -> Vec<usize> {
        self.pk_names
            .iter()
            .filter_map(|pk| self.columns.iter().position(|c| c == pk))
            .collect()
    }
}

fn matches_pk(row: &[RawValue], positions: &[usize], pk_values: &[Value]) -> bool {
    positions.len() == pk_values.len()
        && positions.iter().zip(pk_values).all(|(&p, expected)| {
            row.get(p)
                .is_some_and(|raw| are_equal(&Value::new(raw.clone()), expected))
        })
}

/// Tables and canned request results held in memory.
///
/// Table names and column names are upper-cased; requests are keyed by
/// their query text.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    tables: BTreeMap<String, MemoryTable>,
    requests: BTreeMap<String, MemoryTable>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) an empty table
    pub fn create_table<C, P>(&mut self, name: &str, columns: C, pk_names: P) -> &mut Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let table = MemoryTable {
            columns: upper(columns),
            pk_names: upper(pk_names),
            rows: Vec::new(),
        };
        self.tables.insert(name.to_uppercase(), table);
        self
    }

    /// Register the result a request with this query text returns
    pub fn define_request<C>(&mut self, sql: &str, columns: C, rows: Vec<Vec<RawValue>>) -> &mut Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let result = MemoryTable {
            columns: upper(columns),
            pk_names: Vec::new(),
            rows,
        };
        self.requests.insert(sql.to_string(), result);
        self
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(&name.to_uppercase())
            .ok_or_else(|| DeltaError::not_found("table", name.to_uppercase()))
    }

    /// Append a row
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown table, `InvalidArgument` when the row
    /// length differs from the column count.
    pub fn insert(&mut self, table: &str, row: Vec<RawValue>) -> Result<()> {
        let t = self.table_mut(table)?;
        if row.len() != t.columns.len() {
            return Err(DeltaError::invalid_argument(format!(
                "{} values for {} columns of {}",
                row.len(),
                t.columns.len(),
                table.to_uppercase()
            )));
        }
        t.rows.push(row);
        Ok(())
    }

    /// Set one column of the rows whose key equals `pk_values`; returns
    /// the number of updated rows
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown table or column.
    pub fn update(
        &mut self,
        table: &str,
        pk_values: &[Value],
        column: &str,
        value: RawValue,
    ) -> Result<usize> {
        let t = self.table_mut(table)?;
        let upper_column = column.to_uppercase();
        let target = t
            .columns
            .iter()
            .position(|c| *c == upper_column)
            .ok_or_else(|| DeltaError::not_found("column", upper_column))?;
        let positions = t.pk_positions();
        let mut updated = 0;
        for row in t.rows.iter_mut() {
            if matches_pk(row, &positions, pk_values) {
                row[target] = value.clone();
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Remove the rows whose key equals `pk_values`; returns the number of
    /// removed rows
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown table.
    pub fn delete(&mut self, table: &str, pk_values: &[Value]) -> Result<usize> {
        let t = self.table_mut(table)?;
        let positions = t.pk_positions();
        let before = t.rows.len();
        t.rows.retain(|row| !matches_pk(row, &positions, pk_values));
        Ok(before - t.rows.len())
    }

    fn resolve(&self, source: &DataSource) -> Result<&MemoryTable> {
        match source {
            DataSource::Table(t) => self
                .tables
                .get(&t.name.to_uppercase())
                .ok_or_else(|| DeltaError::not_found("table", t.name.to_uppercase())),
            DataSource::Request(r) => self
                .requests
                .get(&r.sql)
                .ok_or_else(|| DeltaError::not_found("request", r.sql.clone())),
        }
    }
}

impl DataLoader for MemoryLoader {
    fn load_columns(&self, source: &DataSource) -> Result<Vec<String>> {
        Ok(self.resolve(source)?.columns.clone())
    }

    fn load_rows(&self, source: &DataSource) -> Result<Vec<Vec<RawValue>>> {
        Ok(self.resolve(source)?.rows.clone())
    }

    fn primary_key_columns(&self, source: &DataSource) -> Result<Vec<String>> {
        Ok(self.resolve(source)?.pk_names.clone())
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }
}

fn upper<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_uppercase())
        .collect()
}
