//! Immutable captures of a data source.

use super::column::Column;
use super::data_source::{DataKind, DataSource};
use super::row::{normalize, Row};
use crate::errors::{DeltaError, Result};
use crate::value::{RawValue, Value, ValueKey};
use chrono::{DateTime, Utc};
use rowdelta_core_types::SnapshotId;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;

/// Correlation key of a row within a snapshot.
///
/// With declared key columns the ordinal is always 0. Without them the
/// key is the whole row plus its occurrence ordinal among identical rows,
/// so identical duplicates stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RowKey {
    values: Vec<ValueKey>,
    ordinal: usize,
}

impl RowKey {
    pub fn values(&self) -> &[ValueKey] {
        &self.values
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// The rows of one data source at one instant.
///
/// Rows keep loader order; `keys[i]` is the correlation key of `rows[i]`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    id: SnapshotId,
    source: DataSource,
    column_names: Vec<String>,
    pk_names: Vec<String>,
    rows: Vec<Row>,
    keys: Vec<RowKey>,
    #[serde(skip)]
    index: HashMap<RowKey, usize>,
    captured_at: DateTime<Utc>,
    digest: String,
}

impl Snapshot {
    /// Build a snapshot from loader output.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` when a tuple does not match the column list, a
    ///   key column is unknown, or two rows share a declared key;
    /// - `Internal` when the canonical encoding for the digest fails.
    pub fn new<N, P>(
        source: DataSource,
        column_names: N,
        pk_names: P,
        tuples: Vec<Vec<RawValue>>,
    ) -> Result<Self>
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let column_names = normalize(column_names);
        let pk_names = normalize(pk_names);

        let rows = tuples
            .into_iter()
            .map(|raws| Row::new(&column_names, raws, &pk_names))
            .collect::<Result<Vec<_>>>()?;

        let mut keys = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        let mut occurrences: HashMap<Vec<ValueKey>, usize> = HashMap::new();
        for (position, row) in rows.iter().enumerate() {
            let key = if pk_names.is_empty() {
                let values = row.value_keys();
                let seen = occurrences.entry(values.clone()).or_insert(0);
                let ordinal = *seen;
                *seen += 1;
                RowKey { values, ordinal }
            } else {
                RowKey {
                    values: row.pk_keys(),
                    ordinal: 0,
                }
            };
            if index.insert(key.clone(), position).is_some() {
                return Err(DeltaError::invalid_argument(format!(
                    "duplicate primary key {} in {}",
                    describe_pk(&row.pk_values()),
                    source.label()
                )));
            }
            keys.push(key);
        }

        let contents: Vec<Vec<ValueKey>> = rows.iter().map(Row::value_keys).collect();
        let digest = content_digest(&column_names, &pk_names, &contents)?;

        Ok(Self {
            id: SnapshotId::new(),
            source,
            column_names,
            pk_names,
            rows,
            keys,
            index,
            captured_at: Utc::now(),
            digest,
        })
    }

    pub fn id(&self) -> &SnapshotId {
        &self.id
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn data_kind(&self) -> DataKind {
        self.source.kind()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn pk_names(&self) -> &[String] {
        &self.pk_names
    }

    /// Whether rows are correlated by their full content
    pub fn is_keyless(&self) -> bool {
        self.pk_names.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Rows paired with their correlation keys, in loader order
    pub fn keyed_rows(&self) -> impl Iterator<Item = (&RowKey, &Row)> {
        self.keys.iter().zip(self.rows.iter())
    }

    pub fn row_by_key(&self, key: &RowKey) -> Option<&Row> {
        self.index.get(key).and_then(|&i| self.rows.get(i))
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// SHA-256 hex digest of the column list, key list and row contents
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    /// Column view at a position
    pub fn column(&self, index: usize) -> Option<Column> {
        let name = self.column_names.get(index)?;
        let values: Vec<Value> = self
            .rows
            .iter()
            .filter_map(|row| row.value(index).cloned())
            .collect();
        Some(Column::new(name.clone(), values))
    }

    /// Column view by name, case-insensitive
    pub fn column_named(&self, name: &str) -> Option<Column> {
        let upper = name.to_uppercase();
        let index = self.column_names.iter().position(|n| *n == upper)?;
        self.column(index)
    }
}

pub(crate) fn describe_pk(values: &[&Value]) -> String {
    if values.is_empty() {
        return "<none>".to_string();
    }
    values
        .iter()
        .map(|v| v.represent())
        .collect::<Vec<_>>()
        .join("/")
}

fn content_digest(
    column_names: &[String],
    pk_names: &[String],
    contents: &[Vec<ValueKey>],
) -> Result<String> {
    let canonical = serde_json::to_vec(&(column_names, pk_names, contents)).map_err(|e| {
        DeltaError::Internal {
            message: format!("canonical snapshot encoding failed: {}", e),
        }
    })?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actors(rows: &[(i32, &str)]) -> Snapshot {
        Snapshot::new(
            DataSource::table("actor"),
            ["id", "name"],
            ["id"],
            rows.iter()
                .map(|(id, name)| vec![RawValue::I32(*id), RawValue::from(*name)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rows_are_indexed_by_primary_key() {
        let snapshot = actors(&[(1, "Weaver"), (2, "Phoenix")]);
        let (key, _) = snapshot.keyed_rows().nth(1).unwrap();
        let row = snapshot.row_by_key(key).unwrap();
        assert!(row.has_values(&[Value::from(2), Value::from("Phoenix")]));
    }

    #[test]
    fn test_duplicate_declared_key_is_rejected() {
        let err = Snapshot::new(
            DataSource::table("actor"),
            ["id", "name"],
            ["id"],
            vec![
                vec![RawValue::I32(1), RawValue::from("a")],
                vec![RawValue::I64(1), RawValue::from("b")],
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate primary key 1"));
    }

    #[test]
    fn test_keyless_duplicates_get_ordinals() {
        let snapshot = Snapshot::new(
            DataSource::request("all", "select * from actor"),
            ["name"],
            Vec::<&str>::new(),
            vec![vec![RawValue::from("x")], vec![RawValue::from("x")]],
        )
        .unwrap();
        let ordinals: Vec<usize> = snapshot.keyed_rows().map(|(k, _)| k.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1]);
        assert!(snapshot.is_keyless());
    }

    #[test]
    fn test_digest_depends_on_content_only() {
        let a = actors(&[(1, "Weaver")]);
        let b = actors(&[(1, "Weaver")]);
        let c = actors(&[(1, "Weaver-updated")]);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_column_view() {
        let snapshot = actors(&[(1, "Weaver"), (2, "Phoenix")]);
        let column = snapshot.column_named("Name").unwrap();
        assert_eq!(column.name(), "NAME");
        assert_eq!(column.len(), 2);
        assert!(snapshot.column(5).is_none());
    }
}
