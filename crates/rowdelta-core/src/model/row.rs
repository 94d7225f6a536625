use crate::errors::{DeltaError, Result};
use crate::value::{are_equal, RawValue, Value, ValueKey};
use serde::Serialize;
use std::collections::HashSet;

/// One tuple of a snapshot.
///
/// Column names are upper-cased on construction; values are index-aligned
/// with them and carry their column name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    column_names: Vec<String>,
    values: Vec<Value>,
    pk_names: Vec<String>,
}

impl Row {
    /// Build a row from loader output
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the names and values differ in length, a
    /// column name repeats, or a key column is not among the columns.
    pub fn new<N, P>(column_names: N, raws: Vec<RawValue>, pk_names: P) -> Result<Self>
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let column_names = normalize(column_names);
        let pk_names = normalize(pk_names);

        if column_names.len() != raws.len() {
            return Err(DeltaError::invalid_argument(format!(
                "row has {} column names but {} values",
                column_names.len(),
                raws.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = column_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(DeltaError::invalid_argument(format!(
                "column name {} appears twice",
                dup
            )));
        }
        if let Some(missing) = pk_names.iter().find(|pk| !column_names.contains(pk)) {
            return Err(DeltaError::invalid_argument(format!(
                "primary key column {} is not a column of the row",
                missing
            )));
        }

        let values = column_names
            .iter()
            .zip(raws)
            .map(|(name, raw)| Value::with_column(name.clone(), raw))
            .collect();
        Ok(Self {
            column_names,
            values,
            pk_names,
        })
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn pk_names(&self) -> &[String] {
        &self.pk_names
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of a column, case-insensitive
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let upper = name.to_uppercase();
        self.column_names.iter().position(|n| *n == upper)
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of a column, case-insensitive
    pub fn value_named(&self, name: &str) -> Option<&Value> {
        self.column_index(name).and_then(|i| self.values.get(i))
    }

    /// Key column values in declaration order of the key
    pub fn pk_values(&self) -> Vec<&Value> {
        self.pk_names
            .iter()
            .filter_map(|pk| self.value_named(pk))
            .collect()
    }

    pub(crate) fn pk_keys(&self) -> Vec<ValueKey> {
        self.pk_values().into_iter().map(Value::key).collect()
    }

    pub(crate) fn value_keys(&self) -> Vec<ValueKey> {
        self.values.iter().map(Value::key).collect()
    }

    /// Whether the values equal `expected` position by position
    pub fn has_values(&self, expected: &[Value]) -> bool {
        self.values.len() == expected.len()
            && self
                .values
                .iter()
                .zip(expected)
                .all(|(v, e)| are_equal(v, e))
    }
}

pub(crate) fn normalize<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: i32, name: &str) -> Row {
        Row::new(
            ["id", "name"],
            vec![RawValue::I32(id), RawValue::from(name)],
            ["id"],
        )
        .unwrap()
    }

    #[test]
    fn test_names_are_upper_cased() {
        let row = actor(1, "Weaver");
        assert_eq!(row.column_names(), &["ID".to_string(), "NAME".to_string()]);
        assert_eq!(row.pk_names(), &["ID".to_string()]);
        assert_eq!(row.value_named("name").unwrap().column_name(), Some("NAME"));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let err = Row::new(["id", "name"], vec![RawValue::I32(1)], Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let err = Row::new(
            ["id", "ID"],
            vec![RawValue::I32(1), RawValue::I32(2)],
            Vec::<&str>::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ID appears twice"));
    }

    #[test]
    fn test_unknown_key_column_is_rejected() {
        let err = Row::new(["name"], vec![RawValue::from("x")], ["id"]).unwrap_err();
        assert!(matches!(err, DeltaError::InvalidArgument { .. }));
    }

    #[test]
    fn test_pk_values_and_has_values() {
        let row = actor(2, "Phoenix");
        assert_eq!(row.pk_values().len(), 1);
        assert!(are_equal(row.pk_values()[0], &Value::from(2_u64)));
        assert!(row.has_values(&[Value::from(2), Value::from("Phoenix")]));
        assert!(!row.has_values(&[Value::from(2)]));
    }
}
