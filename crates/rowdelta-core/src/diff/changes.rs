//! The aggregate of changes across every tracked data source.

use crate::errors::{DeltaError, Result};
use crate::model::{Change, ChangeType, DataSource};
use crate::value::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Selection of changes by classification and/or source name.
///
/// Table names are stored upper-cased, so filters compare
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChangeFilter {
    change_type: Option<ChangeType>,
    table: Option<String>,
}

impl ChangeFilter {
    /// Every change
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_type(change_type: ChangeType) -> Self {
        Self {
            change_type: Some(change_type),
            table: None,
        }
    }

    pub fn on_table(table: &str) -> Self {
        Self {
            change_type: None,
            table: Some(table.to_uppercase()),
        }
    }

    pub fn of_type_on_table(change_type: ChangeType, table: &str) -> Self {
        Self {
            change_type: Some(change_type),
            table: Some(table.to_uppercase()),
        }
    }

    pub fn change_type(&self) -> Option<ChangeType> {
        self.change_type
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Same filter restricted to `change_type`
    pub fn with_type(&self, change_type: ChangeType) -> Self {
        Self {
            change_type: Some(change_type),
            table: self.table.clone(),
        }
    }

    pub fn matches(&self, change: &Change) -> bool {
        self.change_type.map_or(true, |t| change.change_type() == t)
            && self.table.as_deref().map_or(true, |t| change.is_on(t))
    }
}

impl std::fmt::Display for ChangeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("changes")?;
        if let Some(t) = self.change_type {
            write!(f, " of {}", t.as_str().to_lowercase())?;
        }
        if let Some(table) = &self.table {
            write!(f, " on table {}", table)?;
        }
        Ok(())
    }
}

type Positions = Vec<usize>;

/// Ordered, immutable list of changes with lazily built indices.
///
/// Order: source declaration order, then key discovery order within each
/// source. The indices store positions into that list; every query returns
/// handles to the same `Change` objects.
#[derive(Debug, Default)]
pub struct Changes {
    sources: Vec<DataSource>,
    changes: Vec<Arc<Change>>,
    every: OnceLock<Positions>,
    by_type: OnceLock<HashMap<ChangeType, Positions>>,
    by_table: OnceLock<HashMap<String, Positions>>,
    by_type_and_table: OnceLock<HashMap<(ChangeType, String), Positions>>,
}

impl Changes {
    /// Wrap changes already in source then discovery order
    pub fn new(sources: Vec<DataSource>, changes: Vec<Change>) -> Self {
        Self {
            sources,
            changes: changes.into_iter().map(Arc::new).collect(),
            ..Self::default()
        }
    }

    /// The sources the changes were computed for, in declaration order
    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn all(&self) -> &[Arc<Change>] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether `name` is a tracked source (or has changes), case-insensitive
    pub fn knows_table(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s.is_named(name)) || self.changes.iter().any(|c| c.is_on(name))
    }

    fn every(&self) -> &Positions {
        self.every.get_or_init(|| (0..self.changes.len()).collect())
    }

    fn by_type(&self) -> &HashMap<ChangeType, Positions> {
        self.by_type.get_or_init(|| {
            let mut index: HashMap<ChangeType, Positions> = HashMap::new();
            for (i, change) in self.changes.iter().enumerate() {
                index.entry(change.change_type()).or_default().push(i);
            }
            index
        })
    }

    fn by_table(&self) -> &HashMap<String, Positions> {
        self.by_table.get_or_init(|| {
            let mut index: HashMap<String, Positions> = HashMap::new();
            for (i, change) in self.changes.iter().enumerate() {
                index
                    .entry(change.data_source().to_uppercase())
                    .or_default()
                    .push(i);
            }
            index
        })
    }

    fn by_type_and_table(&self) -> &HashMap<(ChangeType, String), Positions> {
        self.by_type_and_table.get_or_init(|| {
            let mut index: HashMap<(ChangeType, String), Positions> = HashMap::new();
            for (i, change) in self.changes.iter().enumerate() {
                index
                    .entry((change.change_type(), change.data_source().to_uppercase()))
                    .or_default()
                    .push(i);
            }
            index
        })
    }

    /// Positions in [`Changes::all`] selected by `filter`
    ///
    /// # Errors
    ///
    /// `NotFound` when the filter names a table that is not tracked.
    pub fn positions(&self, filter: &ChangeFilter) -> Result<Cow<'_, [usize]>> {
        if let Some(table) = filter.table() {
            if !self.knows_table(table) {
                return Err(DeltaError::not_found("table", table));
            }
        }
        let positions = match (filter.change_type(), filter.table()) {
            (None, None) => Some(self.every()),
            (Some(t), None) => self.by_type().get(&t),
            (None, Some(table)) => self.by_table().get(table),
            (Some(t), Some(table)) => self.by_type_and_table().get(&(t, table.to_string())),
        };
        Ok(Cow::Borrowed(positions.map(Vec::as_slice).unwrap_or(&[])))
    }

    /// Changes selected by `filter`, in list order
    ///
    /// # Errors
    ///
    /// `NotFound` when the filter names a table that is not tracked.
    pub fn filter(&self, filter: &ChangeFilter) -> Result<Vec<Arc<Change>>> {
        Ok(self
            .positions(filter)?
            .iter()
            .map(|&i| Arc::clone(&self.changes[i]))
            .collect())
    }

    /// Number of changes selected by `filter`
    ///
    /// # Errors
    ///
    /// `NotFound` when the filter names a table that is not tracked.
    pub fn count(&self, filter: &ChangeFilter) -> Result<usize> {
        Ok(self.positions(filter)?.len())
    }

    /// The `index`-th change selected by `filter`
    ///
    /// # Errors
    ///
    /// - `NotFound` for an untracked table
    /// - `IndexOutOfRange` when `index` is past the selection
    pub fn get(&self, filter: &ChangeFilter, index: usize) -> Result<Arc<Change>> {
        let position = self.position_of(filter, index)?;
        Ok(Arc::clone(&self.changes[position]))
    }

    /// Position in [`Changes::all`] of the `index`-th change selected by
    /// `filter`
    ///
    /// # Errors
    ///
    /// Same as [`Changes::get`].
    pub fn position_of(&self, filter: &ChangeFilter, index: usize) -> Result<usize> {
        let positions = self.positions(filter)?;
        positions.get(index).copied().ok_or_else(|| {
            DeltaError::index_out_of_range(filter.to_string(), index, positions.len())
        })
    }

    /// The change on `table` whose key values equal `pk_values`, with its
    /// position in [`Changes::all`]
    ///
    /// # Errors
    ///
    /// `NotFound` for an untracked table or when no change has that key.
    pub fn find_by_pk(&self, table: &str, pk_values: &[Value]) -> Result<(usize, Arc<Change>)> {
        let positions = self.positions(&ChangeFilter::on_table(table))?;
        positions
            .iter()
            .find(|&&i| self.changes[i].has_pk_values(pk_values))
            .map(|&i| (i, Arc::clone(&self.changes[i])))
            .ok_or_else(|| {
                let pk: Vec<String> = pk_values.iter().map(Value::represent).collect();
                DeltaError::not_found(
                    format!("change on table {}", table.to_uppercase()),
                    format!("primary key {}", pk.join("/")),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataKind, Row};
    use crate::value::RawValue;

    fn row(id: i32, name: &str) -> Row {
        Row::new(
            ["id", "name"],
            vec![RawValue::I32(id), RawValue::from(name)],
            ["id"],
        )
        .unwrap()
    }

    fn sample() -> Changes {
        let actor = DataSource::table("actor");
        let movie = DataSource::table("movie");
        let genre = DataSource::table("genre");
        Changes::new(
            vec![actor, movie, genre],
            vec![
                Change::creation("actor", DataKind::Table, row(4, "Murray")),
                Change::deletion("actor", DataKind::Table, row(3, "Worthington")),
                Change::creation("movie", DataKind::Table, row(9, "Ghostbusters")),
            ],
        )
    }

    #[test]
    fn test_filters_by_type_and_table() {
        let changes = sample();
        assert_eq!(changes.count(&ChangeFilter::all()).unwrap(), 3);
        assert_eq!(
            changes
                .count(&ChangeFilter::of_type(ChangeType::Creation))
                .unwrap(),
            2
        );
        assert_eq!(changes.count(&ChangeFilter::on_table("Actor")).unwrap(), 2);
        let movie_creations = changes
            .filter(&ChangeFilter::of_type_on_table(ChangeType::Creation, "MOVIE"))
            .unwrap();
        assert_eq!(movie_creations.len(), 1);
        assert!(Arc::ptr_eq(&movie_creations[0], &changes.all()[2]));
    }

    #[test]
    fn test_filter_matches_agrees_with_index() {
        let changes = sample();
        let filter = ChangeFilter::of_type_on_table(ChangeType::Deletion, "actor");
        let scanned: Vec<usize> = changes
            .all()
            .iter()
            .enumerate()
            .filter(|(_, c)| filter.matches(c))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changes.positions(&filter).unwrap().to_vec(), scanned);
    }

    #[test]
    fn test_known_table_without_changes_is_empty() {
        let changes = sample();
        assert!(changes.filter(&ChangeFilter::on_table("genre")).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_table_is_not_found() {
        let err = sample().filter(&ChangeFilter::on_table("nope")).unwrap_err();
        assert_eq!(err, DeltaError::not_found("table", "NOPE"));
    }

    #[test]
    fn test_get_reports_bounds_of_the_selection() {
        let changes = sample();
        let err = changes
            .get(&ChangeFilter::of_type(ChangeType::Creation), 2)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Index 2 out of the limits of changes of creation [0, 2)"
        );
    }

    #[test]
    fn test_find_by_pk() {
        let changes = sample();
        let (position, change) = changes.find_by_pk("ACTOR", &[Value::from(3_i64)]).unwrap();
        assert_eq!(position, 1);
        assert_eq!(change.change_type(), ChangeType::Deletion);
        assert!(matches!(
            changes.find_by_pk("actor", &[Value::from(99)]).unwrap_err(),
            DeltaError::NotFound { .. }
        ));
    }
}
