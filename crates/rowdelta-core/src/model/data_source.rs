use serde::{Deserialize, Serialize};

/// Kind of data source a snapshot or change comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataKind {
    Table,
    Request,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Table => "TABLE",
            DataKind::Request => "REQUEST",
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table captured as a whole, optionally restricted to some columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    /// Table name as declared; compared case-insensitively
    pub name: String,

    /// Whitelist of columns to keep (all columns when absent)
    #[serde(default)]
    pub columns_to_check: Option<Vec<String>>,

    /// Blacklist of columns to drop, applied after the whitelist
    #[serde(default)]
    pub columns_to_exclude: Vec<String>,
}

/// The result of an arbitrary query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSource {
    /// Label used in lookups and diagnostics
    pub name: String,

    /// Query text handed to the loader as is
    pub sql: String,

    /// Positional parameters bound by the loader
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,

    /// Columns forming the correlation key; key-less when empty
    #[serde(default)]
    pub pk_names: Vec<String>,
}

/// Where the rows of a snapshot come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Table(TableSource),
    Request(RequestSource),
}

impl DataSource {
    /// A whole table
    pub fn table(name: impl Into<String>) -> Self {
        DataSource::Table(TableSource {
            name: name.into(),
            columns_to_check: None,
            columns_to_exclude: Vec::new(),
        })
    }

    /// A query with no declared key
    pub fn request(name: impl Into<String>, sql: impl Into<String>) -> Self {
        DataSource::Request(RequestSource {
            name: name.into(),
            sql: sql.into(),
            parameters: Vec::new(),
            pk_names: Vec::new(),
        })
    }

    /// Restrict a table to the given columns; no effect on requests
    pub fn with_columns_to_check<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        if let DataSource::Table(t) = &mut self {
            t.columns_to_check = Some(columns.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Drop the given columns of a table; no effect on requests
    pub fn with_columns_to_exclude<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        if let DataSource::Table(t) = &mut self {
            t.columns_to_exclude = columns.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Bind positional parameters of a request; no effect on tables
    pub fn with_parameters(mut self, parameters: Vec<serde_json::Value>) -> Self {
        if let DataSource::Request(r) = &mut self {
            r.parameters = parameters;
        }
        self
    }

    /// Declare the key columns of a request; no effect on tables
    pub fn with_pk_names<S: Into<String>>(mut self, pk_names: impl IntoIterator<Item = S>) -> Self {
        if let DataSource::Request(r) = &mut self {
            r.pk_names = pk_names.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            DataSource::Table(t) => &t.name,
            DataSource::Request(r) => &r.name,
        }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            DataSource::Table(_) => DataKind::Table,
            DataSource::Request(_) => DataKind::Request,
        }
    }

    /// Case-insensitive name match
    pub fn is_named(&self, name: &str) -> bool {
        self.name().to_uppercase() == name.to_uppercase()
    }

    /// Human label: `actor table` or `'select ...' request`
    pub fn label(&self) -> String {
        match self {
            DataSource::Table(t) => format!("{} table", t.name),
            DataSource::Request(r) => format!("'{}' request", r.sql),
        }
    }

    /// Apply the column whitelist and blacklist to upper-cased names,
    /// returning the indexes of the kept columns
    pub(crate) fn kept_columns(&self, column_names: &[String]) -> Vec<usize> {
        let DataSource::Table(t) = self else {
            return (0..column_names.len()).collect();
        };
        let check: Option<Vec<String>> = t
            .columns_to_check
            .as_ref()
            .map(|cols| cols.iter().map(|c| c.to_uppercase()).collect());
        let exclude: Vec<String> = t.columns_to_exclude.iter().map(|c| c.to_uppercase()).collect();
        column_names
            .iter()
            .enumerate()
            .filter(|(_, name)| check.as_ref().map_or(true, |c| c.contains(name)))
            .filter(|(_, name)| !exclude.contains(name))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_filters_are_case_insensitive() {
        let source = DataSource::table("actor")
            .with_columns_to_check(["id", "name", "birth"])
            .with_columns_to_exclude(["Birth"]);
        let kept = source.kept_columns(&names(&["ID", "NAME", "FIRSTNAME", "BIRTH"]));
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn test_request_keeps_every_column() {
        let source = DataSource::request("recent", "select * from actor");
        assert_eq!(source.kept_columns(&names(&["ID", "NAME"])), vec![0, 1]);
        assert_eq!(source.kind(), DataKind::Request);
        assert_eq!(source.label(), "'select * from actor' request");
    }

    #[test]
    fn test_is_named_ignores_case() {
        assert!(DataSource::table("actor").is_named("ACTOR"));
        assert!(!DataSource::table("actor").is_named("movie"));
        assert!(DataSource::table("straße").is_named("STRASSE"));
    }
}
