//! Tracker configuration loaded from TOML.
//!
//! ```toml
//! [[tables]]
//! name = "actor"
//! columns_to_exclude = ["birth"]
//!
//! [[requests]]
//! name = "recent_actors"
//! sql = "select * from actor where id > ?1"
//! parameters = [1]
//! pk_names = ["id"]
//! ```

use crate::errors::{DeltaError, Result};
use crate::model::{DataSource, RequestSource, TableSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Data sources a tracker captures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tables: Vec<TableSource>,
    #[serde(default)]
    pub requests: Vec<RequestSource>,
}

impl TrackerConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// `Config` on a parse error or a failed validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TrackerConfig = toml::from_str(content).map_err(|e| DeltaError::Config {
            message: format!("TOML parse error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    ///
    /// `Config` when the file cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DeltaError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject empty names, duplicate source names and requests without SQL
    ///
    /// # Errors
    ///
    /// `Config` naming the first offending source.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let names = self
            .tables
            .iter()
            .map(|t| &t.name)
            .chain(self.requests.iter().map(|r| &r.name));
        for name in names {
            if name.trim().is_empty() {
                return Err(config_error("data source name must not be empty"));
            }
            if !seen.insert(name.to_uppercase()) {
                return Err(config_error(&format!("duplicate data source name: {}", name)));
            }
        }
        if let Some(r) = self.requests.iter().find(|r| r.sql.trim().is_empty()) {
            return Err(config_error(&format!("request {} has no sql", r.name)));
        }
        Ok(())
    }

    /// Tables in declaration order, then requests in declaration order
    pub fn sources(&self) -> Vec<DataSource> {
        self.tables
            .iter()
            .cloned()
            .map(DataSource::Table)
            .chain(self.requests.iter().cloned().map(DataSource::Request))
            .collect()
    }
}

fn config_error(message: &str) -> DeltaError {
    DeltaError::Config {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tables_and_requests() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [[tables]]
            name = "actor"
            columns_to_check = ["id", "name"]

            [[tables]]
            name = "movie"
            columns_to_exclude = ["year"]

            [[requests]]
            name = "recent_actors"
            sql = "select * from actor where id > ?1"
            parameters = [1]
            pk_names = ["id"]
            "#,
        )
        .unwrap();

        let sources = config.sources();
        assert_eq!(sources.len(), 3);
        assert!(sources[0].is_named("ACTOR"));
        assert!(sources[1].is_named("movie"));
        match &sources[2] {
            DataSource::Request(r) => {
                assert_eq!(r.parameters, vec![serde_json::json!(1)]);
                assert_eq!(r.pk_names, vec!["id".to_string()]);
            }
            other => panic!("expected a request, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert!(config.sources().is_empty());
    }

    #[test]
    fn test_duplicate_names_are_rejected_case_insensitively() {
        let err = TrackerConfig::from_toml_str(
            r#"
            [[tables]]
            name = "actor"

            [[requests]]
            name = "ACTOR"
            sql = "select 1"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DeltaError::Config { .. }));
        assert!(err.to_string().contains("duplicate data source name"));
    }

    #[test]
    fn test_request_without_sql_is_rejected() {
        let err = TrackerConfig::from_toml_str(
            r#"
            [[requests]]
            name = "empty"
            sql = "  "
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("request empty has no sql"));
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let err = TrackerConfig::from_toml_str("[[tables]\nname=").unwrap_err();
        assert!(matches!(err, DeltaError::Config { .. }));
    }
}
