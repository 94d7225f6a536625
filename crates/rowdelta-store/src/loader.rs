//! [`DataLoader`] over a SQLite connection.

use crate::convert::{raw_value, sql_parameter, DeclaredType};
use crate::db;
use crate::errors::{connection_error, from_rusqlite, Result};
use rowdelta_core::model::{RequestSource, TableSource};
use rowdelta_core::{log_op_end, log_op_error, log_op_start};
use rowdelta_core::{DataLoader, DataSource, DeltaError, RawValue};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use std::time::Instant;

/// One entry of `PRAGMA table_info`
#[derive(Debug, Clone)]
struct TableColumn {
    name: String,
    declared: DeclaredType,
    /// 1-based position in the primary key, 0 when not part of it
    pk_position: i64,
}

/// Reads tables and requests from a SQLite database.
///
/// Table cells are converted according to the declared column types;
/// request cells only by storage class.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the database file at `path` for reading only
    ///
    /// Writers use their own connection; committed writes are visible to
    /// the next capture.
    ///
    /// # Errors
    ///
    /// `Loader` when the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        db::configure_read_only(&conn)?;
        Ok(Self::new(conn))
    }

    /// Open an empty in-memory database, writable so that it can be
    /// populated through [`SqliteLoader::connection`]
    ///
    /// # Errors
    ///
    /// `Loader` when SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        db::open_in_memory().map(Self::new)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn table_columns(&self, table: &TableSource) -> Result<Vec<TableColumn>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(|e| from_rusqlite(&table.name, e))?;
        let columns = stmt
            .query_map([table.name.as_str()], |row| {
                let name: String = row.get(0)?;
                let decl: Option<String> = row.get(1)?;
                let pk_position: i64 = row.get(2)?;
                Ok(TableColumn {
                    name,
                    declared: DeclaredType::of(decl.as_deref()),
                    pk_position,
                })
            })
            .map_err(|e| from_rusqlite(&table.name, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| from_rusqlite(&table.name, e))?;

        if columns.is_empty() {
            return Err(DeltaError::not_found("table", table.name.to_uppercase()));
        }
        Ok(columns)
    }

    fn table_rows(&self, table: &TableSource) -> Result<Vec<Vec<RawValue>>> {
        let columns = self.table_columns(table)?;
        let select = format!(
            "SELECT {} FROM {}",
            columns
                .iter()
                .map(|c| quote_identifier(&c.name))
                .collect::<Vec<_>>()
                .join(", "),
            quote_identifier(&table.name)
        );
        let declared: Vec<DeclaredType> = columns.iter().map(|c| c.declared).collect();

        let mut stmt = self
            .conn
            .prepare(&select)
            .map_err(|e| from_rusqlite(&table.name, e))?;
        let rows = stmt
            .query_map([], |row| {
                declared
                    .iter()
                    .enumerate()
                    .map(|(i, &d)| row.get_ref(i).map(|cell| raw_value(d, cell)))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(|e| from_rusqlite(&table.name, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| from_rusqlite(&table.name, e))?;
        Ok(rows)
    }

    fn request_columns(&self, request: &RequestSource) -> Result<Vec<String>> {
        let stmt = self
            .conn
            .prepare(&request.sql)
            .map_err(|e| from_rusqlite(&request.name, e))?;
        let names = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        Ok(names)
    }

    fn request_rows(&self, request: &RequestSource) -> Result<Vec<Vec<RawValue>>> {
        let mut stmt = self
            .conn
            .prepare(&request.sql)
            .map_err(|e| from_rusqlite(&request.name, e))?;
        let width = stmt.column_count();
        let params = params_from_iter(request.parameters.iter().map(sql_parameter));
        let rows = stmt
            .query_map(params, |row| {
                (0..width)
                    .map(|i| {
                        row.get_ref(i)
                            .map(|cell| raw_value(DeclaredType::Plain, cell))
                    })
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(|e| from_rusqlite(&request.name, e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| from_rusqlite(&request.name, e))?;
        Ok(rows)
    }
}

impl DataLoader for SqliteLoader {
    fn load_columns(&self, source: &DataSource) -> Result<Vec<String>> {
        match source {
            DataSource::Table(t) => Ok(self
                .table_columns(t)?
                .into_iter()
                .map(|c| c.name)
                .collect()),
            DataSource::Request(r) => self.request_columns(r),
        }
    }

    fn load_rows(&self, source: &DataSource) -> Result<Vec<Vec<RawValue>>> {
        let start = Instant::now();
        log_op_start!(
            "sqlite_load_rows",
            data_source = source.name(),
            data_kind = source.kind().as_str()
        );

        let result = match source {
            DataSource::Table(t) => self.table_rows(t),
            DataSource::Request(r) => self.request_rows(r),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(rows) => {
                log_op_end!(
                    "sqlite_load_rows",
                    duration_ms = duration_ms,
                    data_source = source.name(),
                    row_count = rows.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "sqlite_load_rows",
                    err.clone(),
                    duration_ms = duration_ms,
                    data_source = source.name()
                );
            }
        }
        result
    }

    fn primary_key_columns(&self, source: &DataSource) -> Result<Vec<String>> {
        match source {
            DataSource::Table(t) => {
                let mut keyed: Vec<TableColumn> = self
                    .table_columns(t)?
                    .into_iter()
                    .filter(|c| c.pk_position > 0)
                    .collect();
                keyed.sort_by_key(|c| c.pk_position);
                Ok(keyed.into_iter().map(|c| c.name).collect())
            }
            DataSource::Request(r) => Ok(r.pk_names.clone()),
        }
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .map_err(connection_error)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(connection_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(connection_error)?;
        Ok(names)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
