//! Database connection management

use crate::errors::{connection_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
///
/// # Errors
///
/// `Loader` when the file cannot be opened.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(connection_error)
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// `Loader` when SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(connection_error)
}

/// Make the connection read-only for the rest of its life
///
/// # Errors
///
/// `Loader` when the pragma is rejected.
pub fn configure_read_only(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA query_only = ON")
        .map_err(connection_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_rejects_writes() {
        let conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
        configure_read_only(&conn).unwrap();

        assert!(conn.execute("INSERT INTO t VALUES (1)", []).is_err());
    }
}
