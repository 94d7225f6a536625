//! Error helpers for rowdelta-store
//!
//! Every SQLite failure surfaces as a `Loader` error of the core taxonomy.

use rowdelta_core::DeltaError;

pub use rowdelta_core::Result;

/// Database error raised while reading `data_source`
pub fn from_rusqlite(data_source: &str, err: rusqlite::Error) -> DeltaError {
    DeltaError::Loader {
        data_source: data_source.to_string(),
        message: err.to_string(),
    }
}

/// Database error not tied to a data source (opening, catalog queries)
pub fn connection_error(err: rusqlite::Error) -> DeltaError {
    from_rusqlite("sqlite", err)
}
