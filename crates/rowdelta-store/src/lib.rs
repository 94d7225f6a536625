//! rowdelta store - SQLite loader for snapshot capture
//!
//! Provides:
//! - Connection helpers
//! - Conversion of SQLite values to loader payloads, guided by declared types
//! - A [`DataLoader`](rowdelta_core::DataLoader) over tables and parameterized requests

pub mod convert;
pub mod db;
pub mod errors;
pub mod loader;

pub use loader::SqliteLoader;
