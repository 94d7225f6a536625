//! Mapping between SQLite storage classes and loader payloads.
//!
//! SQLite stores dates, UUIDs and decimals as text, integers or blobs. The
//! declared column type decides how such a cell is read back; cells that do
//! not parse keep their storage class.

use bigdecimal::BigDecimal;
use rowdelta_core::value::{parse_date, parse_date_time, parse_time};
use rowdelta_core::RawValue;
use rusqlite::types::{Value as SqlValue, ValueRef};
use std::str::FromStr;
use uuid::Uuid;

/// Affinity of a declared column type, as far as payload mapping cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Boolean,
    Date,
    Time,
    DateTime,
    Uuid,
    Decimal,
    Plain,
}

impl DeclaredType {
    /// Classify a declared type name (`None` for expressions and requests)
    pub fn of(decl: Option<&str>) -> Self {
        let Some(decl) = decl else {
            return DeclaredType::Plain;
        };
        let decl = decl.to_ascii_uppercase();
        if decl.contains("BOOL") {
            DeclaredType::Boolean
        } else if decl.contains("TIMESTAMP") || decl.contains("DATETIME") {
            DeclaredType::DateTime
        } else if decl.contains("DATE") {
            DeclaredType::Date
        } else if decl.contains("TIME") {
            DeclaredType::Time
        } else if decl.contains("UUID") {
            DeclaredType::Uuid
        } else if decl.contains("DECIMAL") || decl.contains("NUMERIC") {
            DeclaredType::Decimal
        } else {
            DeclaredType::Plain
        }
    }
}

/// Read one cell
pub fn raw_value(declared: DeclaredType, cell: ValueRef<'_>) -> RawValue {
    let plain = || plain_value(cell);
    match (declared, cell) {
        (_, ValueRef::Null) => RawValue::Null,
        (DeclaredType::Boolean, ValueRef::Integer(i)) => RawValue::Bool(i != 0),
        (DeclaredType::Date, ValueRef::Text(t)) => text(t)
            .and_then(|s| parse_date(&s).ok())
            .map_or_else(plain, RawValue::Date),
        (DeclaredType::Time, ValueRef::Text(t)) => text(t)
            .and_then(|s| parse_time(&s).ok())
            .map_or_else(plain, RawValue::Time),
        (DeclaredType::DateTime, ValueRef::Text(t)) => text(t)
            .and_then(|s| parse_date_time(&s.replacen(' ', "T", 1)).ok())
            .map_or_else(plain, RawValue::DateTime),
        (DeclaredType::Uuid, ValueRef::Text(t)) => text(t)
            .and_then(|s| Uuid::parse_str(&s).ok())
            .map_or_else(plain, RawValue::Uuid),
        (DeclaredType::Uuid, ValueRef::Blob(b)) => Uuid::from_slice(b)
            .map(RawValue::Uuid)
            .unwrap_or_else(|_| plain()),
        (DeclaredType::Decimal, ValueRef::Text(t)) => text(t)
            .and_then(|s| BigDecimal::from_str(&s).ok())
            .map_or_else(plain, RawValue::Decimal),
        _ => plain(),
    }
}

fn plain_value(cell: ValueRef<'_>) -> RawValue {
    match cell {
        ValueRef::Null => RawValue::Null,
        ValueRef::Integer(i) => RawValue::I64(i),
        ValueRef::Real(f) => RawValue::F64(f),
        ValueRef::Text(t) => RawValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => RawValue::Bytes(b.to_vec()),
    }
}

fn text(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_string)
}

/// Bind a JSON request parameter
///
/// Integers stay integers, other numbers become reals. Arrays and objects
/// are bound as their JSON text.
pub fn sql_parameter(param: &serde_json::Value) -> SqlValue {
    match param {
        serde_json::Value::Null => SqlValue::Null,
        serde_json::Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => SqlValue::Integer(i),
            (None, Some(f)) => SqlValue::Real(f),
            (None, None) => SqlValue::Text(n.to_string()),
        },
        serde_json::Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}
