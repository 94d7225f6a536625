//! Type-aware value equality.
//!
//! Equality is defined through [`ValueKey`], a canonical projection of a
//! value: two values are equal exactly when their keys are equal. The same
//! keys index primary-key tuples in snapshots, so correlation and equality
//! can never disagree.

use super::ordering::Numeric;
use super::{temporal, RawValue, Value};
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

/// Canonical, hashable projection of a [`Value`].
///
/// - Numbers of every width collapse to one normalized decimal text, so
///   `1_i32`, `1_u64`, `1.0_f64` and `1.00` share a key.
/// - DATE collapses to its midnight DATE_TIME.
/// - Characters collapse to one-character text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKey {
    Null,
    Boolean(bool),
    Number(String),
    Text(String),
    Instant(NaiveDateTime),
    Time(NaiveTime),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Other { type_name: String, repr: String },
}

impl ValueKey {
    /// Compute the key of a value
    pub fn of(value: &Value) -> ValueKey {
        match value.raw() {
            RawValue::Null => ValueKey::Null,
            RawValue::Bool(b) => ValueKey::Boolean(*b),
            RawValue::Char(c) => ValueKey::Text(c.to_string()),
            RawValue::Text(s) => ValueKey::Text(s.clone()),
            RawValue::Date(d) => ValueKey::Instant(temporal::midnight(*d)),
            RawValue::DateTime(dt) => ValueKey::Instant(*dt),
            RawValue::Time(t) => ValueKey::Time(*t),
            RawValue::Bytes(b) => ValueKey::Bytes(b.clone()),
            RawValue::Uuid(u) => ValueKey::Uuid(*u),
            RawValue::Other { type_name, repr } => ValueKey::Other {
                type_name: type_name.clone(),
                repr: repr.clone(),
            },
            numeric => match Numeric::of(numeric) {
                Some(n) => ValueKey::Number(n.canonical_text()),
                None => ValueKey::Null,
            },
        }
    }
}

/// Type-aware equality between a value and an expected value.
///
/// - null equals null only;
/// - numbers compare by numeric value, temporals by instant (a DATE equals
///   the DATE_TIME at its midnight), bytes element-wise;
/// - values of different families are never equal, and this never fails.
///
/// Symmetric: `are_equal(a, b) == are_equal(b, a)`.
pub fn are_equal(value: &Value, expected: &Value) -> bool {
    if value.is_null() || expected.is_null() {
        return value.is_null() && expected.is_null();
    }
    ValueKey::of(value) == ValueKey::of(expected)
}
