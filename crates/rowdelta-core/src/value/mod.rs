//! Typed column values.
//!
//! A [`Value`] wraps the raw payload handed over by a loader ([`RawValue`])
//! together with its semantic [`ValueType`], computed once at construction.
//! The free functions re-exported here are the pure building blocks the
//! presentation layer uses to build messages:
//!
//! - [`are_equal`]: type-aware equality, never fails
//! - [`compare`]: ordering for NUMBER / DATE / TIME / DATE_TIME, fails fast
//! - [`represent`]: diagnostic rendering, never used for equality

pub mod equality;
pub mod ordering;
pub mod represent;
pub mod temporal;
pub mod value_type;

pub use equality::{are_equal, ValueKey};
pub use ordering::compare;
pub use represent::{represent, represent_against};
pub use temporal::{parse_date, parse_date_time, parse_time};
pub use value_type::ValueType;

use crate::errors::{DeltaError, Result};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

/// Raw payload of a column value as produced by a loader.
///
/// This is the closed set of dynamic types a loader may hand over. New
/// source types are supported by adding a variant here and an arm in
/// [`ValueType::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(BigDecimal),
    Char(char),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    /// A payload the classification does not know, kept for display
    Other { type_name: String, repr: String },
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// A column value with its semantic type.
///
/// Immutable once built. Equality between values in the diff sense is
/// [`are_equal`], not `PartialEq` (which compares the raw payloads
/// structurally and is only meant for tests and determinism checks).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    column_name: Option<String>,
    raw: RawValue,
    value_type: ValueType,
}

impl Value {
    /// Wrap a raw payload that is not attached to a column
    pub fn new(raw: RawValue) -> Self {
        let value_type = ValueType::classify(&raw);
        Self {
            column_name: None,
            raw,
            value_type,
        }
    }

    /// Wrap a raw payload read from the named column
    pub fn with_column(column_name: impl Into<String>, raw: RawValue) -> Self {
        let value_type = ValueType::classify(&raw);
        Self {
            column_name: Some(column_name.into()),
            raw,
            value_type,
        }
    }

    /// The null value
    pub fn null() -> Self {
        Self::new(RawValue::Null)
    }

    /// Null value standing for a column of a row that does not exist
    pub(crate) fn null_for_column(column_name: impl Into<String>) -> Self {
        Self::with_column(column_name, RawValue::Null)
    }

    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// Canonical hashable projection, consistent with [`are_equal`]
    pub fn key(&self) -> ValueKey {
        ValueKey::of(self)
    }

    /// Diagnostic text of this value
    pub fn represent(&self) -> String {
        represent(self)
    }

    fn mismatch(&self, expected: ValueType) -> DeltaError {
        DeltaError::TypeMismatch {
            actual: self.value_type,
            expected: vec![expected],
            counterpart: None,
        }
    }

    /// Narrow to a boolean
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is BOOLEAN.
    pub fn as_bool(&self) -> Result<bool> {
        match &self.raw {
            RawValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(ValueType::Boolean)),
        }
    }

    /// Narrow to an arbitrary-precision number
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is NUMBER; `NotOrderable` for
    /// non-finite floats, which have no decimal form.
    pub fn as_number(&self) -> Result<BigDecimal> {
        if self.value_type != ValueType::Number {
            return Err(self.mismatch(ValueType::Number));
        }
        match ordering::Numeric::of(&self.raw) {
            Some(ordering::Numeric::Finite(d)) => Ok(d),
            _ => Err(DeltaError::NotOrderable {
                reason: format!("{} has no decimal form", self.represent()),
            }),
        }
    }

    /// Narrow to text
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is TEXT.
    pub fn as_text(&self) -> Result<String> {
        match &self.raw {
            RawValue::Text(s) => Ok(s.clone()),
            RawValue::Char(c) => Ok(c.to_string()),
            _ => Err(self.mismatch(ValueType::Text)),
        }
    }

    /// Narrow to a date
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is DATE.
    pub fn as_date(&self) -> Result<NaiveDate> {
        match &self.raw {
            RawValue::Date(d) => Ok(*d),
            _ => Err(self.mismatch(ValueType::Date)),
        }
    }

    /// Narrow to a time of day
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is TIME.
    pub fn as_time(&self) -> Result<NaiveTime> {
        match &self.raw {
            RawValue::Time(t) => Ok(*t),
            _ => Err(self.mismatch(ValueType::Time)),
        }
    }

    /// Narrow to a date-time; a DATE is widened to its midnight instant
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is DATE_TIME or DATE.
    pub fn as_date_time(&self) -> Result<NaiveDateTime> {
        match &self.raw {
            RawValue::DateTime(dt) => Ok(*dt),
            RawValue::Date(d) => Ok(temporal::midnight(*d)),
            _ => Err(DeltaError::TypeMismatch {
                actual: self.value_type,
                expected: vec![ValueType::DateTime, ValueType::Date],
                counterpart: None,
            }),
        }
    }

    /// Narrow to a byte sequence
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is BYTES.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.raw {
            RawValue::Bytes(b) => Ok(b),
            _ => Err(self.mismatch(ValueType::Bytes)),
        }
    }

    /// Narrow to a UUID
    ///
    /// # Errors
    ///
    /// `TypeMismatch` unless the value is UUID.
    pub fn as_uuid(&self) -> Result<Uuid> {
        match &self.raw {
            RawValue::Uuid(u) => Ok(*u),
            _ => Err(self.mismatch(ValueType::Uuid)),
        }
    }
}

impl From<RawValue> for Value {
    fn from(raw: RawValue) -> Self {
        Value::new(raw)
    }
}

macro_rules! impl_from_payload {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for RawValue {
                fn from(v: $t) -> Self {
                    RawValue::$variant(v)
                }
            }

            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::new(RawValue::$variant(v))
                }
            }
        )*
    };
}

impl_from_payload!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    BigDecimal => Decimal,
    char => Char,
    String => Text,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    Vec<u8> => Bytes,
    Uuid => Uuid,
);

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::new(RawValue::Text(v.to_string()))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::new(RawValue::Bytes(v.to_vec()))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_is_computed_at_construction() {
        let v = Value::with_column("ID", RawValue::I32(1));
        assert_eq!(v.value_type(), ValueType::Number);
        assert_eq!(v.column_name(), Some("ID"));
    }

    #[test]
    fn test_none_becomes_null() {
        let v: Value = Option::<i32>::None.into();
        assert!(v.is_null());
        assert_eq!(v.value_type(), ValueType::Null);
    }

    #[test]
    fn test_narrowing_accessor_reports_mismatch() {
        let v = Value::from("Weaver");
        let err = v.as_number().unwrap_err();
        assert_eq!(
            err,
            DeltaError::TypeMismatch {
                actual: ValueType::Text,
                expected: vec![ValueType::Number],
                counterpart: None,
            }
        );
    }

    #[test]
    fn test_date_widens_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2007, 12, 23).unwrap();
        let v = Value::from(date);
        let dt = v.as_date_time().unwrap();
        assert_eq!(dt.to_string(), "2007-12-23 00:00:00");
    }
}
