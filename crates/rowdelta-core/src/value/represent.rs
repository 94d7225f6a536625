//! Diagnostic rendering of values. Never used for equality.

use super::{temporal, RawValue, Value, ValueType};

const TIME_FORMAT: &str = "%H:%M:%S%.9f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";
const BYTES_PLACEHOLDER: &str = "[...]";

/// Render a value for a diagnostic message.
///
/// Integers render without a fractional part, floats always carry one,
/// temporal values use a fixed nanosecond field and byte sequences render
/// as a placeholder.
pub fn represent(value: &Value) -> String {
    match value.raw() {
        RawValue::Null => "null".to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::I8(v) => v.to_string(),
        RawValue::I16(v) => v.to_string(),
        RawValue::I32(v) => v.to_string(),
        RawValue::I64(v) => v.to_string(),
        RawValue::I128(v) => v.to_string(),
        RawValue::U8(v) => v.to_string(),
        RawValue::U16(v) => v.to_string(),
        RawValue::U32(v) => v.to_string(),
        RawValue::U64(v) => v.to_string(),
        RawValue::F32(v) => format!("{:?}", v),
        RawValue::F64(v) => format!("{:?}", v),
        RawValue::Decimal(d) => d.to_string(),
        RawValue::Char(c) => c.to_string(),
        RawValue::Text(s) => s.clone(),
        RawValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        RawValue::Time(t) => t.format(TIME_FORMAT).to_string(),
        RawValue::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        RawValue::Bytes(_) => BYTES_PLACEHOLDER.to_string(),
        RawValue::Uuid(u) => u.hyphenated().to_string(),
        RawValue::Other { repr, .. } => repr.clone(),
    }
}

/// Render `value` in the form of the `expected` value it is shown against.
///
/// A DATE shown against a DATE_TIME renders as its midnight date-time.
pub fn represent_against(value: &Value, expected: &Value) -> String {
    match (value.raw(), expected.value_type()) {
        (RawValue::Date(d), ValueType::DateTime) => temporal::midnight(*d)
            .format(DATE_TIME_FORMAT)
            .to_string(),
        _ => represent(value),
    }
}
