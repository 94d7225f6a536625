//! Semantic value types and the classification function.

use super::RawValue;
use serde::{Deserialize, Serialize};

/// Closed set of semantic types a column value can have.
///
/// Exactly one variant applies per [`Value`](super::Value). `Null` applies
/// only when the raw payload is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Boolean,
    Number,
    Text,
    Date,
    Time,
    DateTime,
    Bytes,
    Uuid,
    NotIdentified,
    Null,
}

impl ValueType {
    /// Types accepted by ordering comparisons
    pub const ORDERABLE: [ValueType; 4] = [
        ValueType::Number,
        ValueType::Date,
        ValueType::Time,
        ValueType::DateTime,
    ];

    /// Classify a raw payload.
    ///
    /// Total over every [`RawValue`]; the arm order is the precedence order
    /// Boolean, Number family, temporal family, bytes, UUID, text, then
    /// everything else.
    pub fn classify(raw: &RawValue) -> ValueType {
        match raw {
            RawValue::Null => ValueType::Null,
            RawValue::Bool(_) => ValueType::Boolean,
            RawValue::I8(_)
            | RawValue::I16(_)
            | RawValue::I32(_)
            | RawValue::I64(_)
            | RawValue::I128(_)
            | RawValue::U8(_)
            | RawValue::U16(_)
            | RawValue::U32(_)
            | RawValue::U64(_)
            | RawValue::F32(_)
            | RawValue::F64(_)
            | RawValue::Decimal(_) => ValueType::Number,
            RawValue::Time(_) => ValueType::Time,
            RawValue::Date(_) => ValueType::Date,
            RawValue::DateTime(_) => ValueType::DateTime,
            RawValue::Bytes(_) => ValueType::Bytes,
            RawValue::Uuid(_) => ValueType::Uuid,
            RawValue::Char(_) | RawValue::Text(_) => ValueType::Text,
            RawValue::Other { .. } => ValueType::NotIdentified,
        }
    }

    /// Whether ordering comparisons are defined for this type
    pub fn is_orderable(&self) -> bool {
        Self::ORDERABLE.contains(self)
    }

    /// Types a value of this type can be compared with
    ///
    /// DATE and DATE_TIME are cross-comparable; every other type is only
    /// comparable with itself.
    pub fn comparable_with(&self) -> Vec<ValueType> {
        match self {
            ValueType::Date | ValueType::DateTime => vec![ValueType::Date, ValueType::DateTime],
            other => vec![*other],
        }
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "BOOLEAN",
            ValueType::Number => "NUMBER",
            ValueType::Text => "TEXT",
            ValueType::Date => "DATE",
            ValueType::Time => "TIME",
            ValueType::DateTime => "DATE_TIME",
            ValueType::Bytes => "BYTES",
            ValueType::Uuid => "UUID",
            ValueType::NotIdentified => "NOT_IDENTIFIED",
            ValueType::Null => "NULL",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
