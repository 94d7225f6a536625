//! Ordering of NUMBER, DATE, TIME and DATE_TIME values.

use super::{temporal, RawValue, Value, ValueType};
use crate::errors::{DeltaError, Result};
use bigdecimal::BigDecimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Numeric payload lifted to arbitrary precision.
///
/// Floats go through their shortest round-trip text, so `0.1_f32` is the
/// decimal `0.1` rather than its binary expansion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Numeric {
    Finite(BigDecimal),
    NaN,
    PosInf,
    NegInf,
}

impl Numeric {
    /// Lift a raw payload; `None` for anything outside the number family
    pub(crate) fn of(raw: &RawValue) -> Option<Numeric> {
        let finite = |d: BigDecimal| Some(Numeric::Finite(d));
        match raw {
            RawValue::I8(v) => finite(BigDecimal::from(*v)),
            RawValue::I16(v) => finite(BigDecimal::from(*v)),
            RawValue::I32(v) => finite(BigDecimal::from(*v)),
            RawValue::I64(v) => finite(BigDecimal::from(*v)),
            RawValue::U8(v) => finite(BigDecimal::from(*v)),
            RawValue::U16(v) => finite(BigDecimal::from(*v)),
            RawValue::U32(v) => finite(BigDecimal::from(*v)),
            RawValue::U64(v) => finite(BigDecimal::from(*v)),
            RawValue::I128(v) => BigDecimal::from_str(&v.to_string()).ok().map(Numeric::Finite),
            RawValue::F32(v) => Some(Self::of_float(f64::from(*v), v.to_string())),
            RawValue::F64(v) => Some(Self::of_float(*v, v.to_string())),
            RawValue::Decimal(d) => finite(d.clone()),
            _ => None,
        }
    }

    fn of_float(v: f64, text: String) -> Numeric {
        if v.is_nan() {
            Numeric::NaN
        } else if v.is_infinite() {
            if v > 0.0 {
                Numeric::PosInf
            } else {
                Numeric::NegInf
            }
        } else {
            // Float Display never uses exponent notation, so this parses.
            BigDecimal::from_str(&text)
                .map(Numeric::Finite)
                .unwrap_or(Numeric::NaN)
        }
    }

    /// Text identical for every pair of numerically equal payloads
    pub(crate) fn canonical_text(&self) -> String {
        match self {
            Numeric::Finite(d) => d.normalized().to_string(),
            Numeric::NaN => "NaN".to_string(),
            Numeric::PosInf => "+inf".to_string(),
            Numeric::NegInf => "-inf".to_string(),
        }
    }

    fn try_cmp(&self, other: &Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::NaN, _) | (_, Numeric::NaN) => None,
            (Numeric::Finite(a), Numeric::Finite(b)) => Some(a.cmp(b)),
            (Numeric::PosInf, Numeric::PosInf) | (Numeric::NegInf, Numeric::NegInf) => {
                Some(Ordering::Equal)
            }
            (Numeric::PosInf, _) | (_, Numeric::NegInf) => Some(Ordering::Greater),
            (Numeric::NegInf, _) | (_, Numeric::PosInf) => Some(Ordering::Less),
        }
    }
}

/// Order `value` against `expected`.
///
/// Defined for NUMBER, DATE, TIME and DATE_TIME; DATE and DATE_TIME are
/// cross-comparable through the midnight instant of the date.
///
/// # Errors
///
/// - `TypeMismatch` with the orderable set as `expected` when `value` is
///   not orderable (null included);
/// - `TypeMismatch` with `counterpart` set when `expected` has a type
///   `value` cannot be compared with;
/// - `NotOrderable` when either number is NaN.
pub fn compare(value: &Value, expected: &Value) -> Result<Ordering> {
    let actual = value.value_type();
    if !actual.is_orderable() {
        return Err(DeltaError::TypeMismatch {
            actual,
            expected: ValueType::ORDERABLE.to_vec(),
            counterpart: None,
        });
    }
    let comparable = actual.comparable_with();
    if !comparable.contains(&expected.value_type()) {
        return Err(DeltaError::TypeMismatch {
            actual,
            expected: comparable,
            counterpart: Some(expected.value_type()),
        });
    }

    match (value.raw(), expected.raw()) {
        (RawValue::Time(a), RawValue::Time(b)) => Ok(a.cmp(b)),
        (RawValue::Date(_) | RawValue::DateTime(_), RawValue::Date(_) | RawValue::DateTime(_)) => {
            Ok(instant(value.raw()).cmp(&instant(expected.raw())))
        }
        (a, b) => {
            let (Some(a), Some(b)) = (Numeric::of(a), Numeric::of(b)) else {
                return Err(DeltaError::TypeMismatch {
                    actual,
                    expected: comparable,
                    counterpart: Some(expected.value_type()),
                });
            };
            a.try_cmp(&b).ok_or_else(|| DeltaError::NotOrderable {
                reason: format!(
                    "cannot order {} against {}",
                    value.represent(),
                    expected.represent()
                ),
            })
        }
    }
}

fn instant(raw: &RawValue) -> Option<chrono::NaiveDateTime> {
    match raw {
        RawValue::Date(d) => Some(temporal::midnight(*d)),
        RawValue::DateTime(dt) => Some(*dt),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_numbers_order_across_widths() {
        assert_eq!(
            compare(&Value::from(2_u8), &Value::from(10_i64)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare(&Value::from(2.5_f64), &Value::from(2_i32)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            compare(&Value::from(3_i128), &Value::from(3.0_f32)).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_infinities_bound_the_finite_numbers() {
        let inf = Value::from(f64::INFINITY);
        let neg = Value::from(f64::NEG_INFINITY);
        let big = Value::from(i128::MAX);
        assert_eq!(compare(&inf, &big).unwrap(), Ordering::Greater);
        assert_eq!(compare(&neg, &big).unwrap(), Ordering::Less);
        assert_eq!(compare(&inf, &inf).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_nan_is_not_orderable() {
        let err = compare(&Value::from(f64::NAN), &Value::from(1)).unwrap_err();
        assert!(matches!(err, DeltaError::NotOrderable { .. }));
    }

    #[test]
    fn test_date_against_date_time() {
        let date = NaiveDate::from_ymd_opt(2014, 5, 24).unwrap();
        let morning = date.and_hms_opt(9, 46, 30).unwrap();
        assert_eq!(
            compare(&Value::from(date), &Value::from(morning)).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            compare(&Value::from(date.and_hms_opt(0, 0, 0).unwrap()), &Value::from(date)).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_number_against_text_is_a_type_mismatch() {
        let err = compare(&Value::from(1), &Value::from("1")).unwrap_err();
        assert_eq!(
            err,
            DeltaError::TypeMismatch {
                actual: ValueType::Number,
                expected: vec![ValueType::Number],
                counterpart: Some(ValueType::Text),
            }
        );
    }

    #[test]
    fn test_unorderable_and_null_values() {
        for v in [Value::from("a"), Value::from(true), Value::null()] {
            let err = compare(&v, &Value::from(1)).unwrap_err();
            match err {
                DeltaError::TypeMismatch {
                    actual,
                    expected,
                    counterpart,
                } => {
                    assert_eq!(actual, v.value_type());
                    assert_eq!(expected, ValueType::ORDERABLE.to_vec());
                    assert_eq!(counterpart, None);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_canonical_text_collapses_scale() {
        let a = Numeric::of(&RawValue::Decimal(BigDecimal::from_str("1.500").unwrap())).unwrap();
        let b = Numeric::of(&RawValue::F64(1.5)).unwrap();
        assert_eq!(a.canonical_text(), b.canonical_text());
    }
}
