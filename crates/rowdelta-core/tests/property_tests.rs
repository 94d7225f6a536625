//! Property-based tests using proptest.
//!
//! Covers the invariants the change computation relies on:
//! - numeric classification and equality ignore the source width
//! - equality is reflexive and symmetric
//! - ordering is antisymmetric on numbers
//! - changes are complete, minimal and deterministic

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::names_snapshot;
use proptest::prelude::*;
use rowdelta_core::value::{are_equal, compare};
use rowdelta_core::{compute_changes, ChangeType, RawValue, Value, ValueType};
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn arb_number() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        any::<i8>().prop_map(RawValue::I8),
        any::<i16>().prop_map(RawValue::I16),
        any::<i32>().prop_map(RawValue::I32),
        any::<i64>().prop_map(RawValue::I64),
        any::<u32>().prop_map(RawValue::U32),
        (-1.0e9f64..1.0e9f64).prop_map(RawValue::F64),
    ]
}

fn arb_raw() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Null),
        any::<bool>().prop_map(RawValue::Bool),
        arb_number(),
        "[a-z]{0,8}".prop_map(RawValue::Text),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(RawValue::Bytes),
    ]
}

/// Table content keyed by id, with a small name alphabet so rows collide
fn arb_table() -> impl Strategy<Value = BTreeMap<i32, String>> {
    prop::collection::btree_map(0i32..20, "[a-c]{1,2}", 0..12)
}

fn rows(table: &BTreeMap<i32, String>) -> Vec<(i32, &str)> {
    table.iter().map(|(id, name)| (*id, name.as_str())).collect()
}

/// `(type, id)` of every change, in emission order
fn outline(before: &BTreeMap<i32, String>, after: &BTreeMap<i32, String>) -> Vec<(ChangeType, String)> {
    let changes = compute_changes(&names_snapshot(&rows(before)), &names_snapshot(&rows(after))).unwrap();
    changes
        .iter()
        .map(|c| (c.change_type(), c.pk_values()[0].represent()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ── Value model ────────────────────────────────────────────────

    #[test]
    fn prop_numbers_classify_as_number(raw in arb_number()) {
        prop_assert_eq!(ValueType::classify(&raw), ValueType::Number);
    }

    #[test]
    fn prop_integer_width_does_not_affect_equality(n in any::<i32>()) {
        let narrow = Value::new(RawValue::I32(n));
        let wide = Value::new(RawValue::I64(i64::from(n)));
        prop_assert!(are_equal(&narrow, &wide));
        prop_assert!(are_equal(&wide, &narrow));
    }

    #[test]
    fn prop_equality_reflexive(raw in arb_raw()) {
        let value = Value::new(raw);
        prop_assert!(are_equal(&value, &value));
    }

    #[test]
    fn prop_equality_symmetric(a in arb_raw(), b in arb_raw()) {
        let a = Value::new(a);
        let b = Value::new(b);
        prop_assert_eq!(are_equal(&a, &b), are_equal(&b, &a));
    }

    #[test]
    fn prop_number_ordering_antisymmetric(a in any::<i64>(), b in any::<i64>()) {
        let left = Value::new(RawValue::I64(a));
        let right = Value::new(RawValue::I64(b));
        let forward = compare(&left, &right).unwrap();
        let backward = compare(&right, &left).unwrap();
        prop_assert_eq!(forward, backward.reverse());
        prop_assert_eq!(forward == Ordering::Equal, a == b);
    }

    // ── Change computation ─────────────────────────────────────────

    #[test]
    fn prop_identical_snapshots_have_no_changes(table in arb_table()) {
        prop_assert!(outline(&table, &table).is_empty());
    }

    #[test]
    fn prop_changes_complete_and_minimal(before in arb_table(), after in arb_table()) {
        let changes = outline(&before, &after);

        let mut expected = Vec::new();
        for (id, name) in &before {
            match after.get(id) {
                None => expected.push((ChangeType::Deletion, id.to_string())),
                Some(other) if other != name => {
                    expected.push((ChangeType::Modification, id.to_string()))
                }
                Some(_) => {}
            }
        }
        for id in after.keys().filter(|id| !before.contains_key(id)) {
            expected.push((ChangeType::Creation, id.to_string()));
        }

        let mut actual = changes.clone();
        actual.sort();
        expected.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_changes_deterministic(before in arb_table(), after in arb_table()) {
        prop_assert_eq!(outline(&before, &after), outline(&before, &after));
    }
}
