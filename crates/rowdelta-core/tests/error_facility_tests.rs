#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::names_snapshot;
use rowdelta_core::value::compare;
use rowdelta_core::{
    compute_changes, DeltaError, ExError, ExErrorKind, RawValue, Snapshot, DataSource, Value,
    ValueType,
};

#[test]
fn test_every_error_maps_to_a_stable_code() {
    let cases = vec![
        (
            DeltaError::TypeMismatch {
                actual: ValueType::Text,
                expected: vec![ValueType::Number],
                counterpart: None,
            },
            "ERR_TYPE_MISMATCH",
        ),
        (
            DeltaError::NotOrderable {
                reason: "NaN".to_string(),
            },
            "ERR_NOT_ORDERABLE",
        ),
        (
            DeltaError::index_out_of_range("rows", 3, 3),
            "ERR_INDEX_OUT_OF_RANGE",
        ),
        (DeltaError::not_found("table", "MOVIE"), "ERR_NOT_FOUND"),
        (
            DeltaError::SchemaMismatch {
                data_source: "actor".to_string(),
                pk: "1".to_string(),
                only_at_start: vec!["NAME".to_string()],
                only_at_end: Vec::new(),
            },
            "ERR_SCHEMA_MISMATCH",
        ),
        (
            DeltaError::invalid_argument("no name"),
            "ERR_INVALID_ARGUMENT",
        ),
        (
            DeltaError::Loader {
                data_source: "actor".to_string(),
                message: "disk I/O error".to_string(),
            },
            "ERR_PERSISTENCE",
        ),
        (
            DeltaError::Config {
                message: "bad".to_string(),
            },
            "ERR_CONFIG",
        ),
        (
            DeltaError::Internal {
                message: "bad".to_string(),
            },
            "ERR_INTERNAL",
        ),
    ];

    for (err, code) in cases {
        let ex: ExError = err.into();
        assert_eq!(ex.code(), code);
    }
}

#[test]
fn test_index_out_of_range_carries_index_and_bounds() {
    let ex: ExError = DeltaError::index_out_of_range("columns", 5, 2).into();
    assert_eq!(ex.kind(), ExErrorKind::IndexOutOfRange);
    assert_eq!(ex.index(), Some(5));
    assert_eq!(ex.message(), "Index 5 out of the limits of columns [0, 2)");
}

#[test]
fn test_schema_mismatch_carries_data_source() {
    let before = names_snapshot(&[(1, "Weaver")]);
    let after = Snapshot::new(
        DataSource::table("actor"),
        ["id"],
        ["id"],
        vec![vec![RawValue::I32(1)]],
    )
    .unwrap();

    let ex: ExError = compute_changes(&before, &after).unwrap_err().into();

    assert_eq!(ex.kind(), ExErrorKind::SchemaMismatch);
    assert_eq!(ex.data_source(), Some("actor"));
    assert!(ex.to_string().starts_with("[ERR_SCHEMA_MISMATCH]"));
}

#[test]
fn test_type_mismatch_message_names_both_sides() {
    let err = compare(&Value::from(3), &Value::from("3")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type mismatch: value is NUMBER, expected NUMBER (compared against TEXT)"
    );
}

#[test]
fn test_ex_error_context_builders() {
    let ex = ExError::new(ExErrorKind::NotFound)
        .with_op("change_on_table_with_pks")
        .with_data_source("actor")
        .with_message("no change with primary key 9");

    assert_eq!(ex.op(), Some("change_on_table_with_pks"));
    assert_eq!(
        ex.to_string(),
        "[ERR_NOT_FOUND] in operation 'change_on_table_with_pks': no change with primary key 9 (data_source: actor)"
    );
}
