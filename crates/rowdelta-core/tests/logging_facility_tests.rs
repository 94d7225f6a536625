#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{actor_loader, names_snapshot, reference_pair};
use rowdelta_core::logging_facility::test_capture::init_test_capture;
use rowdelta_core::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use rowdelta_core::{
    capture_snapshot, compute_changes, log_op_end, log_op_error, log_op_start, DataSource,
    DeltaError, RawValue, Snapshot,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for(op_name, EVENT_END);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = DeltaError::not_found("table", "MOVIE");
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("err_kind"), Some("NotFound"));
    assert_eq!(events[0].field("err_code"), Some("ERR_NOT_FOUND"));
}

#[test]
fn test_compute_changes_logs_change_count() {
    let capture = init_test_capture();
    let (before, after) = reference_pair();

    compute_changes(&before, &after).unwrap();

    let ends: Vec<_> = capture
        .events_for("compute_changes", EVENT_END)
        .into_iter()
        .filter(|e| e.field("change_count") == Some("3"))
        .collect();
    assert!(!ends.is_empty());
    assert_eq!(ends[0].field("data_source"), Some("actor"));
}

#[test]
fn test_failed_computation_logs_end_error() {
    let capture = init_test_capture();
    let before = names_snapshot(&[(1, "Weaver")]);
    let after = Snapshot::new(
        DataSource::table("actor"),
        ["id", "nickname"],
        ["id"],
        vec![vec![RawValue::I32(1), RawValue::from("Ripley")]],
    )
    .unwrap();

    assert!(compute_changes(&before, &after).is_err());

    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("compute_changes")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err_code") == Some("ERR_SCHEMA_MISMATCH")
    });
    assert!(count >= 1);
}

#[test]
fn test_capture_snapshot_logs_snapshot_id() {
    let capture = init_test_capture();

    let snapshot = capture_snapshot(&actor_loader(), &DataSource::table("actor")).unwrap();

    let id = snapshot.id().to_string();
    let count = capture.count_events(|e| {
        e.op.as_deref() == Some("capture_snapshot")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("snapshot_id") == Some(id.as_str())
    });
    assert_eq!(count, 1);
}
