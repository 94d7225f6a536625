//! Change computation between two snapshots of one data source.
//!
//! The entry point is [`compute_changes`]. It is pure: the same pair of
//! snapshots always yields the same list, in the same order.

use crate::errors::{DeltaError, Result};
use crate::model::{Change, RowKey, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::HashSet;
use std::time::Instant;

/// Correlate `before` and `after` by row key and classify each key.
///
/// Keys are visited in discovery order: every key of `before` in row order,
/// then the keys only `after` has, in row order.
///
/// - key only in `before`: `Deletion`
/// - key only in `after`: `Creation`
/// - key in both: `Modification` when some column differs, nothing otherwise
///
/// Without declared key columns the key is the whole row, so a changed row
/// surfaces as a deletion plus a creation.
///
/// # Errors
///
/// - `InvalidArgument` when the snapshots come from different sources
/// - `SchemaMismatch` when a row in both snapshots has different column names
pub fn compute_changes(before: &Snapshot, after: &Snapshot) -> Result<Vec<Change>> {
    let start = Instant::now();
    log_op_start!(
        "compute_changes",
        data_source = before.name(),
        row_count = before.row_count() + after.row_count()
    );

    let result = correlate(before, after);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(changes) => {
            log_op_end!(
                "compute_changes",
                duration_ms = duration_ms,
                data_source = before.name(),
                change_count = changes.len()
            );
        }
        Err(err) => {
            log_op_error!(
                "compute_changes",
                err.clone(),
                duration_ms = duration_ms,
                data_source = before.name()
            );
        }
    }
    result
}

fn correlate(before: &Snapshot, after: &Snapshot) -> Result<Vec<Change>> {
    if before.source() != after.source() {
        return Err(DeltaError::invalid_argument(format!(
            "cannot compare {} with {}",
            before.source().label(),
            after.source().label()
        )));
    }

    // Identical content: nothing to correlate.
    if before.digest() == after.digest() && before.column_names() == after.column_names() {
        return Ok(Vec::new());
    }

    let name = before.name();
    let kind = before.data_kind();
    let label = before.source().label();
    let mut changes = Vec::new();

    for (key, row) in before.keyed_rows() {
        let change = match after.row_by_key(key) {
            None => Some(Change::deletion(name, kind, row.clone())),
            Some(end) => Change::modification(name, kind, row.clone(), end.clone())?,
        };
        changes.extend(change.map(|c| c.with_source_label(&label)));
    }

    let seen: HashSet<&RowKey> = before.keyed_rows().map(|(key, _)| key).collect();
    for (key, row) in after.keyed_rows() {
        if !seen.contains(key) {
            changes.push(Change::creation(name, kind, row.clone()).with_source_label(&label));
        }
    }

    Ok(changes)
}
