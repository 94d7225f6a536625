//! Capturing one snapshot through a loader.

use super::loader::DataLoader;
use crate::errors::{DeltaError, Result};
use crate::model::{DataSource, Snapshot};
use crate::value::RawValue;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Load `source` and wrap it in a [`Snapshot`].
///
/// Column names are upper-cased, then the table column filters apply. Key
/// columns come from the loader for tables and from `pk_names` for
/// requests; key columns removed by a filter no longer take part in the
/// key.
///
/// # Errors
///
/// - errors raised by the loader
/// - `InvalidArgument` when a loaded tuple is shorter than the column list
///   or two rows share a key
pub fn capture_snapshot<L>(loader: &L, source: &DataSource) -> Result<Snapshot>
where
    L: DataLoader + ?Sized,
{
    let start = Instant::now();
    log_op_start!(
        "capture_snapshot",
        data_source = source.name(),
        data_kind = source.kind().as_str()
    );

    let result = load(loader, source);

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(snapshot) => {
            log_op_end!(
                "capture_snapshot",
                duration_ms = duration_ms,
                data_source = source.name(),
                snapshot_id = snapshot.id().as_str(),
                row_count = snapshot.row_count(),
                column_count = snapshot.column_count()
            );
        }
        Err(err) => {
            log_op_error!(
                "capture_snapshot",
                err.clone(),
                duration_ms = duration_ms,
                data_source = source.name()
            );
        }
    }
    result
}

fn load<L>(loader: &L, source: &DataSource) -> Result<Snapshot>
where
    L: DataLoader + ?Sized,
{
    let columns: Vec<String> = loader
        .load_columns(source)?
        .iter()
        .map(|c| c.to_uppercase())
        .collect();
    let declared_pk: Vec<String> = match source {
        DataSource::Table(_) => loader.primary_key_columns(source)?,
        DataSource::Request(r) => r.pk_names.clone(),
    };

    let kept = source.kept_columns(&columns);
    let kept_names: Vec<String> = kept.iter().map(|&i| columns[i].clone()).collect();
    let pk_names: Vec<String> = declared_pk
        .iter()
        .map(|pk| pk.to_uppercase())
        .filter(|pk| kept_names.contains(pk))
        .collect();

    let tuples = loader
        .load_rows(source)?
        .into_iter()
        .enumerate()
        .map(|(n, tuple)| project(tuple, &kept, columns.len(), n))
        .collect::<Result<Vec<_>>>()?;

    Snapshot::new(source.clone(), kept_names, pk_names, tuples)
}

fn project(tuple: Vec<RawValue>, kept: &[usize], width: usize, n: usize) -> Result<Vec<RawValue>> {
    if tuple.len() != width {
        return Err(DeltaError::invalid_argument(format!(
            "row {} has {} values for {} columns",
            n,
            tuple.len(),
            width
        )));
    }
    if kept.len() == width {
        return Ok(tuple);
    }
    let mut slots: Vec<Option<RawValue>> = tuple.into_iter().map(Some).collect();
    Ok(kept.iter().filter_map(|&i| slots[i].take()).collect())
}
