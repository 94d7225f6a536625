//! Start point / end point change tracking.

use super::config::TrackerConfig;
use super::loader::DataLoader;
use super::snapshot::capture_snapshot;
use crate::diff::{compute_changes, Changes};
use crate::errors::{DeltaError, Result};
use crate::model::{DataSource, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use rowdelta_core_types::SessionId;
use std::time::Instant;

#[derive(Debug)]
struct StartPoint {
    sources: Vec<DataSource>,
    snapshots: Vec<Snapshot>,
}

/// Captures a set of data sources twice and computes what changed.
///
/// With no configured source, every table the loader lists at start point
/// is tracked.
#[derive(Debug)]
pub struct ChangeTracker {
    session_id: SessionId,
    sources: Vec<DataSource>,
    start: Option<StartPoint>,
}

impl ChangeTracker {
    pub fn new(sources: Vec<DataSource>) -> Self {
        Self {
            session_id: SessionId::new(),
            sources,
            start: None,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.sources())
    }

    /// Correlates the log lines of both captures
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Configured sources; empty means all tables
    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    /// Snapshots taken at start point, in source order
    pub fn start_point(&self) -> Option<&[Snapshot]> {
        self.start.as_ref().map(|s| s.snapshots.as_slice())
    }

    /// Capture every source. A later call replaces the previous start point.
    ///
    /// # Errors
    ///
    /// Loader errors, or `InvalidArgument` for inconsistent loader output.
    /// The previous start point is kept on error.
    pub fn set_start_point<L>(&mut self, loader: &L) -> Result<()>
    where
        L: DataLoader + ?Sized,
    {
        let start = Instant::now();
        log_op_start!("set_start_point", session_id = self.session_id.as_str());

        let result = self.resolve_sources(loader).and_then(|sources| {
            let snapshots = capture_all(loader, &sources)?;
            Ok(StartPoint { sources, snapshots })
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(point) => {
                log_op_end!(
                    "set_start_point",
                    duration_ms = duration_ms,
                    session_id = self.session_id.as_str(),
                    row_count = point.snapshots.iter().map(Snapshot::row_count).sum::<usize>()
                );
                self.start = Some(point);
                Ok(())
            }
            Err(err) => {
                log_op_error!(
                    "set_start_point",
                    err.clone(),
                    duration_ms = duration_ms,
                    session_id = self.session_id.as_str()
                );
                Err(err)
            }
        }
    }

    /// Capture every source again and compute the changes since the start
    /// point.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` when no start point was set
    /// - loader errors
    /// - `SchemaMismatch` from change computation
    pub fn set_end_point<L>(&self, loader: &L) -> Result<Changes>
    where
        L: DataLoader + ?Sized,
    {
        let start = Instant::now();
        log_op_start!("set_end_point", session_id = self.session_id.as_str());

        let result = self.end_point(loader);

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(changes) => {
                log_op_end!(
                    "set_end_point",
                    duration_ms = duration_ms,
                    session_id = self.session_id.as_str(),
                    change_count = changes.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "set_end_point",
                    err.clone(),
                    duration_ms = duration_ms,
                    session_id = self.session_id.as_str()
                );
            }
        }
        result
    }

    fn end_point<L>(&self, loader: &L) -> Result<Changes>
    where
        L: DataLoader + ?Sized,
    {
        let start = self.start.as_ref().ok_or_else(|| {
            DeltaError::invalid_argument("start point must be set before end point")
        })?;
        let after = capture_all(loader, &start.sources)?;

        let mut changes = Vec::new();
        for (before, after) in start.snapshots.iter().zip(&after) {
            changes.extend(compute_changes(before, after)?);
        }
        Ok(Changes::new(start.sources.clone(), changes))
    }

    fn resolve_sources<L>(&self, loader: &L) -> Result<Vec<DataSource>>
    where
        L: DataLoader + ?Sized,
    {
        if !self.sources.is_empty() {
            return Ok(self.sources.clone());
        }
        Ok(loader
            .list_tables()?
            .into_iter()
            .map(DataSource::table)
            .collect())
    }
}

fn capture_all<L>(loader: &L, sources: &[DataSource]) -> Result<Vec<Snapshot>>
where
    L: DataLoader + ?Sized,
{
    sources
        .iter()
        .map(|source| capture_snapshot(loader, source))
        .collect()
}
