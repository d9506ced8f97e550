//! Snapshot aggregation
//!
//! Each snapshot stands for one hour of the day. Aggregation is a plain sum
//! per restaurant, so the snapshot order does not matter.

use std::borrow::Borrow;

use super::error::AnalyticsError;
use super::types::BrokenTimeMap;
use crate::models::{CommitId, Snapshot};

/// Computes per-restaurant broken-hours over a day of snapshots.
///
/// Accepts owned or borrowed snapshots, so a caller can stream them in and
/// drop each one once folded.
pub fn aggregate<I, S>(snapshots: I) -> BrokenTimeMap
where
    I: IntoIterator<Item = S>,
    S: Borrow<Snapshot>,
{
    snapshots
        .into_iter()
        .fold(BrokenTimeMap::new(), |mut broken_time, snapshot| {
            broken_time.observe_snapshot(snapshot.borrow());
            broken_time
        })
}

/// Parses the raw payload of `commit`, naming the commit on failure
pub fn parse_snapshot(commit: &CommitId, raw: &str) -> Result<Snapshot, AnalyticsError> {
    Snapshot::from_json(raw).map_err(|source| AnalyticsError::MalformedSnapshot {
        commit: commit.clone(),
        source,
    })
}
