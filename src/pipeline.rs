//! Loss estimation pipeline
//!
//! history → selection → snapshot retrieval → aggregation → estimation.
//! Single-threaded; snapshots are fetched, parsed and folded one at a time
//! and dropped right after.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analytics::{
    aggregate, loss_breakdown, parse_snapshot, select_commits, BrokenTimeMap, EconomicModel,
    LossBreakdown,
};
use crate::archive::{ArchiveCache, ExtractingStore, HistoryProvider, SnapshotStore};
use crate::config::{EstimatorConfig, DEFAULT_BRANCH};
use crate::error::AppError;
use crate::models::{Commit, Snapshot};

/// Format of the target date on the command line
pub const TARGET_DATE_FORMAT: &str = "%d/%m/%y";

/// Parses a DD/MM/YY target date
pub fn parse_target_date(input: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(input.trim(), TARGET_DATE_FORMAT).map_err(|_| AppError::InvalidDate {
        input: input.to_string(),
    })
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossReport {
    pub target_date: NaiveDate,
    /// Snapshots (commits) aggregated
    pub commit_count: usize,
    #[serde(flatten)]
    pub breakdown: LossBreakdown,
}

impl LossReport {
    pub fn loss(&self) -> f64 {
        self.breakdown.loss
    }
}

impl fmt::Display for LossReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lost revenue: {:.0}$", self.breakdown.loss)
    }
}

/// The estimation pipeline over any history provider and snapshot store
pub struct LossPipeline<H, S> {
    history: H,
    store: S,
    branch: String,
    model: EconomicModel,
}

impl<H: HistoryProvider, S: SnapshotStore> LossPipeline<H, S> {
    pub fn new(history: H, store: S, model: EconomicModel) -> Self {
        Self {
            history,
            store,
            branch: DEFAULT_BRANCH.to_string(),
            model,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Estimates the loss for `target_date`
    ///
    /// # Errors
    /// - `ArchiveUnavailable` when history or a snapshot cannot be read
    /// - `NoDataForDate` when no commit matches or no restaurant is observed
    /// - `MalformedSnapshot` naming the first commit whose payload does not parse
    pub fn run(&self, target_date: NaiveDate) -> Result<LossReport, AppError> {
        let history = self.history.list_commits(&self.branch)?;
        let commits = select_commits(&history, target_date);
        info!(
            date = %target_date,
            history = history.len(),
            selected = commits.len(),
            "selected snapshot commits"
        );

        if commits.is_empty() {
            return Err(AppError::NoDataForDate { date: target_date });
        }

        let broken_time = self.collect_broken_time(&commits, target_date)?;
        let breakdown = loss_breakdown(&broken_time, &self.model)
            .map_err(|e| AppError::from_analytics(e, target_date))?;

        info!(
            restaurants = breakdown.restaurant_count,
            broken_hours = breakdown.broken_hours,
            loss = breakdown.loss,
            "estimated loss"
        );

        Ok(LossReport {
            target_date,
            commit_count: commits.len(),
            breakdown,
        })
    }

    /// Streams the snapshots of `commits` into `aggregate`. The first
    /// retrieval or parse failure stops the stream and fails the run.
    fn collect_broken_time(
        &self,
        commits: &[Commit],
        target_date: NaiveDate,
    ) -> Result<BrokenTimeMap, AppError> {
        let mut failure = None;
        let snapshots = commits
            .iter()
            .map_while(|commit| match self.load_snapshot(commit, target_date) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    failure = Some(err);
                    None
                }
            });
        let broken_time = aggregate(snapshots);

        match failure {
            Some(err) => Err(err),
            None => Ok(broken_time),
        }
    }

    fn load_snapshot(&self, commit: &Commit, target_date: NaiveDate) -> Result<Snapshot, AppError> {
        let raw = self.store.get_snapshot(&commit.id)?;
        let snapshot = parse_snapshot(&commit.id, &raw)
            .map_err(|e| AppError::from_analytics(e, target_date))?;
        if snapshot.is_empty() {
            warn!(commit = commit.id.short(), "snapshot holds no restaurants");
        }
        debug!(
            commit = commit.id.short(),
            at = %commit.timestamp,
            records = snapshot.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// Runs the whole estimate from configuration: validates the model,
/// materializes the cached archive clone and runs the pipeline over it.
pub fn estimate_for_date(
    config: &EstimatorConfig,
    target_date: NaiveDate,
    reinit: bool,
) -> Result<LossReport, AppError> {
    let model = config.economic_model()?;

    let cache = ArchiveCache::new(config.archive_url.as_str(), config.cache_dir.as_path());
    let archive = cache
        .open_or_clone(reinit)?
        .with_snapshot_path(config.snapshot_path.as_str());
    info!(url = cache.url(), "archive successfully loaded");

    match config.extract_dir() {
        Some(dir) => {
            let store = ExtractingStore::new(&archive, dir)?;
            LossPipeline::new(&archive, store, model)
                .with_branch(config.branch.as_str())
                .run(target_date)
        }
        None => LossPipeline::new(&archive, &archive, model)
            .with_branch(config.branch.as_str())
            .run(target_date),
    }
}
