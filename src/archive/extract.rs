//! Retained copies of extracted snapshots
//!
//! `ExtractingStore` wraps another store and writes every payload it serves
//! to `<dir>/<commit>.mcbroken.json`, so a run can be inspected afterwards.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::error::ArchiveError;
use super::SnapshotStore;
use crate::models::CommitId;

/// Suffix of extracted snapshot files
pub const EXTRACTED_SUFFIX: &str = ".mcbroken.json";

/// Snapshot store decorator that keeps a file copy of each payload
pub struct ExtractingStore<S> {
    inner: S,
    dir: PathBuf,
}

impl<S: SnapshotStore> ExtractingStore<S> {
    /// Wraps `inner`, creating `dir` when needed
    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { inner, dir })
    }

    /// Path the payload of `commit` is written to
    pub fn extracted_path(&self, commit: &CommitId) -> PathBuf {
        self.dir.join(format!("{}{}", commit.as_str(), EXTRACTED_SUFFIX))
    }
}

impl<S: SnapshotStore> SnapshotStore for ExtractingStore<S> {
    fn get_snapshot(&self, commit: &CommitId) -> Result<String, ArchiveError> {
        let payload = self.inner.get_snapshot(commit)?;
        let path = self.extracted_path(commit);
        fs::write(&path, &payload)?;
        debug!(commit = commit.short(), path = %path.display(), "extracted snapshot");
        Ok(payload)
    }
}
