//! In-memory archive
//!
//! Holds commits and payloads directly; useful for flat-file dumps that were
//! loaded ahead of time and for exercising the pipeline without git.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use super::error::ArchiveError;
use super::{HistoryProvider, SnapshotStore};
use crate::models::{Commit, CommitId};

/// Archive kept entirely in memory, single linear history
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    commits: Vec<Commit>,
    payloads: HashMap<CommitId, String>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a commit on top of the history
    pub fn push(
        &mut self,
        id: impl Into<CommitId>,
        timestamp: DateTime<FixedOffset>,
        payload: impl Into<String>,
    ) -> CommitId {
        let commit = Commit::new(id, timestamp);
        let id = commit.id.clone();
        self.payloads.insert(id.clone(), payload.into());
        self.commits.push(commit);
        id
    }
}

impl HistoryProvider for MemoryArchive {
    /// Newest-first, like a history walk from the branch tip. The branch name
    /// is not interpreted.
    fn list_commits(&self, _branch: &str) -> Result<Vec<Commit>, ArchiveError> {
        Ok(self.commits.iter().rev().cloned().collect())
    }
}

impl SnapshotStore for MemoryArchive {
    fn get_snapshot(&self, commit: &CommitId) -> Result<String, ArchiveError> {
        self.payloads
            .get(commit)
            .cloned()
            .ok_or_else(|| ArchiveError::InvalidCommitId(commit.to_string()))
    }
}
