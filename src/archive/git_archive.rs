//! git2-backed snapshot archive
//!
//! Reads the archive history and historical `mcbroken.json` blobs straight
//! from the object database. Strictly read-only: no checkout, the working
//! directory is never touched.

use std::path::Path;

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{BranchType, Oid, Repository, Sort};
use tracing::debug;

use super::error::ArchiveError;
use super::{HistoryProvider, SnapshotStore};
use crate::models::{Commit, CommitId};

/// File each archive commit stores its snapshot in
pub const DEFAULT_SNAPSHOT_PATH: &str = "mcbroken.json";

/// Local clone of the snapshot archive
pub struct GitArchive {
    repo: Repository,
    snapshot_path: String,
}

impl GitArchive {
    /// Opens an existing repository
    ///
    /// # Errors
    /// Returns `NotARepository` when the path holds no git repository
    pub fn open(repo_path: &Path) -> Result<Self, ArchiveError> {
        let repo = Repository::open(repo_path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                ArchiveError::NotARepository(repo_path.display().to_string())
            } else {
                ArchiveError::RepositoryError(e)
            }
        })?;
        Ok(Self {
            repo,
            snapshot_path: DEFAULT_SNAPSHOT_PATH.to_string(),
        })
    }

    /// Reads snapshots from `path` instead of `mcbroken.json`
    pub fn with_snapshot_path(mut self, path: impl Into<String>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    pub fn snapshot_path(&self) -> &str {
        &self.snapshot_path
    }

    /// Resolves a branch name to its tip, trying the local branch first and
    /// then the `origin/` remote-tracking branch.
    fn resolve_branch(&self, branch: &str) -> Result<Oid, ArchiveError> {
        let found = match self.repo.find_branch(branch, BranchType::Local) {
            Ok(b) => b,
            Err(_) => self
                .repo
                .find_branch(&format!("origin/{branch}"), BranchType::Remote)
                .map_err(|_| ArchiveError::BranchNotFound(branch.to_string()))?,
        };

        found
            .get()
            .target()
            .ok_or_else(|| ArchiveError::BranchNotFound(branch.to_string()))
    }

    /// Reads a file from a commit tree without checking it out
    ///
    /// # Arguments
    /// * `commit_oid` - Commit OID
    /// * `file_path` - Path relative to the repository root
    pub fn get_file_at_commit(&self, commit_oid: Oid, file_path: &str) -> Result<String, ArchiveError> {
        let commit = self
            .repo
            .find_commit(commit_oid)
            .map_err(|_| ArchiveError::InvalidCommitId(commit_oid.to_string()))?;
        let tree = commit.tree()?;

        let entry = tree.get_path(Path::new(file_path)).map_err(|_| {
            ArchiveError::SnapshotNotFound {
                commit: commit_oid.to_string(),
                path: file_path.to_string(),
            }
        })?;

        let blob = self.repo.find_blob(entry.id()).map_err(|_| ArchiveError::SnapshotNotFound {
            commit: commit_oid.to_string(),
            path: file_path.to_string(),
        })?;
        let content = std::str::from_utf8(blob.content())
            .map_err(|_| ArchiveError::InvalidUtf8(commit_oid.to_string()))?;

        Ok(content.to_string())
    }
}

/// Committer time in the committer's recorded offset
fn commit_timestamp(commit: &git2::Commit<'_>) -> Result<DateTime<FixedOffset>, ArchiveError> {
    let time = commit.time();
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single())
        .ok_or_else(|| ArchiveError::InvalidTimestamp(commit.id().to_string()))
}

impl HistoryProvider for GitArchive {
    /// Walks the branch history newest-first (revwalk time order)
    fn list_commits(&self, branch: &str) -> Result<Vec<Commit>, ArchiveError> {
        let tip = self.resolve_branch(branch)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip)?;
        revwalk.set_sorting(Sort::TIME)?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(Commit::new(oid.to_string(), commit_timestamp(&commit)?));
        }

        debug!(branch, count = commits.len(), "listed archive history");
        Ok(commits)
    }
}

impl SnapshotStore for GitArchive {
    fn get_snapshot(&self, commit: &CommitId) -> Result<String, ArchiveError> {
        let oid = Oid::from_str(commit.as_str())
            .map_err(|_| ArchiveError::InvalidCommitId(commit.to_string()))?;
        self.get_file_at_commit(oid, &self.snapshot_path)
    }
}
