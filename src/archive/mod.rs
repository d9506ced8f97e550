//! Snapshot archive access
//!
//! The pipeline only sees two read contracts: a `HistoryProvider` that lists
//! the commits of a branch and a `SnapshotStore` that returns the payload
//! recorded at a commit. `GitArchive` implements both over a local clone
//! that `ArchiveCache` keeps up to date.

pub mod cache;
pub mod error;
pub mod extract;
pub mod git_archive;
pub mod memory;

pub use cache::ArchiveCache;
pub use error::ArchiveError;
pub use extract::ExtractingStore;
pub use git_archive::{GitArchive, DEFAULT_SNAPSHOT_PATH};
pub use memory::MemoryArchive;

use crate::models::{Commit, CommitId};

/// Lists the commit history of a branch
pub trait HistoryProvider {
    /// Commits reachable from `branch`, newest first
    fn list_commits(&self, branch: &str) -> Result<Vec<Commit>, ArchiveError>;
}

/// Returns the raw snapshot payload recorded at a commit.
///
/// Implementations must be idempotent: the same id always yields the same
/// payload.
pub trait SnapshotStore {
    fn get_snapshot(&self, commit: &CommitId) -> Result<String, ArchiveError>;
}

impl<T: HistoryProvider + ?Sized> HistoryProvider for &T {
    fn list_commits(&self, branch: &str) -> Result<Vec<Commit>, ArchiveError> {
        (**self).list_commits(branch)
    }
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn get_snapshot(&self, commit: &CommitId) -> Result<String, ArchiveError> {
        (**self).get_snapshot(commit)
    }
}
