//! Archive error types
//!
//! Every failure to materialize or read the snapshot archive maps to one
//! `ArchiveError` variant.

use thiserror::Error;

/// Snapshot archive access error
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Path exists but is not a git repository
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// Cloning the remote archive failed
    #[error("could not clone {url}: {reason}")]
    CloneFailed {
        /// Remote URL
        url: String,
        /// git output or spawn error
        reason: String,
    },

    /// Neither a local nor an `origin/` branch with this name exists
    #[error("branch not found: {0}")]
    BranchNotFound(String),

    /// Commit id is not a valid object hash or not a commit
    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),

    /// Commit carries a timestamp chrono cannot represent
    #[error("commit {0} has an out-of-range timestamp")]
    InvalidTimestamp(String),

    /// The snapshot file is absent from a commit tree
    #[error("snapshot file {path} not found in commit {commit}")]
    SnapshotNotFound {
        /// Commit SHA
        commit: String,
        /// Path inside the tree
        path: String,
    },

    /// Blob content is not valid UTF-8
    #[error("snapshot in commit {0} is not valid UTF-8")]
    InvalidUtf8(String),

    /// Local filesystem error (cache directory, extracted files)
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Underlying libgit2 error
    #[error("git error: {0}")]
    RepositoryError(#[from] git2::Error),
}
