//! Archive commit model
//!
//! A commit is a read-only reference into the archive history: its hash and
//! the committer timestamp in the offset the committer recorded.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Opaque commit identifier (hex object hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in log lines
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(10).map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One historical snapshot commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash
    pub id: CommitId,
    /// Committer time, kept in the committer's own UTC offset
    pub timestamp: DateTime<FixedOffset>,
}

impl Commit {
    pub fn new(id: impl Into<CommitId>, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            id: id.into(),
            timestamp,
        }
    }

    /// Calendar date as seen by the committer (no UTC normalization)
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

impl From<String> for CommitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
