//! Unified application error types
//!
//! Provides the user-facing error taxonomy of a run. Each variant maps to a
//! distinct process exit code and a stable machine-readable code.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::models::CommitId;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The archive could not be cloned, opened or read
    #[error("could not load archive: {0}")]
    ArchiveUnavailable(#[from] ArchiveError),

    /// No commit matched the date, or no restaurant was observed
    #[error("no data available for {date}")]
    NoDataForDate { date: NaiveDate },

    /// A snapshot payload does not parse; the whole run is abandoned
    #[error("malformed snapshot in commit {commit}: {source}")]
    MalformedSnapshot {
        commit: CommitId,
        #[source]
        source: serde_json::Error,
    },

    /// Target date not in DD/MM/YY format
    #[error("invalid target date {input:?}: expected DD/MM/YY")]
    InvalidDate { input: String },

    /// Configuration file or economic assumptions are invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Serializable error response for `--json` output
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for scripted handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl AppError {
    /// Maps a stage error of the run for `date` onto the user taxonomy
    pub fn from_analytics(err: AnalyticsError, date: NaiveDate) -> Self {
        match err {
            AnalyticsError::NoRestaurants => Self::NoDataForDate { date },
            AnalyticsError::MalformedSnapshot { commit, source } => {
                Self::MalformedSnapshot { commit, source }
            }
            other @ AnalyticsError::InvalidAssumption { .. } => {
                Self::Config(ConfigError::Economics(other))
            }
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArchiveUnavailable(_) => "ARCHIVE_UNAVAILABLE",
            Self::NoDataForDate { .. } => "NO_DATA_FOR_DATE",
            Self::MalformedSnapshot { .. } => "MALFORMED_SNAPSHOT",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidDate { .. } | Self::Config(_) => 2,
            Self::ArchiveUnavailable(_) => 3,
            Self::NoDataForDate { .. } => 4,
            Self::MalformedSnapshot { .. } => 5,
        }
    }
}
