//! Analytics error types

use thiserror::Error;

use crate::models::CommitId;

/// Failures of the aggregation and estimation stages
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The broken-time map holds no restaurant, so there is nothing to
    /// divide the daily income across
    #[error("no restaurants observed")]
    NoRestaurants,

    /// A snapshot payload does not have the expected structure
    #[error("malformed snapshot in commit {commit}: {source}")]
    MalformedSnapshot {
        commit: CommitId,
        #[source]
        source: serde_json::Error,
    },

    /// An economic assumption is negative, NaN or infinite
    #[error("invalid economic assumption {name}: {value}")]
    InvalidAssumption { name: &'static str, value: f64 },
}
