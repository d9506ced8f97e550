//! Outage analytics
//!
//! The core of the tool, three pure stages:
//!
//! - **Selection**: pick the commits of the target date, oldest first
//! - **Aggregation**: count broken-hours per restaurant across the snapshots
//! - **Estimation**: convert broken-hours into dollars with an
//!   [`EconomicModel`]

mod types;


pub use types::*;

pub mod aggregator;
pub mod error;
pub mod estimator;
pub mod selector;

pub use aggregator::{aggregate, parse_snapshot};
pub use error::AnalyticsError;
pub use estimator::{estimate_loss, loss_breakdown};
pub use selector::select_commits;
