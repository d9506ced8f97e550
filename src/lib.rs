// McBroken lost-revenue library
// Estimates the USA revenue lost to broken ice-cream machines on a given day

pub mod analytics;
pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;

pub use error::AppError;
pub use pipeline::{estimate_for_date, parse_target_date, LossPipeline, LossReport};
