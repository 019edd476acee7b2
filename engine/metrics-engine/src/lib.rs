//! # Metrics Engine
//!
//! Player metrics for the fantasy portal: weekly-score consistency grades and
//! receiving share of team passing production, joined per player.
//!
//! Every run recomputes all derived tables from an immutable
//! [`player_data::DataSnapshot`]; nothing is cached between runs.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod error;
pub mod grader;
pub mod joiner;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod share;


pub use config::{GradingMethod, MetricsConfig, ZeroTotalPolicy};
pub use error::{MetricsError, Result};
pub use grader::ConsistencyGrader;
pub use models::*;
pub use pipeline::MetricsPipeline;
pub use share::ShareCalculator;
