//! Error types for the metrics pipeline

use player_data::DataError;
use player_registry::RegistryLookupError;
use thiserror::Error;

/// Result type for metrics pipeline operations
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that abort a metrics run.
///
/// Per-player problems (too few weeks, unknown identity, zero team totals)
/// are never surfaced here; they fall back to default values instead.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Input data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Player lookup error: {0}")]
    Lookup(#[from] RegistryLookupError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
