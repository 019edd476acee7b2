//! Error types for loading player data tables

use std::path::PathBuf;
use thiserror::Error;

/// Result type for player data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised while reading an input table.
///
/// Every variant is structural: the table itself could not be read, so the
/// whole run is aborted rather than a single player being skipped.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported table format for {0} (expected .csv or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("Required table not found: {0}")]
    MissingTable(PathBuf),
}
