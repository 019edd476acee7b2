//! Player Data - raw NFL tables for the fantasy metrics pipeline
//!
//! Weekly scoring, season totals, rosters and team stats are loaded once into
//! an immutable [`DataSnapshot`] that downstream stages read but never modify.

pub mod error;
pub mod loader;
pub mod types;

pub use error::{DataError, Result};
pub use loader::{SnapshotLoader, SnapshotPaths};
pub use types::{DataSnapshot, RosterRecord, SeasonPlayerRecord, TeamStatRecord, WeeklyStatRecord};
