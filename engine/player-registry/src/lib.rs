//! Player Registry - resolves NFL player identities
//!
//! Maps player names to GSIS IDs from season totals, and GSIS IDs to roster
//! positions. Lookups that miss return `None` so callers can leave the
//! player ungraded instead of failing.

pub mod registry;
pub mod types;

pub use registry::PlayerRegistry;
pub use types::{Position, RegistryLookupError};
