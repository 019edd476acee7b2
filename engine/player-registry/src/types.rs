use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roster position of an NFL player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    /// Team defense / special teams
    DEF,
    /// Any other listed position (OL, LB, CB, ...)
    Other(String),
}

impl Position {
    pub fn as_str(&self) -> &str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
            Position::Other(label) => label,
        }
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_uppercase();
        Ok(match label.as_str() {
            "QB" => Position::QB,
            "RB" => Position::RB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "K" => Position::K,
            "DEF" | "DST" | "D/ST" => Position::DEF,
            _ => Position::Other(label),
        })
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(position) => position,
            Err(never) => match never {},
        }
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during identity lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryLookupError {
    /// No season record carries this player name
    PlayerNotFound(String),

    /// The player ID has no roster entry
    PositionNotFound(String),
}

impl fmt::Display for RegistryLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryLookupError::PlayerNotFound(name) => {
                write!(f, "Player '{name}' not found in registry")
            }
            RegistryLookupError::PositionNotFound(id) => {
                write!(f, "No roster position for player ID {id}")
            }
        }
    }
}

impl std::error::Error for RegistryLookupError {}
