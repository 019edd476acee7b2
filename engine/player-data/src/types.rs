use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One week of PPR fantasy scoring for a player.
///
/// The week itself is implicit: rows arrive in weekly order and that order is
/// preserved all the way through aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStatRecord {
    /// Player name (e.g., "Justin Jefferson")
    pub player_name: String,
    /// PPR fantasy points scored that week
    pub fantasy_points_ppr: f64,
}

/// Season totals for a single player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPlayerRecord {
    /// GSIS player ID (e.g., "00-0036322")
    pub player_id: String,
    /// Player name (e.g., "Justin Jefferson")
    pub player_name: String,
    /// Team abbreviation the player last appeared for (e.g., "MIN")
    pub recent_team: String,
    pub passing_tds: i64,
    pub passing_yards: i64,
    pub receiving_tds: i64,
    pub receiving_yards: i64,
    /// Share of team targets, in [0, 1]
    pub target_share: f64,
}

/// Roster entry mapping a GSIS ID to a listed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub gsis_id: String,
    /// Position as listed on the roster (QB, RB, WR, TE, K, ...)
    pub position: String,
}

/// Season passing totals reported for a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatRecord {
    pub team: String,
    pub passing_tds: i64,
    pub passing_yards: i64,
}

/// Immutable copy of every input table for one season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSnapshot {
    /// Season year
    pub season: String,
    /// When this snapshot was loaded
    pub loaded_at: DateTime<Utc>,
    pub weekly: Vec<WeeklyStatRecord>,
    pub season_players: Vec<SeasonPlayerRecord>,
    pub roster: Vec<RosterRecord>,
    /// Optional; empty when no team table was supplied
    pub team_stats: Vec<TeamStatRecord>,
}

impl DataSnapshot {
    /// Build a snapshot from records already in memory
    pub fn from_records(
        season: impl Into<String>,
        weekly: Vec<WeeklyStatRecord>,
        season_players: Vec<SeasonPlayerRecord>,
        roster: Vec<RosterRecord>,
        team_stats: Vec<TeamStatRecord>,
    ) -> Self {
        Self {
            season: season.into(),
            loaded_at: Utc::now(),
            weekly,
            season_players,
            roster,
            team_stats,
        }
    }

    /// Total number of rows across all tables
    pub fn row_count(&self) -> usize {
        self.weekly.len() + self.season_players.len() + self.roster.len() + self.team_stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

impl WeeklyStatRecord {
    pub fn new(player_name: impl Into<String>, fantasy_points_ppr: f64) -> Self {
        Self { player_name: player_name.into(), fantasy_points_ppr }
    }
}

impl RosterRecord {
    pub fn new(gsis_id: impl Into<String>, position: impl Into<String>) -> Self {
        Self { gsis_id: gsis_id.into(), position: position.into() }
    }
}
