use crate::types::{Position, RegistryLookupError};
use player_data::{DataSnapshot, RosterRecord, SeasonPlayerRecord};
use std::collections::HashMap;
use tracing::{info, warn};

/// Player Registry - resolves names to IDs and IDs to positions
///
/// Built once from a snapshot's season and roster tables and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    /// Map from player name to GSIS ID (last season row wins)
    ids_by_name: HashMap<String, String>,

    /// Map from GSIS ID to roster position
    positions_by_id: HashMap<String, Position>,
}

impl PlayerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build both lookups from a loaded snapshot
    pub fn from_snapshot(snapshot: &DataSnapshot) -> Self {
        Self::from_records(&snapshot.season_players, &snapshot.roster)
    }

    /// Build both lookups from season totals and roster rows
    pub fn from_records(season_players: &[SeasonPlayerRecord], roster: &[RosterRecord]) -> Self {
        let mut ids_by_name = HashMap::with_capacity(season_players.len());
        for record in season_players {
            let previous = ids_by_name.insert(record.player_name.clone(), record.player_id.clone());
            if let Some(previous) = previous {
                if previous != record.player_id {
                    warn!(
                        "Duplicate player name {}: {} replaces {}",
                        record.player_name, record.player_id, previous
                    );
                }
            }
        }

        let positions_by_id: HashMap<String, Position> = roster
            .iter()
            .map(|entry| (entry.gsis_id.clone(), Position::from(entry.position.clone())))
            .collect();

        info!(
            "Player registry built with {} names and {} roster positions",
            ids_by_name.len(),
            positions_by_id.len()
        );

        Self { ids_by_name, positions_by_id }
    }

    /// Get the player ID for a name
    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.ids_by_name.get(name).map(String::as_str)
    }

    /// Get the roster position for a player ID
    pub fn position_for_id(&self, player_id: &str) -> Option<&Position> {
        self.positions_by_id.get(player_id)
    }

    /// Resolve a player name all the way to a roster position
    pub fn position_for_name(&self, name: &str) -> Option<&Position> {
        self.id_for_name(name).and_then(|id| self.position_for_id(id))
    }

    /// Like [`id_for_name`](Self::id_for_name), but reports the miss
    pub fn require_id(&self, name: &str) -> Result<&str, RegistryLookupError> {
        self.id_for_name(name).ok_or_else(|| RegistryLookupError::PlayerNotFound(name.to_string()))
    }

    /// Like [`position_for_name`](Self::position_for_name), but reports which lookup missed
    pub fn require_position(&self, name: &str) -> Result<&Position, RegistryLookupError> {
        let id = self.require_id(name)?;
        self.position_for_id(id)
            .ok_or_else(|| RegistryLookupError::PositionNotFound(id.to_string()))
    }

    /// Number of distinct player names
    pub fn player_count(&self) -> usize {
        self.ids_by_name.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.ids_by_name.is_empty() && self.positions_by_id.is_empty()
    }

    /// Search for players by partial name match
    pub fn search_players(&self, query: &str) -> Vec<(&str, &str)> {
        let query_lower = query.to_lowercase();
        let mut matches: Vec<(&str, &str)> = self
            .ids_by_name
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(&query_lower))
            .map(|(name, id)| (name.as_str(), id.as_str()))
            .collect();
        matches.sort_unstable();
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season_record(id: &str, name: &str, team: &str) -> SeasonPlayerRecord {
        SeasonPlayerRecord {
            player_id: id.to_string(),
            player_name: name.to_string(),
            recent_team: team.to_string(),
            passing_tds: 0,
            passing_yards: 0,
            receiving_tds: 0,
            receiving_yards: 0,
            target_share: 0.0,
        }
    }

    fn create_test_registry() -> PlayerRegistry {
        let season = vec![
            season_record("00-0034796", "Lamar Jackson", "BAL"),
            season_record("00-0034857", "Josh Allen", "BUF"),
            season_record("00-0037000", "Rookie Receiver", "NYJ"),
        ];
        let roster = vec![
            RosterRecord::new("00-0034796", "QB"),
            RosterRecord::new("00-0034857", "QB"),
        ];
        PlayerRegistry::from_records(&season, &roster)
    }

    #[test]
    fn test_registry_creation() {
        let registry = create_test_registry();

        assert_eq!(registry.player_count(), 3);
        assert!(!registry.is_empty());
        assert!(PlayerRegistry::new().is_empty());
    }

    #[test]
    fn test_name_and_position_lookup() {
        let registry = create_test_registry();

        assert_eq!(registry.id_for_name("Lamar Jackson"), Some("00-0034796"));
        assert_eq!(registry.position_for_name("Josh Allen"), Some(&Position::QB));
        assert_eq!(registry.position_for_id("00-0034857"), Some(&Position::QB));
    }

    #[test]
    fn test_lookup_misses_are_absent() {
        let registry = create_test_registry();

        assert_eq!(registry.id_for_name("Nobody"), None);
        assert_eq!(registry.position_for_name("Nobody"), None);
        // Has an ID but no roster row
        assert_eq!(registry.position_for_name("Rookie Receiver"), None);

        assert_eq!(
            registry.require_id("Nobody"),
            Err(RegistryLookupError::PlayerNotFound("Nobody".to_string()))
        );
        assert_eq!(
            registry.require_position("Rookie Receiver"),
            Err(RegistryLookupError::PositionNotFound("00-0037000".to_string()))
        );
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let season = vec![
            season_record("00-0001", "Mike Williams", "LAC"),
            season_record("00-0002", "Mike Williams", "NYJ"),
        ];
        let registry = PlayerRegistry::from_records(&season, &[]);

        assert_eq!(registry.player_count(), 1);
        assert_eq!(registry.id_for_name("Mike Williams"), Some("00-0002"));
    }

    #[test]
    fn test_search_players() {
        let registry = create_test_registry();

        let results = registry.search_players("jos");
        assert_eq!(results, vec![("Josh Allen", "00-0034857")]);

        let results = registry.search_players("a");
        assert_eq!(results.len(), 2);
    }
}
