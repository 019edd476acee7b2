use chrono::{DateTime, Utc};
use player_registry::PlayerRegistry;
use player_registry::RegistryLookupError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::config::GradingMethod;

/// Weekly PPR scores per player, in the order the weeks were read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerScoreSeries {
    scores: HashMap<String, Vec<f64>>,
}

impl PlayerScoreSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one week for `player_name`, creating the series on first sight
    pub fn push(&mut self, player_name: &str, points: f64) {
        match self.scores.get_mut(player_name) {
            Some(series) => series.push(points),
            None => {
                self.scores.insert(player_name.to_string(), vec![points]);
            }
        }
    }

    /// Scores for a player; an unknown player has an empty series
    pub fn scores(&self, player_name: &str) -> &[f64] {
        self.scores.get(player_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn weeks_played(&self, player_name: &str) -> usize {
        self.scores(player_name).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.scores.iter().map(|(name, scores)| (name.as_str(), scores.as_slice()))
    }

    pub fn player_count(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Consistency grade label
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
    /// Ungraded: too few weeks or no resolvable identity
    #[default]
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The statistic a grade was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeBasis {
    /// Sample variance of weekly scores
    Variance(f64),
    /// Weeks above the position threshold
    GoodGames(u32),
}

/// A single player's grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradedPlayer {
    pub grade: Grade,
    pub basis: GradeBasis,
    pub weeks: usize,
}

/// Grades keyed by player name
///
/// Players never graded read back as [`Grade::F`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerGrades {
    grades: BTreeMap<String, GradedPlayer>,
}

impl PlayerGrades {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player_name: impl Into<String>, graded: GradedPlayer) {
        self.grades.insert(player_name.into(), graded);
    }

    pub fn get(&self, player_name: &str) -> Option<&GradedPlayer> {
        self.grades.get(player_name)
    }

    /// Grade for a player, defaulting to F when ungraded
    pub fn grade_for(&self, player_name: &str) -> Grade {
        self.get(player_name).map(|graded| graded.grade).unwrap_or_default()
    }

    /// Iterate in player-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GradedPlayer)> {
        self.grades.iter().map(|(name, graded)| (name.as_str(), graded))
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Mean of the variances behind variance-method grades
    pub fn mean_variance(&self) -> Option<f64> {
        let variances: Vec<f64> = self
            .grades
            .values()
            .filter_map(|graded| match graded.basis {
                GradeBasis::Variance(variance) => Some(variance),
                GradeBasis::GoodGames(_) => None,
            })
            .collect();

        if variances.is_empty() {
            None
        } else {
            Some(variances.iter().sum::<f64>() / variances.len() as f64)
        }
    }
}

/// Summed season passing production for one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotal {
    pub passing_tds: i64,
    pub passing_yards: i64,
}

/// Passing totals keyed by team abbreviation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTotals {
    teams: BTreeMap<String, TeamTotal>,
}

impl TeamTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, team: &str, passing_tds: i64, passing_yards: i64) {
        let total = self.teams.entry(team.to_string()).or_default();
        total.passing_tds += passing_tds;
        total.passing_yards += passing_yards;
    }

    /// Totals for a team; an unknown team totals zero
    pub fn get(&self, team: &str) -> TeamTotal {
        self.teams.get(team).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeamTotal)> {
        self.teams.iter().map(|(team, total)| (team.as_str(), total))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Receiving share of team passing production for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareMetrics {
    pub player_id: String,
    pub player_name: String,
    pub recent_team: String,
    pub percent_rec_tds: f64,
    pub percent_rec_yards: f64,
    pub target_share: f64,
    /// Equal-weight blend of yards, TDs and target share
    pub rec_dom: f64,
    /// 1/4 yards + 1/2 TDs + 1/4 target share
    pub rec_share: f64,
    pub rec_share_pct: String,
}

/// Final per-player payload row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    #[serde(skip)]
    pub player_id: String,
    pub player_name: String,
    pub recent_team: String,
    pub percent_rec_tds: f64,
    pub percent_rec_yards: f64,
    pub rec_dom: f64,
    pub rec_share: f64,
    pub rec_share_pct: String,
    pub consistency_grade: Grade,
}

/// Joined metrics in rank order
///
/// Serializes as a JSON object keyed by player ID, not as an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedMetrics {
    rows: Vec<JoinedRow>,
}

impl JoinedMetrics {
    pub fn new(rows: Vec<JoinedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    pub fn get(&self, player_id: &str) -> Option<&JoinedRow> {
        self.rows.iter().find(|row| row.player_id == player_id)
    }

    /// First `limit` rows, keeping rank order
    pub fn top(&self, limit: usize) -> JoinedMetrics {
        JoinedMetrics { rows: self.rows.iter().take(limit).cloned().collect() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for JoinedMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.player_id, row)?;
        }
        map.end()
    }
}

/// A team whose summed player passing totals disagree with the team table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotalMismatch {
    pub team: String,
    pub derived_tds: i64,
    pub reported_tds: i64,
    pub derived_yards: i64,
    pub reported_yards: i64,
}

/// Counters describing one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub season: String,
    pub method: GradingMethod,
    /// Players with at least one weekly score
    pub players_series: usize,
    pub players_graded: usize,
    /// Players skipped for having too few weeks
    pub insufficient_sample: usize,
    /// Players skipped because no ID or roster position resolved
    pub missing_identity: usize,
    /// Teams with a zero passing total, sorted
    pub zero_total_teams: Vec<String>,
    pub share_rows: usize,
    pub mean_variance: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

/// Everything produced by a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub metrics: JoinedMetrics,
    pub grades: PlayerGrades,
    pub summary: RunSummary,
    pub reconciliation: Vec<TeamTotalMismatch>,
    #[serde(skip)]
    pub registry: PlayerRegistry,
}

impl MetricsReport {
    /// Joined row for a player looked up by name
    pub fn player(&self, name: &str) -> Result<&JoinedRow, RegistryLookupError> {
        let player_id = self.registry.require_id(name)?;
        self.metrics
            .get(player_id)
            .ok_or_else(|| RegistryLookupError::PlayerNotFound(name.to_string()))
    }
}

/// Render any payload as JSON, pretty-printed when asked
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> crate::error::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
