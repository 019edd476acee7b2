use crate::error::{MetricsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Configuration for the player metrics pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Consistency grading parameters
    pub grading: GradingConfig,

    /// Team share parameters
    pub share: ShareConfig,

    /// Payload output settings
    pub output: OutputConfig,

    /// Logging settings for the CLI
    pub logging: LoggingConfig,
}

/// Which consistency grading algorithm a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMethod {
    /// Letter grade from the sample variance of weekly scores
    Variance,
    /// Letter grade from weeks above a position threshold
    #[default]
    GoodGames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    pub method: GradingMethod,

    /// Variance cutoffs for the variance method
    pub variance_bands: VarianceBands,

    /// Fantasy points a week must exceed to count as a good game, keyed by
    /// uppercase position label. Entries read from a file are merged over the
    /// defaults.
    #[serde(deserialize_with = "merge_thresholds")]
    pub good_game_thresholds: HashMap<String, f64>,

    /// Minimum weeks before a player is graded
    pub min_weeks: usize,
}

/// Upper (exclusive) variance bounds for grades A, B and C; anything else is D
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceBands {
    pub a_below: f64,
    pub b_below: f64,
    pub c_below: f64,
}

/// What to do when a team's passing total is zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroTotalPolicy {
    /// Treat the affected share as 0.0
    #[default]
    ZeroShare,
    /// Leave the player out when both team totals are zero; a single zero
    /// total still gives a 0.0 share for that component
    SkipPlayer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub zero_total_policy: ZeroTotalPolicy,

    /// Rows shown by the CLI; `None` shows every row
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON payloads
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g., "info", "metrics_engine=debug")
    pub level: String,

    /// "json", "pretty" or "compact"
    pub format: String,
}

fn default_thresholds() -> HashMap<String, f64> {
    let mut thresholds = HashMap::new();
    thresholds.insert("QB".to_string(), 19.2);
    thresholds.insert("RB".to_string(), 14.8);
    thresholds.insert("WR".to_string(), 14.2);
    thresholds.insert("TE".to_string(), 10.4);
    thresholds
}

/// Overlay configured thresholds on the defaults, uppercasing position keys
fn merge_thresholds<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<String, f64>::deserialize(deserializer)?;
    let mut thresholds = default_thresholds();
    for (position, threshold) in overrides {
        thresholds.insert(position.trim().to_uppercase(), threshold);
    }
    Ok(thresholds)
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            method: GradingMethod::default(),
            variance_bands: VarianceBands::default(),
            good_game_thresholds: default_thresholds(),
            min_weeks: 2,
        }
    }
}

impl GradingConfig {
    /// Good-game threshold for a position label, matched case-insensitively
    pub fn good_game_threshold(&self, position: &str) -> Option<f64> {
        let position = position.trim();
        self.good_game_thresholds
            .get(position)
            .or_else(|| self.good_game_thresholds.get(&position.to_uppercase()))
            .copied()
    }
}

impl Default for VarianceBands {
    fn default() -> Self {
        Self { a_below: 40.0, b_below: 60.0, c_below: 90.0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl GradingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradingMethod::Variance => "variance",
            GradingMethod::GoodGames => "good_games",
        }
    }
}

impl fmt::Display for GradingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradingMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "variance" => Ok(GradingMethod::Variance),
            "good_games" => Ok(GradingMethod::GoodGames),
            other => Err(format!(
                "unknown grading method '{other}' (expected variance or good-games)"
            )),
        }
    }
}

impl FromStr for ZeroTotalPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "zero_share" => Ok(ZeroTotalPolicy::ZeroShare),
            "skip_player" => Ok(ZeroTotalPolicy::SkipPlayer),
            other => Err(format!("unknown zero total policy '{other}'")),
        }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MetricsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Override fields from `METRICS_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(method) = std::env::var("METRICS_GRADING_METHOD") {
            self.grading.method = method.parse().map_err(MetricsError::Config)?;
        }

        if let Ok(min_weeks) = std::env::var("METRICS_MIN_WEEKS") {
            self.grading.min_weeks = min_weeks.parse().unwrap_or(2);
        }

        if let Ok(policy) = std::env::var("METRICS_ZERO_TOTAL_POLICY") {
            self.share.zero_total_policy = policy.parse().map_err(MetricsError::Config)?;
        }

        if let Ok(top_n) = std::env::var("METRICS_TOP_N") {
            self.share.top_n = top_n.parse().ok();
        }

        if let Ok(level) = std::env::var("METRICS_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Reject settings the grader cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.grading.min_weeks < 2 {
            return Err(MetricsError::Config(format!(
                "min_weeks must be at least 2 for a sample variance, got {}",
                self.grading.min_weeks
            )));
        }

        let bands = &self.grading.variance_bands;
        if !(bands.a_below < bands.b_below && bands.b_below < bands.c_below) {
            return Err(MetricsError::Config(format!(
                "variance bands must be strictly increasing, got {} / {} / {}",
                bands.a_below, bands.b_below, bands.c_below
            )));
        }

        for (position, threshold) in &self.grading.good_game_thresholds {
            if position.as_str() != position.to_uppercase() {
                return Err(MetricsError::Config(format!(
                    "good game threshold key '{position}' must be an uppercase position label"
                )));
            }
            if !threshold.is_finite() || *threshold < 0.0 {
                return Err(MetricsError::Config(format!(
                    "good game threshold for {position} must be non-negative, got {threshold}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MetricsConfig::default();

        assert_eq!(config.grading.method, GradingMethod::GoodGames);
        assert_eq!(config.grading.min_weeks, 2);
        assert_eq!(config.grading.good_game_threshold("QB"), Some(19.2));
        assert_eq!(config.grading.good_game_threshold("TE"), Some(10.4));
        assert_eq!(config.grading.good_game_threshold("K"), None);
        assert_eq!(config.share.zero_total_policy, ZeroTotalPolicy::ZeroShare);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MetricsConfig = toml::from_str(
            r#"
            [grading]
            method = "variance"

            [grading.variance_bands]
            a_below = 30.0
            b_below = 50.0
            c_below = 80.0

            [share]
            zero_total_policy = "skip_player"
            top_n = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.grading.method, GradingMethod::Variance);
        assert_eq!(config.grading.variance_bands.a_below, 30.0);
        assert_eq!(config.grading.good_game_threshold("WR"), Some(14.2));
        assert_eq!(config.share.zero_total_policy, ZeroTotalPolicy::SkipPlayer);
        assert_eq!(config.share.top_n, Some(50));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_threshold_override_keeps_defaults() {
        let config: MetricsConfig = toml::from_str(
            r#"
            [grading.good_game_thresholds]
            QB = 20.0
            k = 9.5
            "#,
        )
        .unwrap();

        let grading = &config.grading;
        assert_eq!(grading.good_game_threshold("QB"), Some(20.0));
        assert_eq!(grading.good_game_threshold("RB"), Some(14.8));
        assert_eq!(grading.good_game_threshold("WR"), Some(14.2));
        assert_eq!(grading.good_game_threshold("TE"), Some(10.4));
        assert_eq!(grading.good_game_threshold("K"), Some(9.5));
        assert!(grading.good_game_thresholds.contains_key("K"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lowercase_threshold_keys_match_positions() {
        let config: MetricsConfig =
            toml::from_str("[grading.good_game_thresholds]\nqb = 21.0\n").unwrap();

        assert_eq!(config.grading.good_game_threshold("QB"), Some(21.0));
        assert_eq!(config.grading.good_game_threshold("qb"), Some(21.0));
        assert!(config.validate().is_ok());

        let mut config = MetricsConfig::default();
        config.grading.good_game_thresholds.insert("wr".to_string(), 15.0);
        assert!(matches!(config.validate(), Err(MetricsError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.toml");
        std::fs::write(&path, "[output]\npretty = true\n").unwrap();

        let config = MetricsConfig::load_from_file(&path).unwrap();
        assert!(config.output.pretty);
        assert_eq!(config.grading.method, GradingMethod::GoodGames);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("good-games".parse::<GradingMethod>(), Ok(GradingMethod::GoodGames));
        assert_eq!("Variance".parse::<GradingMethod>(), Ok(GradingMethod::Variance));
        assert!("median".parse::<GradingMethod>().is_err());
        assert_eq!("skip-player".parse::<ZeroTotalPolicy>(), Ok(ZeroTotalPolicy::SkipPlayer));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = MetricsConfig::default();
        config.grading.min_weeks = 1;
        assert!(matches!(config.validate(), Err(MetricsError::Config(_))));

        let mut config = MetricsConfig::default();
        config.grading.variance_bands.b_below = 30.0;
        assert!(config.validate().is_err());

        let mut config = MetricsConfig::default();
        config.grading.good_game_thresholds.insert("K".to_string(), f64::NAN);
        assert!(config.validate().is_err());
    }
}
