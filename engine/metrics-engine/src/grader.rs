//! Consistency grading
//!
//! Two mutually exclusive methods grade a player's weekly scores: the sample
//! variance of the series, or a count of "good games" above a
//! position-specific threshold. A run picks one through [`GradingMethod`].

use crate::config::{GradingConfig, GradingMethod, VarianceBands};
use crate::models::{GradeBasis, Grade, GradedPlayer, PlayerGrades, PlayerScoreSeries};
use player_registry::PlayerRegistry;
use tracing::{debug, info};

/// Grades plus the players that could not be graded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradingOutcome {
    pub grades: PlayerGrades,
    pub insufficient_sample: usize,
    pub missing_identity: usize,
}

/// Grades weekly score series with the configured method
#[derive(Debug, Clone)]
pub struct ConsistencyGrader {
    config: GradingConfig,
}

impl ConsistencyGrader {
    pub fn new(config: &GradingConfig) -> Self {
        let mut config = config.clone();
        config.min_weeks = config.min_weeks.max(2);
        Self { config }
    }

    pub fn method(&self) -> GradingMethod {
        self.config.method
    }

    /// Grade every player with enough weeks.
    ///
    /// The good-games method also needs a roster position; players whose name
    /// or ID does not resolve are left ungraded. The variance method grades
    /// on scores alone, but a graded name with no player ID still counts as
    /// missing identity since the joiner cannot place it.
    pub fn grade(&self, series: &PlayerScoreSeries, registry: &PlayerRegistry) -> GradingOutcome {
        let mut outcome = GradingOutcome::default();

        for (name, scores) in series.iter() {
            if scores.len() < self.config.min_weeks {
                debug!("Skipping {}: {} week(s) recorded", name, scores.len());
                outcome.insufficient_sample += 1;
                continue;
            }

            let graded = match self.config.method {
                GradingMethod::Variance => {
                    if registry.id_for_name(name).is_none() {
                        debug!("Graded {} by variance without a player ID", name);
                        outcome.missing_identity += 1;
                    }
                    self.grade_by_variance(scores)
                }
                GradingMethod::GoodGames => match registry.require_position(name) {
                    Ok(position) => {
                        let threshold = self.config.good_game_threshold(position.as_str());
                        self.grade_by_good_games(scores, threshold)
                    }
                    Err(err) => {
                        debug!("Skipping {}: {}", name, err);
                        outcome.missing_identity += 1;
                        continue;
                    }
                },
            };

            outcome.grades.insert(name, graded);
        }

        info!(
            "Graded {} players by {} ({} short samples, {} unresolved)",
            outcome.grades.len(),
            self.config.method,
            outcome.insufficient_sample,
            outcome.missing_identity
        );
        outcome
    }

    fn grade_by_variance(&self, scores: &[f64]) -> GradedPlayer {
        let variance = sample_variance(scores).unwrap_or(0.0);
        GradedPlayer {
            grade: variance_grade(variance, &self.config.variance_bands),
            basis: GradeBasis::Variance(variance),
            weeks: scores.len(),
        }
    }

    fn grade_by_good_games(&self, scores: &[f64], threshold: Option<f64>) -> GradedPlayer {
        let count = count_good_games(scores, threshold);
        GradedPlayer {
            grade: good_games_grade(count),
            basis: GradeBasis::GoodGames(count),
            weeks: scores.len(),
        }
    }
}

/// Sample variance (n - 1 denominator); `None` for fewer than two scores
pub fn sample_variance(scores: &[f64]) -> Option<f64> {
    if scores.len() < 2 {
        return None;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let sum_sq = scores.iter().map(|score| (score - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (n - 1.0))
}

/// Map a variance to A/B/C/D using exclusive upper bounds
pub fn variance_grade(variance: f64, bands: &VarianceBands) -> Grade {
    if variance < bands.a_below {
        Grade::A
    } else if variance < bands.b_below {
        Grade::B
    } else if variance < bands.c_below {
        Grade::C
    } else {
        Grade::D
    }
}

/// Weeks strictly above `threshold`; no threshold means no good games
pub fn count_good_games(scores: &[f64], threshold: Option<f64>) -> u32 {
    match threshold {
        Some(threshold) => scores.iter().filter(|&&score| score > threshold).count() as u32,
        None => 0,
    }
}

/// Map a good-game count to a letter grade.
///
/// Checked top-down, first match wins. Counts of 0-2 and 4 fall through to D.
pub fn good_games_grade(count: u32) -> Grade {
    if count >= 14 {
        Grade::APlus
    } else if count >= 12 {
        Grade::A
    } else if count >= 10 {
        Grade::AMinus
    } else if count >= 9 {
        Grade::BPlus
    } else if count >= 7 {
        Grade::B
    } else if count == 6 {
        Grade::BMinus
    } else if count == 5 {
        Grade::CPlus
    } else if count < 4 && count > 2 {
        Grade::C
    } else {
        Grade::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricsConfig;
    use player_data::{RosterRecord, SeasonPlayerRecord};

    fn season_record(id: &str, name: &str) -> SeasonPlayerRecord {
        SeasonPlayerRecord {
            player_id: id.to_string(),
            player_name: name.to_string(),
            recent_team: "DAL".to_string(),
            passing_tds: 0,
            passing_yards: 0,
            receiving_tds: 0,
            receiving_yards: 0,
            target_share: 0.0,
        }
    }

    fn test_registry() -> PlayerRegistry {
        PlayerRegistry::from_records(
            &[
                season_record("00-01", "Dak Prescott"),
                season_record("00-02", "CeeDee Lamb"),
                season_record("00-03", "Brandon Aubrey"),
                season_record("00-04", "Unrostered Guy"),
            ],
            &[
                RosterRecord::new("00-01", "QB"),
                RosterRecord::new("00-02", "WR"),
                RosterRecord::new("00-03", "K"),
            ],
        )
    }

    fn grader(method: GradingMethod) -> ConsistencyGrader {
        let mut config = MetricsConfig::default();
        config.grading.method = method;
        ConsistencyGrader::new(&config.grading)
    }

    fn series(entries: Vec<(&str, Vec<f64>)>) -> PlayerScoreSeries {
        let mut series = PlayerScoreSeries::new();
        for (name, scores) in entries {
            for score in scores {
                series.push(name, score);
            }
        }
        series
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(sample_variance(&[12.0]), None);
        assert_eq!(sample_variance(&[10.0, 12.0, 14.0]), Some(4.0));
        assert_eq!(sample_variance(&[7.5, 7.5, 7.5]), Some(0.0));
    }

    #[test]
    fn test_variance_grade_bands() {
        let bands = VarianceBands::default();
        assert_eq!(variance_grade(0.0, &bands), Grade::A);
        assert_eq!(variance_grade(39.99, &bands), Grade::A);
        assert_eq!(variance_grade(40.0, &bands), Grade::B);
        assert_eq!(variance_grade(59.99, &bands), Grade::B);
        assert_eq!(variance_grade(60.0, &bands), Grade::C);
        assert_eq!(variance_grade(90.0, &bands), Grade::D);
        assert_eq!(variance_grade(400.0, &bands), Grade::D);
    }

    #[test]
    fn test_variance_grade_never_improves_as_variance_grows() {
        let bands = VarianceBands::default();
        let mut previous = variance_grade(0.0, &bands);
        for step in 1..=200 {
            let grade = variance_grade(step as f64, &bands);
            // Grade ordering runs best to worst
            assert!(grade >= previous, "grade improved at variance {step}");
            previous = grade;
        }
    }

    #[test]
    fn test_good_games_grade_table() {
        let expected = [
            (0, Grade::D),
            (1, Grade::D),
            (2, Grade::D),
            (3, Grade::C),
            (4, Grade::D),
            (5, Grade::CPlus),
            (6, Grade::BMinus),
            (7, Grade::B),
            (8, Grade::B),
            (9, Grade::BPlus),
            (10, Grade::AMinus),
            (11, Grade::AMinus),
            (12, Grade::A),
            (13, Grade::A),
            (14, Grade::APlus),
            (17, Grade::APlus),
        ];
        for (count, grade) in expected {
            assert_eq!(good_games_grade(count), grade, "count {count}");
        }
    }

    #[test]
    fn test_count_good_games_is_strictly_above_threshold() {
        assert_eq!(count_good_games(&[10.0, 12.0, 14.0], Some(14.2)), 0);
        assert_eq!(count_good_games(&[20.0, 18.0, 22.0], Some(19.2)), 2);
        assert_eq!(count_good_games(&[19.2, 19.3], Some(19.2)), 1);
        assert_eq!(count_good_games(&[40.0, 40.0], None), 0);
    }

    #[test]
    fn test_raising_a_score_never_lowers_the_count() {
        let base = [8.0, 15.0, 13.9, 22.4, 14.2];
        let before = count_good_games(&base, Some(14.2));
        for week in 0..base.len() {
            let mut raised = base;
            raised[week] += 5.0;
            assert!(count_good_games(&raised, Some(14.2)) >= before);
        }
    }

    #[test]
    fn test_good_games_method() {
        let registry = test_registry();
        let series = series(vec![
            ("Dak Prescott", vec![20.0, 18.0, 22.0]),
            ("CeeDee Lamb", vec![10.0, 12.0, 14.0]),
            ("Brandon Aubrey", vec![15.0, 18.0]),
        ]);

        let outcome = grader(GradingMethod::GoodGames).grade(&series, &registry);

        // Two good games is not > 2, so it lands on D
        let dak = outcome.grades.get("Dak Prescott").unwrap();
        assert_eq!(dak.basis, GradeBasis::GoodGames(2));
        assert_eq!(dak.grade, Grade::D);

        assert_eq!(outcome.grades.grade_for("CeeDee Lamb"), Grade::D);

        // Kickers have no threshold and are never counted
        let aubrey = outcome.grades.get("Brandon Aubrey").unwrap();
        assert_eq!(aubrey.basis, GradeBasis::GoodGames(0));
        assert_eq!(outcome.missing_identity, 0);
    }

    #[test]
    fn test_unresolved_and_short_players_are_omitted() {
        let registry = test_registry();
        let series = series(vec![
            ("Unrostered Guy", vec![30.0, 30.0]),
            ("Nobody", vec![30.0, 30.0]),
            ("Dak Prescott", vec![25.0]),
        ]);

        let outcome = grader(GradingMethod::GoodGames).grade(&series, &registry);

        assert!(outcome.grades.is_empty());
        assert_eq!(outcome.missing_identity, 2);
        assert_eq!(outcome.insufficient_sample, 1);
        assert_eq!(outcome.grades.grade_for("Unrostered Guy"), Grade::F);
    }

    #[test]
    fn test_variance_method_ignores_identity() {
        let series = series(vec![
            ("Nobody", vec![10.0, 12.0, 14.0]),
            ("Boom Bust", vec![2.0, 30.0, 1.0, 28.0]),
            ("One Week", vec![14.0]),
        ]);

        let outcome = grader(GradingMethod::Variance).grade(&series, &PlayerRegistry::new());

        let steady = outcome.grades.get("Nobody").unwrap();
        assert_eq!(steady.grade, Grade::A);
        assert_eq!(steady.basis, GradeBasis::Variance(4.0));
        assert_eq!(outcome.grades.grade_for("Boom Bust"), Grade::D);
        assert_eq!(outcome.grades.grade_for("One Week"), Grade::F);
        assert_eq!(outcome.insufficient_sample, 1);
        assert!(outcome.grades.mean_variance().is_some());
        // Both graded names lack a player ID; the short sample is not counted
        assert_eq!(outcome.missing_identity, 2);
    }

    #[test]
    fn test_variance_method_counts_only_unknown_names() {
        let registry = test_registry();
        let series = series(vec![
            ("Dak Prescott", vec![20.0, 18.0, 22.0]),
            ("Unrostered Guy", vec![8.0, 9.0]),
            ("Nobody", vec![10.0, 12.0, 14.0]),
        ]);

        let outcome = grader(GradingMethod::Variance).grade(&series, &registry);

        // A missing roster position does not matter for variance
        assert_eq!(outcome.grades.len(), 3);
        assert_eq!(outcome.missing_identity, 1);
    }

    #[test]
    fn test_good_games_uses_configured_thresholds() {
        let mut config = MetricsConfig::default();
        config.grading.good_game_thresholds.insert("K".to_string(), 10.0);
        let grader = ConsistencyGrader::new(&config.grading);

        let series = series(vec![("Brandon Aubrey", vec![15.0, 18.0, 12.0, 8.0])]);
        let outcome = grader.grade(&series, &test_registry());

        let aubrey = outcome.grades.get("Brandon Aubrey").unwrap();
        assert_eq!(aubrey.basis, GradeBasis::GoodGames(3));
        assert_eq!(aubrey.grade, Grade::C);
    }
}
