use chrono::Utc;
use player_data::DataSnapshot;
use player_registry::PlayerRegistry;
use tracing::info;

use crate::{
    aggregator::aggregate_scores,
    config::{GradingMethod, MetricsConfig},
    error::Result,
    grader::ConsistencyGrader,
    joiner::join_metrics,
    models::{MetricsReport, RunSummary},
    share::{reconcile_team_totals, team_totals, ShareCalculator},
};

/// Runs every metrics stage over one snapshot
///
/// A run is a pure function of the snapshot and config: nothing is cached or
/// carried between runs.
#[derive(Debug, Clone)]
pub struct MetricsPipeline {
    config: MetricsConfig,
}

impl MetricsPipeline {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Copy of this pipeline that grades with `method` instead
    pub fn with_method(&self, method: GradingMethod) -> Self {
        let mut config = self.config.clone();
        config.grading.method = method;
        Self { config }
    }

    /// Aggregate, grade, compute shares and join.
    ///
    /// Only an invalid config fails the run; bad data for a single player
    /// falls back to defaults.
    pub fn run(&self, snapshot: &DataSnapshot) -> Result<MetricsReport> {
        self.config.validate()?;
        info!(
            "Starting metrics run for season {} ({} rows, method: {})",
            snapshot.season,
            snapshot.row_count(),
            self.config.grading.method
        );

        let series = aggregate_scores(&snapshot.weekly);
        let registry = PlayerRegistry::from_snapshot(snapshot);

        let grader = ConsistencyGrader::new(&self.config.grading);
        let grading = grader.grade(&series, &registry);

        let totals = team_totals(&snapshot.season_players);
        let shares = ShareCalculator::new(self.config.share.zero_total_policy)
            .calculate(&snapshot.season_players, &totals);

        let metrics = join_metrics(&shares.rows, &grading.grades, &registry);
        let reconciliation = reconcile_team_totals(&totals, &snapshot.team_stats);

        let summary = RunSummary {
            season: snapshot.season.clone(),
            method: grader.method(),
            players_series: series.player_count(),
            players_graded: grading.grades.len(),
            insufficient_sample: grading.insufficient_sample,
            missing_identity: grading.missing_identity,
            zero_total_teams: shares.zero_total_teams.into_iter().collect(),
            share_rows: metrics.len(),
            mean_variance: grading.grades.mean_variance(),
            generated_at: Utc::now(),
        };

        info!(
            "Metrics run complete: {} rows, {} graded, {} team mismatches",
            summary.share_rows,
            summary.players_graded,
            reconciliation.len()
        );

        Ok(MetricsReport { metrics, grades: grading.grades, summary, reconciliation, registry })
    }
}

impl Default for MetricsPipeline {
    fn default() -> Self {
        Self::new(MetricsConfig::default())
    }
}
