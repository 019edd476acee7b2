//! # Command Line Interface
//!
//! Loads a season snapshot, runs the metrics pipeline and prints the results.

use crate::config::{GradingMethod, MetricsConfig};
use crate::models::{self, MetricsReport};
use crate::pipeline::MetricsPipeline;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use player_data::{DataSnapshot, SnapshotLoader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fantasy player metrics CLI
#[derive(Parser, Debug)]
#[command(name = "metrics-cli")]
#[command(about = "Consistency grades and receiving share metrics for NFL players")]
pub struct Cli {
    /// Directory holding weekly, season, roster and team_stats tables
    #[arg(short, long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// TOML config file; defaults plus METRICS_* env vars when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Season label recorded on the snapshot
    #[arg(long, default_value = "2023")]
    pub season: String,

    /// Log output format (json, pretty, compact)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline and write the joined JSON payload
    Run {
        /// Grading method (variance or good-games)
        #[arg(long)]
        method: Option<GradingMethod>,
        /// Only emit the top N players by receiving share
        #[arg(long)]
        top: Option<usize>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print each graded player's consistency grade
    Grades {
        #[arg(long)]
        method: Option<GradingMethod>,
    },
    /// Print the joined metrics for one player
    Player {
        /// Player name as it appears in the season table
        name: String,
    },
    /// Print the run summary
    Summary {
        #[arg(long)]
        method: Option<GradingMethod>,
    },
}

/// Resolve the effective config for a CLI invocation
pub fn load_config(path: Option<&Path>) -> Result<MetricsConfig> {
    let config = match path {
        Some(path) => {
            let mut config = MetricsConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env()?;
            config
        }
        None => MetricsConfig::from_env()?,
    };
    Ok(config)
}

/// CLI handler
pub struct CliHandler {
    pipeline: MetricsPipeline,
    snapshot: DataSnapshot,
}

impl CliHandler {
    /// Load the snapshot named by the CLI arguments
    pub async fn new(cli: &Cli, config: MetricsConfig) -> Result<Self> {
        let snapshot = SnapshotLoader::new(cli.season.clone())
            .load_from_dir(&cli.data_dir)
            .await
            .with_context(|| format!("Failed to load snapshot from {}", cli.data_dir.display()))?;

        Ok(Self { pipeline: MetricsPipeline::new(config), snapshot })
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run { method, top, output } => {
                self.run(method, top, output.as_deref()).await?;
            }
            Commands::Grades { method } => {
                self.show_grades(method)?;
            }
            Commands::Player { name } => {
                self.show_player(&name)?;
            }
            Commands::Summary { method } => {
                self.show_summary(method)?;
            }
        }
        Ok(())
    }

    fn report(&self, method: Option<GradingMethod>) -> Result<MetricsReport> {
        let pipeline = match method {
            Some(method) => self.pipeline.with_method(method),
            None => self.pipeline.clone(),
        };
        Ok(pipeline.run(&self.snapshot)?)
    }

    async fn run(
        &self,
        method: Option<GradingMethod>,
        top: Option<usize>,
        output: Option<&Path>,
    ) -> Result<()> {
        let report = self.report(method)?;
        let metrics = match top.or(self.pipeline.config().share.top_n) {
            Some(limit) => report.metrics.top(limit),
            None => report.metrics,
        };

        let json = self.to_json(&metrics)?;
        match output {
            Some(path) => {
                tokio::fs::write(path, json)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote {} players to {}", metrics.len(), path.display());
            }
            None => println!("{json}"),
        }
        Ok(())
    }

    fn show_grades(&self, method: Option<GradingMethod>) -> Result<()> {
        let report = self.report(method)?;
        if report.grades.is_empty() {
            println!("No players graded");
            return Ok(());
        }
        for (name, graded) in report.grades.iter() {
            println!("{name}\t{}", graded.grade);
        }
        Ok(())
    }

    fn show_player(&self, name: &str) -> Result<()> {
        let report = self.report(None)?;
        match report.player(name) {
            Ok(row) => println!("{}", self.to_json(row)?),
            Err(err) => {
                let candidates = report.registry.search_players(name);
                if candidates.is_empty() {
                    return Err(err.into());
                }
                println!("{err}. Did you mean:");
                for (candidate, player_id) in candidates {
                    println!("  {candidate} ({player_id})");
                }
            }
        }
        Ok(())
    }

    fn show_summary(&self, method: Option<GradingMethod>) -> Result<()> {
        let report = self.report(method)?;
        println!("{}", self.to_json(&report.summary)?);
        if !report.reconciliation.is_empty() {
            println!("{}", self.to_json(&report.reconciliation)?);
        }
        Ok(())
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(models::to_json(value, self.pipeline.config().output.pretty)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "metrics-cli",
            "--data-dir",
            "/tmp/season",
            "run",
            "--method",
            "variance",
            "--top",
            "50",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, PathBuf::from("/tmp/season"));
        match cli.command {
            Commands::Run { method, top, output } => {
                assert_eq!(method, Some(GradingMethod::Variance));
                assert_eq!(top, Some(50));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_player_command() {
        let cli = Cli::try_parse_from(["metrics-cli", "player", "Travis Kelce"]).unwrap();
        assert!(matches!(cli.command, Commands::Player { ref name } if name == "Travis Kelce"));
        assert_eq!(cli.season, "2023");
    }

    #[test]
    fn test_rejects_unknown_method() {
        assert!(Cli::try_parse_from(["metrics-cli", "grades", "--method", "median"]).is_err());
    }
}
