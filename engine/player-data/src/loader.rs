use crate::error::{DataError, Result};
use crate::types::{
    DataSnapshot, RosterRecord, SeasonPlayerRecord, TeamStatRecord, WeeklyStatRecord,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File locations of the input tables for one season
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotPaths {
    pub weekly: PathBuf,
    pub season_players: PathBuf,
    pub roster: PathBuf,
    /// Team stats are optional; `None` loads an empty table
    pub team_stats: Option<PathBuf>,
}

impl SnapshotPaths {
    /// Resolve the standard table names inside `dir`.
    ///
    /// Each table is looked up as `<name>.csv` first, then `<name>.json`.
    /// Required tables that exist in neither form keep their `.csv` path so
    /// the load reports which file is missing.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            weekly: resolve_table(dir, "weekly").unwrap_or_else(|| dir.join("weekly.csv")),
            season_players: resolve_table(dir, "season").unwrap_or_else(|| dir.join("season.csv")),
            roster: resolve_table(dir, "roster").unwrap_or_else(|| dir.join("roster.csv")),
            team_stats: resolve_table(dir, "team_stats"),
        }
    }
}

fn resolve_table(dir: &Path, name: &str) -> Option<PathBuf> {
    ["csv", "json"]
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
}

/// Loads the raw tables into an immutable [`DataSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    season: String,
}

impl SnapshotLoader {
    pub fn new(season: impl Into<String>) -> Self {
        Self { season: season.into() }
    }

    /// Read every table named in `paths`.
    ///
    /// Any unreadable or malformed table fails the whole load.
    pub async fn load(&self, paths: &SnapshotPaths) -> Result<DataSnapshot> {
        info!("Loading {} season snapshot", self.season);

        let weekly: Vec<WeeklyStatRecord> = read_table(&paths.weekly).await?;
        let season_players: Vec<SeasonPlayerRecord> = read_table(&paths.season_players).await?;
        let roster: Vec<RosterRecord> = read_table(&paths.roster).await?;
        let team_stats: Vec<TeamStatRecord> = match &paths.team_stats {
            Some(path) => read_table(path).await?,
            None => Vec::new(),
        };

        info!(
            "Loaded {} weekly rows, {} season rows, {} roster rows, {} team rows",
            weekly.len(),
            season_players.len(),
            roster.len(),
            team_stats.len()
        );

        Ok(DataSnapshot {
            season: self.season.clone(),
            loaded_at: Utc::now(),
            weekly,
            season_players,
            roster,
            team_stats,
        })
    }

    /// Resolve the standard table names in `dir` and load them
    pub async fn load_from_dir<P: AsRef<Path>>(&self, dir: P) -> Result<DataSnapshot> {
        let paths = SnapshotPaths::from_dir(dir);
        self.load(&paths).await
    }
}

/// Read a CSV or JSON table, choosing the parser by file extension
pub async fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let format = TableFormat::from_path(path)?;

    let content = tokio::fs::read_to_string(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::MissingTable(path.to_path_buf())
        } else {
            DataError::Io { path: path.to_path_buf(), source }
        }
    })?;

    let rows: Vec<T> = match format {
        TableFormat::Csv => parse_csv(&content)
            .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?,
        TableFormat::Json => serde_json::from_str(&content)
            .map_err(|source| DataError::Json { path: path.to_path_buf(), source })?,
    };

    debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

fn parse_csv<T: DeserializeOwned>(content: &str) -> std::result::Result<Vec<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(content.as_bytes());
    reader.deserialize::<T>().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase) {
            Some(ext) if ext == "csv" => Ok(TableFormat::Csv),
            Some(ext) if ext == "json" => Ok(TableFormat::Json),
            _ => Err(DataError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
