use crate::models::PlayerScoreSeries;
use player_data::WeeklyStatRecord;
use tracing::info;

/// Group weekly PPR scores by player name.
///
/// Rows are taken as-is: repeated weeks for a player are kept as separate
/// entries and the input order becomes the week order.
pub fn aggregate_scores(weekly: &[WeeklyStatRecord]) -> PlayerScoreSeries {
    let mut series = PlayerScoreSeries::new();
    for record in weekly {
        series.push(&record.player_name, record.fantasy_points_ppr);
    }

    info!("Aggregated {} weekly rows into {} player series", weekly.len(), series.player_count());
    series
}
