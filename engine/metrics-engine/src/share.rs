//! Team share calculation
//!
//! Each player's receiving touchdowns and yards are compared with the passing
//! totals summed over every player on the same team, then blended with
//! target share into the `rec_dom` and `rec_share` composites.

use crate::config::ZeroTotalPolicy;
use crate::models::{ShareMetrics, TeamTotalMismatch, TeamTotals};
use player_data::{SeasonPlayerRecord, TeamStatRecord};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Share rows plus the teams whose totals could not be divided by
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShareOutcome {
    /// Sorted by `rec_share`, highest first
    pub rows: Vec<ShareMetrics>,
    pub zero_total_teams: BTreeSet<String>,
}

/// Sum passing touchdowns and yards per `recent_team`
pub fn team_totals(records: &[SeasonPlayerRecord]) -> TeamTotals {
    let mut totals = TeamTotals::new();
    for record in records {
        totals.add(&record.recent_team, record.passing_tds, record.passing_yards);
    }
    totals
}

/// Computes per-player receiving shares of team passing production
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareCalculator {
    policy: ZeroTotalPolicy,
}

impl ShareCalculator {
    pub fn new(policy: ZeroTotalPolicy) -> Self {
        Self { policy }
    }

    /// Build the ranked share table from a read-only pass over `records`
    pub fn calculate(&self, records: &[SeasonPlayerRecord], totals: &TeamTotals) -> ShareOutcome {
        let mut outcome = ShareOutcome::default();

        for record in records {
            let team = totals.get(&record.recent_team);

            if team.passing_tds == 0 || team.passing_yards == 0 {
                if outcome.zero_total_teams.insert(record.recent_team.clone()) {
                    warn!(
                        "Team {} has zero passing totals (tds: {}, yards: {}); applying {:?}",
                        record.recent_team, team.passing_tds, team.passing_yards, self.policy
                    );
                }
                // A single zero component still leaves the other share usable
                let nothing_to_divide = team.passing_tds == 0 && team.passing_yards == 0;
                if nothing_to_divide && self.policy == ZeroTotalPolicy::SkipPlayer {
                    continue;
                }
            }

            let percent_rec_tds = ratio(record.receiving_tds, team.passing_tds);
            let percent_rec_yards = ratio(record.receiving_yards, team.passing_yards);
            let target_share = record.target_share;
            let rec_share = receiving_share(percent_rec_yards, percent_rec_tds, target_share);

            outcome.rows.push(ShareMetrics {
                player_id: record.player_id.clone(),
                player_name: record.player_name.clone(),
                recent_team: record.recent_team.clone(),
                percent_rec_tds,
                percent_rec_yards,
                target_share,
                rec_dom: receiving_dominance(percent_rec_yards, percent_rec_tds, target_share),
                rec_share,
                rec_share_pct: format_percent(rec_share),
            });
        }

        rank_by_rec_share(&mut outcome.rows);

        info!(
            "Computed receiving shares for {} players across {} teams",
            outcome.rows.len(),
            totals.team_count()
        );
        outcome
    }
}

/// Part over whole, with a zero whole giving a zero share
fn ratio(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Equal-weight average of yards share, TD share and target share
pub fn receiving_dominance(percent_rec_yards: f64, percent_rec_tds: f64, target_share: f64) -> f64 {
    (percent_rec_yards + percent_rec_tds + target_share) / 3.0
}

/// Weighted blend counting the TD share twice as heavily as yards or targets
pub fn receiving_share(percent_rec_yards: f64, percent_rec_tds: f64, target_share: f64) -> f64 {
    0.25 * percent_rec_yards + 0.5 * percent_rec_tds + 0.25 * target_share
}

/// Format a fraction as a whole percentage, e.g. 0.42 -> "42%"
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Stable sort by `rec_share`, highest first
pub fn rank_by_rec_share(rows: &mut [ShareMetrics]) {
    rows.sort_by(|a, b| b.rec_share.total_cmp(&a.rec_share));
}

/// Compare derived team totals against a reported team table
pub fn reconcile_team_totals(
    derived: &TeamTotals,
    reported: &[TeamStatRecord],
) -> Vec<TeamTotalMismatch> {
    let mut mismatches: Vec<TeamTotalMismatch> = reported
        .iter()
        .filter_map(|team| {
            let totals = derived.get(&team.team);
            let tds_match = totals.passing_tds == team.passing_tds;
            if tds_match && totals.passing_yards == team.passing_yards {
                return None;
            }
            warn!(
                "Team {} totals disagree: derived {} tds / {} yds, reported {} tds / {} yds",
                team.team,
                totals.passing_tds,
                totals.passing_yards,
                team.passing_tds,
                team.passing_yards
            );
            Some(TeamTotalMismatch {
                team: team.team.clone(),
                derived_tds: totals.passing_tds,
                reported_tds: team.passing_tds,
                derived_yards: totals.passing_yards,
                reported_yards: team.passing_yards,
            })
        })
        .collect();

    mismatches.sort_by(|a, b| a.team.cmp(&b.team));
    mismatches
}
