use crate::models::{Grade, JoinedMetrics, JoinedRow, PlayerGrades, ShareMetrics};
use player_registry::PlayerRegistry;
use std::collections::HashMap;
use tracing::{debug, info};

/// Left-outer join of share rows with consistency grades on player ID.
///
/// Grades are keyed by name and moved onto IDs through the registry. Every
/// share row appears once in the output, in its original order; rows with
/// no grade get F.
pub fn join_metrics(
    shares: &[ShareMetrics],
    grades: &PlayerGrades,
    registry: &PlayerRegistry,
) -> JoinedMetrics {
    let mut grades_by_id: HashMap<&str, Grade> = HashMap::with_capacity(grades.len());
    for (name, graded) in grades.iter() {
        match registry.id_for_name(name) {
            Some(player_id) => {
                grades_by_id.insert(player_id, graded.grade);
            }
            None => debug!("Grade for {} has no player ID to join on", name),
        }
    }

    let rows: Vec<JoinedRow> = shares
        .iter()
        .map(|share| JoinedRow {
            player_id: share.player_id.clone(),
            player_name: share.player_name.clone(),
            recent_team: share.recent_team.clone(),
            percent_rec_tds: share.percent_rec_tds,
            percent_rec_yards: share.percent_rec_yards,
            rec_dom: share.rec_dom,
            rec_share: share.rec_share,
            rec_share_pct: share.rec_share_pct.clone(),
            consistency_grade: grades_by_id
                .get(share.player_id.as_str())
                .copied()
                .unwrap_or_default(),
        })
        .collect();

    info!(
        "Joined {} share rows with {} grades",
        rows.len(),
        rows.iter().filter(|row| row.consistency_grade != Grade::F).count()
    );
    JoinedMetrics::new(rows)
}
