//! Row axes for the grid: owning organisations and recommendations.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::items::TimelineItem;
use crate::types::{OverallStatus, Recommendation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationStats {
    pub name: String,
    pub total: usize,
    pub completed: usize,
    pub completion_percent: f64,
}

impl OrganizationStats {
    /// Stats over every recommendation the organisation owns or co-owns.
    pub fn compute(name: &str, recommendations: &[Recommendation]) -> Self {
        let owned = recommendations.iter().filter(|r| r.is_owned_by(name));
        let (total, completed) = owned.fold((0, 0), |(total, completed), rec| {
            let done = rec.status() == OverallStatus::Completed;
            (total + 1, completed + usize::from(done))
        });
        let completion_percent = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            name: name.to_string(),
            total,
            completed,
            completion_percent,
        }
    }

    /// Most complete first, then most recommendations, then by name.
    fn ranking_cmp(&self, other: &Self) -> Ordering {
        other
            .completion_percent
            .total_cmp(&self.completion_percent)
            .then_with(|| other.total.cmp(&self.total))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Organisations appearing on any item's recommendation, ranked.
///
/// Membership comes from the items; the completion stats come from the full
/// `recommendations` list so an organisation's row reflects all its work.
pub fn rank_organizations(
    items: &[TimelineItem<'_>],
    recommendations: &[Recommendation],
) -> Vec<OrganizationStats> {
    let names: BTreeSet<&str> = items
        .iter()
        .flat_map(|item| item.recommendation().owners())
        .collect();

    let mut stats: Vec<OrganizationStats> = names
        .into_iter()
        .map(|name| OrganizationStats::compute(name, recommendations))
        .collect();
    stats.sort_by(OrganizationStats::ranking_cmp);
    stats
}

/// Distinct recommendations referenced by any item, ordered by code.
///
/// Codes compare as plain strings, so "R10" sorts before "R2".
pub fn recommendation_rows<'a>(items: &[TimelineItem<'a>]) -> Vec<&'a Recommendation> {
    let mut seen = HashSet::new();
    let mut rows: Vec<&'a Recommendation> = items
        .iter()
        .map(TimelineItem::recommendation)
        .filter(|rec| seen.insert(rec.id))
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.id.cmp(&b.id)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, rec, with_target, with_update};
    use crate::timeline::items::collect_timeline_items;

    fn names(stats: &[OrganizationStats]) -> Vec<&str> {
        stats.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn ranks_by_completion_then_volume() {
        let recs = vec![
            with_update(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-01", "a"),
            with_update(rec(2, "R02", "DESNZ", &[], OverallStatus::Completed), "2024-01-02", "b"),
            with_update(rec(3, "R03", "EA", &["ONR"], OverallStatus::Completed), "2024-01-03", "c"),
            with_update(rec(4, "R04", "MOD", &[], OverallStatus::Completed), "2024-01-04", "d"),
            with_update(rec(5, "R05", "MOD", &[], OverallStatus::Completed), "2024-01-05", "e"),
        ];
        let items = collect_timeline_items(&recs, date("2024-01-10"), true);
        let stats = rank_organizations(&items, &recs);

        // 100% with 2 recs, 100% with 1 (alphabetical), then ONR at 50%.
        assert_eq!(names(&stats), vec!["MOD", "DESNZ", "EA", "ONR"]);
        let onr = stats.iter().find(|s| s.name == "ONR").unwrap();
        assert_eq!(onr.total, 2);
        assert_eq!(onr.completed, 1);
        assert!((onr.completion_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ranking_ignores_input_order() {
        let mut recs = vec![
            with_update(rec(1, "R01", "ZETA", &[], OverallStatus::OnTrack), "2024-01-01", "a"),
            with_update(rec(2, "R02", "ALPHA", &[], OverallStatus::OnTrack), "2024-01-01", "b"),
            with_update(rec(3, "R03", "MID", &["ALPHA", "ZETA"], OverallStatus::Completed), "2024-01-02", "c"),
        ];
        let items = collect_timeline_items(&recs, date("2024-01-10"), false);
        let forward = names(&rank_organizations(&items, &recs))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        recs.reverse();
        let items = collect_timeline_items(&recs, date("2024-01-10"), false);
        let backward = names(&rank_organizations(&items, &recs))
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        assert_eq!(forward, backward);
        assert_eq!(forward, vec!["MID", "ALPHA", "ZETA"]);
    }

    #[test]
    fn recommendation_rows_sort_lexicographically() {
        let recs = vec![
            with_update(rec(2, "R2", "ONR", &[], OverallStatus::OnTrack), "2024-01-01", "a"),
            with_update(rec(10, "R10", "ONR", &[], OverallStatus::OnTrack), "2024-01-01", "b"),
            with_target(rec(1, "R1", "ONR", &[], OverallStatus::OnTrack), "2024-02-01", None),
            rec(3, "R3", "ONR", &[], OverallStatus::Completed),
        ];
        let items = collect_timeline_items(&recs, date("2024-01-10"), true);
        let codes: Vec<&str> = recommendation_rows(&items)
            .iter()
            .map(|r| r.code.as_str())
            .collect();
        // R3 has no items and is left out entirely.
        assert_eq!(codes, vec!["R1", "R10", "R2"]);
    }

    #[test]
    fn recommendation_rows_are_distinct() {
        let recs = vec![with_target(
            with_update(
                with_update(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-01", "a"),
                "2024-01-08",
                "b",
            ),
            "2024-03-01",
            None,
        )];
        let items = collect_timeline_items(&recs, date("2024-01-10"), true);
        assert_eq!(items.len(), 3);
        assert_eq!(recommendation_rows(&items).len(), 1);
    }
}
