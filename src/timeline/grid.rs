//! Sparse cell population for both row axes.
//!
//! Items are bucketed by week index once up front, so the cost is
//! O(items × owners) rather than O(rows × weeks × items).

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::items::TimelineItem;
use super::weeks::{week_index, WeekInfo};
use crate::types::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell<'a> {
    /// Date ascending; never empty.
    pub items: Vec<TimelineItem<'a>>,
    /// Organisation name or recommendation id.
    pub row_key: String,
    pub week_key: String,
}

/// Key for a cell in either axis map.
pub fn cell_key(row_key: &str, week_key: &str) -> String {
    format!("{}-{}", row_key, week_key)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulatedCells<'a> {
    pub organization_cells: BTreeMap<String, GridCell<'a>>,
    pub recommendation_cells: BTreeMap<String, GridCell<'a>>,
    /// Week keys with at least one item under either axis.
    pub weeks_with_items: BTreeSet<String>,
}

pub fn populate_cells<'a>(
    weeks: &[WeekInfo],
    organizations: &[String],
    recommendations: &[&'a Recommendation],
    items: &[TimelineItem<'a>],
) -> PopulatedCells<'a> {
    let organization_rows: HashSet<&str> = organizations.iter().map(String::as_str).collect();
    let recommendation_rows: HashSet<u32> = recommendations.iter().map(|r| r.id).collect();

    let mut ordered: Vec<&TimelineItem<'a>> = items.iter().collect();
    ordered.sort_by(|a, b| a.chronological_cmp(b));

    let mut cells = PopulatedCells::default();

    for item in ordered {
        let Some(index) = week_index(weeks, item.date()) else {
            log::warn!(
                "{} item dated {} falls outside the week lattice",
                item.recommendation().code,
                item.date()
            );
            continue;
        };
        let week_key = &weeks[index].week_key;
        let rec = item.recommendation();

        // A co-owner list may repeat the primary owner; count each row once.
        let mut placed = HashSet::new();
        for owner in rec.owners() {
            if organization_rows.contains(owner) && placed.insert(owner) {
                push_item(&mut cells.organization_cells, owner, week_key, item);
                cells.weeks_with_items.insert(week_key.clone());
            }
        }

        if recommendation_rows.contains(&rec.id) {
            push_item(&mut cells.recommendation_cells, &rec.id.to_string(), week_key, item);
            cells.weeks_with_items.insert(week_key.clone());
        }
    }

    cells
}

fn push_item<'a>(
    cells: &mut BTreeMap<String, GridCell<'a>>,
    row_key: &str,
    week_key: &str,
    item: &TimelineItem<'a>,
) {
    cells
        .entry(cell_key(row_key, week_key))
        .or_insert_with(|| GridCell {
            items: Vec::new(),
            row_key: row_key.to_string(),
            week_key: week_key.to_string(),
        })
        .items
        .push(item.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, rec, with_target, with_update};
    use crate::timeline::items::collect_timeline_items;
    use crate::timeline::rows::recommendation_rows;
    use crate::timeline::weeks::weeks_between;
    use crate::types::OverallStatus;

    #[test]
    fn co_owned_items_land_in_every_owner_row() {
        let recs = vec![with_update(
            rec(3, "R03", "ONR", &["DESNZ"], OverallStatus::OffTrack),
            "2024-01-10",
            "joint",
        )];
        let items = collect_timeline_items(&recs, date("2024-01-10"), false);
        let weeks = weeks_between(date("2024-01-01"), date("2024-01-31"));
        let orgs = vec!["ONR".to_string(), "DESNZ".to_string()];
        let rows = recommendation_rows(&items);

        let cells = populate_cells(&weeks, &orgs, &rows, &items);
        assert!(cells.organization_cells.contains_key("ONR-2024-01-08"));
        assert!(cells.organization_cells.contains_key("DESNZ-2024-01-08"));
        assert_eq!(cells.recommendation_cells["3-2024-01-08"].row_key, "3");
        assert_eq!(
            cells.weeks_with_items.iter().collect::<Vec<_>>(),
            vec!["2024-01-08"]
        );
    }

    #[test]
    fn duplicate_owner_is_counted_once() {
        let recs = vec![with_update(
            rec(1, "R01", "ONR", &["ONR"], OverallStatus::OnTrack),
            "2024-01-10",
            "once",
        )];
        let items = collect_timeline_items(&recs, date("2024-01-10"), false);
        let weeks = weeks_between(date("2024-01-08"), date("2024-01-08"));
        let cells = populate_cells(&weeks, &["ONR".to_string()], &recommendation_rows(&items), &items);
        assert_eq!(cells.organization_cells["ONR-2024-01-08"].items.len(), 1);
    }

    #[test]
    fn cell_items_are_date_ascending() {
        let recs = vec![with_target(
            with_update(
                with_update(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-14", "sun"),
                "2024-01-08",
                "mon",
            ),
            "2024-01-10",
            None,
        )];
        let mut items = collect_timeline_items(&recs, date("2024-01-01"), true);
        items.reverse();
        let weeks = weeks_between(date("2024-01-08"), date("2024-01-14"));
        let cells = populate_cells(&weeks, &["ONR".to_string()], &recommendation_rows(&items), &items);

        let dates: Vec<_> = cells.organization_cells["ONR-2024-01-08"]
            .items
            .iter()
            .map(TimelineItem::date)
            .collect();
        assert_eq!(dates, vec![date("2024-01-08"), date("2024-01-10"), date("2024-01-14")]);
    }

    #[test]
    fn rows_outside_the_axis_get_no_cells() {
        let recs = vec![
            with_update(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-10", "a"),
            with_update(rec(2, "R02", "EA", &[], OverallStatus::OnTrack), "2024-01-17", "b"),
        ];
        let items = collect_timeline_items(&recs, date("2024-01-10"), false);
        let weeks = weeks_between(date("2024-01-01"), date("2024-01-31"));
        let only_r1: Vec<&Recommendation> = vec![&recs[0]];

        let cells = populate_cells(&weeks, &["ONR".to_string()], &only_r1, &items);
        assert_eq!(cells.organization_cells.len(), 1);
        assert_eq!(cells.recommendation_cells.len(), 1);
        assert_eq!(cells.weeks_with_items.len(), 1);
    }

    #[test]
    fn cell_key_joins_row_and_week() {
        assert_eq!(cell_key("HM Treasury", "2024-01-08"), "HM Treasury-2024-01-08");
        assert_eq!(cell_key("12", "2024-01-08"), "12-2024-01-08");
    }
}
