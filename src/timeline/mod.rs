//! Timeline grid: dated events laid out as organisation/recommendation rows
//! against calendar-week columns, with month and year header groups.
//!
//! Pipeline (one pass, nothing mutated after it is produced):
//! items → week lattice + row axes → sparse cells → month/year groups.

pub mod grid;
pub mod groups;
pub mod items;
pub mod rows;
pub mod weeks;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Recommendation;

pub use grid::{cell_key, GridCell};
pub use groups::{MonthGroup, YearGroup};
pub use items::{collect_timeline_items, DeadlineInfo, TimelineItem};
pub use rows::OrganizationStats;
pub use weeks::{WeekInfo, MAX_WEEKS_RANGE};

pub const DEFAULT_WEEKS_AHEAD: u32 = 52;
pub const DEFAULT_WEEKS_BACK: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub weeks_ahead: u32,
    pub weeks_back: u32,
    pub today: NaiveDate,
}

impl GridOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            weeks_ahead: DEFAULT_WEEKS_AHEAD,
            weeks_back: DEFAULT_WEEKS_BACK,
            today,
        }
    }
}

/// The two alternative row groupings the renderer can toggle between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAxis {
    Organization,
    Recommendation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineGrid<'a> {
    pub weeks: Vec<WeekInfo>,
    /// Organisation row keys, ranked.
    pub organizations: Vec<String>,
    pub organization_stats: Vec<OrganizationStats>,
    /// Keyed by `cell_key(organization, week_key)`.
    pub organization_cells: BTreeMap<String, GridCell<'a>>,
    /// Recommendation rows, ordered by code.
    pub recommendations: Vec<&'a Recommendation>,
    /// Keyed by `cell_key(recommendation id, week_key)`.
    pub recommendation_cells: BTreeMap<String, GridCell<'a>>,
    /// Rendering hint only; never a filter.
    pub weeks_with_items: BTreeSet<String>,
    pub month_groups: Vec<MonthGroup>,
    pub year_groups: Vec<YearGroup>,
}

impl<'a> TimelineGrid<'a> {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn row_keys(&self, axis: GridAxis) -> Vec<String> {
        match axis {
            GridAxis::Organization => self.organizations.clone(),
            GridAxis::Recommendation => self
                .recommendations
                .iter()
                .map(|r| r.id.to_string())
                .collect(),
        }
    }

    pub fn cell(&self, axis: GridAxis, row_key: &str, week_key: &str) -> Option<&GridCell<'a>> {
        let key = cell_key(row_key, week_key);
        match axis {
            GridAxis::Organization => self.organization_cells.get(&key),
            GridAxis::Recommendation => self.recommendation_cells.get(&key),
        }
    }
}

/// Build the grid for every update and open deadline in `recommendations`.
pub fn build_timeline_grid<'a>(
    recommendations: &'a [Recommendation],
    options: &GridOptions,
) -> TimelineGrid<'a> {
    let items = collect_timeline_items(recommendations, options.today, true);
    build_grid_from_items(&items, recommendations, options)
}

/// Build the grid from an already-collected item list.
///
/// `recommendations` is the full set used for organisation completion stats;
/// rows themselves come only from `items`.
pub fn build_grid_from_items<'a>(
    items: &[TimelineItem<'a>],
    recommendations: &[Recommendation],
    options: &GridOptions,
) -> TimelineGrid<'a> {
    if items.is_empty() {
        log::debug!("No timeline items; returning empty grid");
        return TimelineGrid::default();
    }

    let weeks = weeks::build_week_lattice(items, options.weeks_back, options.weeks_ahead, options.today);

    let organization_stats = rows::rank_organizations(items, recommendations);
    let organizations: Vec<String> = organization_stats.iter().map(|s| s.name.clone()).collect();
    let recommendation_rows = rows::recommendation_rows(items);

    let cells = grid::populate_cells(&weeks, &organizations, &recommendation_rows, items);

    let month_groups = groups::group_months(&weeks);
    let year_groups = groups::group_years(&month_groups);

    log::debug!(
        "Built timeline grid: {} items, {} weeks, {} organizations, {} recommendations, {} active weeks",
        items.len(),
        weeks.len(),
        organizations.len(),
        recommendation_rows.len(),
        cells.weeks_with_items.len()
    );

    TimelineGrid {
        weeks,
        organizations,
        organization_stats,
        organization_cells: cells.organization_cells,
        recommendations: recommendation_rows,
        recommendation_cells: cells.recommendation_cells,
        weeks_with_items: cells.weeks_with_items,
        month_groups,
        year_groups,
    }
}
