//! Month and year header groups over the week lattice.

use chrono::Datelike;
use serde::Serialize;

use super::weeks::WeekInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGroup {
    /// Full month name, no year ("January").
    pub month_label: String,
    /// "2024-01"
    pub month_key: String,
    pub year: i32,
    pub week_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearGroup {
    pub year: i32,
    pub month_indices: Vec<usize>,
}

/// Split weeks into runs sharing the (year, month) of their Monday.
pub fn group_months(weeks: &[WeekInfo]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for (index, week) in weeks.iter().enumerate() {
        let start = week.week_start;
        let month_key = start.format("%Y-%m").to_string();

        if let Some(current) = groups.last_mut().filter(|g| g.month_key == month_key) {
            current.week_indices.push(index);
            continue;
        }
        groups.push(MonthGroup {
            month_label: start.format("%B").to_string(),
            month_key,
            year: start.year(),
            week_indices: vec![index],
        });
    }
    groups
}

/// Split month groups into runs sharing a year.
pub fn group_years(months: &[MonthGroup]) -> Vec<YearGroup> {
    let mut groups: Vec<YearGroup> = Vec::new();

    for (index, month) in months.iter().enumerate() {
        if let Some(current) = groups.last_mut().filter(|g| g.year == month.year) {
            current.month_indices.push(index);
            continue;
        }
        groups.push(YearGroup {
            year: month.year,
            month_indices: vec![index],
        });
    }
    groups
}
