//! Week lattice: the contiguous run of Monday-start weeks a grid spans.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::items::TimelineItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekInfo {
    /// Monday.
    pub week_start: NaiveDate,
    /// Sunday; the whole day is inside the week.
    pub week_end: NaiveDate,
    pub week_label: String,
    /// ISO date of `week_start`.
    pub week_key: String,
}

impl WeekInfo {
    pub fn starting(monday: NaiveDate) -> Self {
        let week_end = monday + Duration::days(6);
        Self {
            week_start: monday,
            week_end,
            week_label: format_week_label(monday, week_end),
            week_key: week_key(monday),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.week_start <= date && date <= self.week_end
    }
}

/// Longest look-back or look-ahead, in weeks, a lattice is built with.
pub const MAX_WEEKS_RANGE: u32 = 520;

/// Monday on or before `date`. Sunday maps back six days, not forward one.
///
/// At the very start of the calendar, where that Monday is unrepresentable,
/// the first representable Monday is returned instead.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Duration::days(date.weekday().num_days_from_monday() as i64);
    date.checked_sub_signed(back)
        .or_else(|| date.checked_add_signed(Duration::days(7) - back))
        .unwrap_or(date)
}

pub fn week_key(date: NaiveDate) -> String {
    week_start(date).format("%Y-%m-%d").to_string()
}

/// "6-12 Jan 2025", or "30 Dec - 5 Jan 2024" across a month boundary.
pub fn format_week_label(start: NaiveDate, end: NaiveDate) -> String {
    if start.month() == end.month() {
        format!(
            "{}-{} {} {}",
            start.day(),
            end.day(),
            start.format("%b"),
            start.year()
        )
    } else {
        format!(
            "{} {} - {} {} {}",
            start.day(),
            start.format("%b"),
            end.day(),
            end.format("%b"),
            start.year()
        )
    }
}

/// Weeks from `min(date) - weeks_back` to `max(max(date), today) + weeks_ahead`,
/// both ends snapped to their Monday. Empty input gives no weeks.
///
/// `weeks_back` and `weeks_ahead` are capped at [`MAX_WEEKS_RANGE`].
pub fn build_week_lattice(
    items: &[TimelineItem<'_>],
    weeks_back: u32,
    weeks_ahead: u32,
    today: NaiveDate,
) -> Vec<WeekInfo> {
    let Some(min_date) = items.iter().map(TimelineItem::date).min() else {
        return Vec::new();
    };
    let max_date = items
        .iter()
        .map(TimelineItem::date)
        .max()
        .unwrap_or(min_date);

    if weeks_back > MAX_WEEKS_RANGE || weeks_ahead > MAX_WEEKS_RANGE {
        log::warn!(
            "Week range {} back / {} ahead capped at {}",
            weeks_back,
            weeks_ahead,
            MAX_WEEKS_RANGE
        );
    }
    let weeks_back = weeks_back.min(MAX_WEEKS_RANGE);
    let weeks_ahead = weeks_ahead.min(MAX_WEEKS_RANGE);

    let start = min_date
        .checked_sub_signed(Duration::weeks(weeks_back as i64))
        .unwrap_or(NaiveDate::MIN);
    let end = max_date
        .max(today)
        .checked_add_signed(Duration::weeks(weeks_ahead as i64))
        .unwrap_or(NaiveDate::MAX);

    weeks_between(start, end)
}

/// One `WeekInfo` per week from the week containing `start` through the week
/// containing `end`, inclusive.
pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> Vec<WeekInfo> {
    let last = week_start(end);
    let mut current = week_start(start);
    let mut weeks = Vec::new();

    while current <= last {
        weeks.push(WeekInfo::starting(current));
        match current.checked_add_signed(Duration::weeks(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    weeks
}

/// Index of the week containing `date`, if it falls inside the lattice.
pub fn week_index(weeks: &[WeekInfo], date: NaiveDate) -> Option<usize> {
    let first = weeks.first()?;
    let offset = date.signed_duration_since(first.week_start).num_days();
    if offset < 0 {
        return None;
    }
    let index = (offset / 7) as usize;
    (index < weeks.len()).then_some(index)
}
