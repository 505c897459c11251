//! Date helpers shared by the collector, queries and exporters.
//!
//! Everything takes `today` explicitly so results are reproducible; callers
//! at the edge pass `chrono::Local::now().date_naive()`.

use chrono::NaiveDate;

use crate::error::TrackerError;

const IMMINENT_DAYS: i64 = 30;
const UPCOMING_DAYS: i64 = 90;

/// Urgency bucket for a deadline relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineStatus {
    Overdue,
    Imminent,
    Upcoming,
    Distant,
}

impl DeadlineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Imminent => "imminent",
            Self::Upcoming => "upcoming",
            Self::Distant => "distant",
        }
    }
}

/// Signed whole days from `today` to `date` (negative once passed).
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    date.signed_duration_since(today).num_days()
}

pub fn is_overdue(date: NaiveDate, today: NaiveDate) -> bool {
    days_until(date, today) < 0
}

pub fn deadline_status(date: NaiveDate, today: NaiveDate) -> DeadlineStatus {
    let days = days_until(date, today);
    if days < 0 {
        DeadlineStatus::Overdue
    } else if days <= IMMINENT_DAYS {
        DeadlineStatus::Imminent
    } else if days <= UPCOMING_DAYS {
        DeadlineStatus::Upcoming
    } else {
        DeadlineStatus::Distant
    }
}

/// "1 Jan 2025"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// "1 Jan"
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Parse a `YYYY-MM-DD` value supplied from outside the dataset.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TrackerError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
