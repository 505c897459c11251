//! Event collection: recommendations → flat list of dated timeline items.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::days_until;
use crate::types::{Recommendation, Update};

/// Deadline payload carried by a `TimelineItem::Deadline`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInfo {
    pub target_date: Option<NaiveDate>,
    pub revised_date: Option<NaiveDate>,
    pub days_until: i64,
    pub is_overdue: bool,
}

impl DeadlineInfo {
    /// Only a revision that moves the date is shown as revised.
    pub fn is_revised(&self) -> bool {
        match (self.revised_date, self.target_date) {
            (Some(revised), Some(target)) => revised != target,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// A single dated event attached to a recommendation.
///
/// `date` is always the date used for week bucketing: the update date, or
/// the effective (revised-else-original) target date for a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem<'a> {
    Update {
        date: NaiveDate,
        recommendation: &'a Recommendation,
        update: &'a Update,
    },
    Deadline {
        date: NaiveDate,
        recommendation: &'a Recommendation,
        deadline: DeadlineInfo,
    },
}

impl<'a> TimelineItem<'a> {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Update { date, .. } | Self::Deadline { date, .. } => *date,
        }
    }

    pub fn recommendation(&self) -> &'a Recommendation {
        match self {
            Self::Update { recommendation, .. } | Self::Deadline { recommendation, .. } => {
                recommendation
            }
        }
    }

    pub fn is_deadline(&self) -> bool {
        matches!(self, Self::Deadline { .. })
    }

    /// Total order used everywhere items are listed: date, then
    /// recommendation id, then updates before the deadline, then title.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.date()
            .cmp(&other.date())
            .then_with(|| self.recommendation().id.cmp(&other.recommendation().id))
            .then_with(|| self.is_deadline().cmp(&other.is_deadline()))
            .then_with(|| self.title().cmp(other.title()))
    }

    fn title(&self) -> &str {
        match self {
            Self::Update { update, .. } => &update.title,
            Self::Deadline { .. } => "",
        }
    }
}

/// Flatten recommendations into timeline items, oldest first.
///
/// Every update yields one item. When `include_deadlines` is set, each
/// non-terminal recommendation with an effective target date yields one
/// deadline item as well.
pub fn collect_timeline_items(
    recommendations: &[Recommendation],
    today: NaiveDate,
    include_deadlines: bool,
) -> Vec<TimelineItem<'_>> {
    let mut items = Vec::new();

    for rec in recommendations {
        for update in &rec.updates {
            items.push(TimelineItem::Update {
                date: update.date,
                recommendation: rec,
                update,
            });
        }
    }

    if include_deadlines {
        for rec in recommendations {
            if rec.status().is_terminal() {
                continue;
            }
            let Some(effective) = rec.effective_target_date() else {
                log::debug!("{} has no target date; no deadline item", rec.code);
                continue;
            };
            let days = days_until(effective, today);
            items.push(TimelineItem::Deadline {
                date: effective,
                recommendation: rec,
                deadline: DeadlineInfo {
                    target_date: rec.delivery_timeline.target_date,
                    revised_date: rec.delivery_timeline.revised_target_date,
                    days_until: days,
                    is_overdue: days < 0,
                },
            });
        }
    }

    items.sort_by(|a, b| a.chronological_cmp(b));
    items
}
