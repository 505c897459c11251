//! Read-only dashboard queries over the loaded dataset.
//!
//! All functions borrow from `TaskforceData`; nothing here allocates copies of
//! recommendations.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::days_until;
use crate::types::{
    Chapter, KeyPerson, OverallStatus, Recommendation, TaskforceData, Update,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub not_started: usize,
    pub on_track: usize,
    pub off_track: usize,
    pub completed: usize,
    pub abandoned: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn tally<'a>(recommendations: impl IntoIterator<Item = &'a Recommendation>) -> Self {
        let mut counts = Self::default();
        for rec in recommendations {
            counts.total += 1;
            match rec.status() {
                OverallStatus::NotStarted => counts.not_started += 1,
                OverallStatus::OnTrack => counts.on_track += 1,
                OverallStatus::OffTrack => counts.off_track += 1,
                OverallStatus::Completed => counts.completed += 1,
                OverallStatus::Abandoned => counts.abandoned += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: OverallStatus) -> usize {
        match status {
            OverallStatus::NotStarted => self.not_started,
            OverallStatus::OnTrack => self.on_track,
            OverallStatus::OffTrack => self.off_track,
            OverallStatus::Completed => self.completed,
            OverallStatus::Abandoned => self.abandoned,
        }
    }

    /// Completed share, rounded to a whole percent.
    pub fn progress_percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingDeadline<'a> {
    pub recommendation: &'a Recommendation,
    pub date: NaiveDate,
    pub days_until: i64,
    pub is_overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentUpdate<'a> {
    pub update: &'a Update,
    pub recommendation: &'a Recommendation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerWithStats<'a> {
    pub owner: String,
    pub recommendations: Vec<&'a Recommendation>,
    pub status_counts: StatusCounts,
    pub progress_percentage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_people: Option<&'a [KeyPerson]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterWithRecommendations<'a> {
    pub id: u32,
    pub title: String,
    pub recommendations: Vec<&'a Recommendation>,
}

/// Export/listing filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationFilter {
    pub status: Option<OverallStatus>,
    pub chapter: Option<u32>,
    pub owner: Option<String>,
    pub tag: Option<String>,
}

// =============================================================================
// Single lookups
// =============================================================================

pub fn recommendation_by_id(data: &TaskforceData, id: u32) -> Option<&Recommendation> {
    data.recommendations.iter().find(|r| r.id == id)
}

pub fn recommendation_by_code<'a>(data: &'a TaskforceData, code: &str) -> Option<&'a Recommendation> {
    data.recommendations.iter().find(|r| r.code == code)
}

/// Updates are addressed by (recommendation id, update date).
pub fn update_by_date(
    data: &TaskforceData,
    recommendation_id: u32,
    date: NaiveDate,
) -> Option<RecentUpdate<'_>> {
    let recommendation = recommendation_by_id(data, recommendation_id)?;
    let update = recommendation.updates.iter().find(|u| u.date == date)?;
    Some(RecentUpdate {
        update,
        recommendation,
    })
}

// =============================================================================
// Filtered lists
// =============================================================================

pub fn recommendations_by_chapter(data: &TaskforceData, chapter: u32) -> Vec<&Recommendation> {
    data.recommendations
        .iter()
        .filter(|r| r.chapter.number == chapter)
        .collect()
}

pub fn recommendations_by_status(
    data: &TaskforceData,
    status: OverallStatus,
) -> Vec<&Recommendation> {
    data.recommendations
        .iter()
        .filter(|r| r.status() == status)
        .collect()
}

pub fn recommendations_by_owner<'a>(data: &'a TaskforceData, owner: &str) -> Vec<&'a Recommendation> {
    data.recommendations
        .iter()
        .filter(|r| r.is_owned_by(owner))
        .collect()
}

/// Case-insensitive substring match on titles, text and code.
pub fn search_recommendations<'a>(data: &'a TaskforceData, query: &str) -> Vec<&'a Recommendation> {
    let needle = query.to_lowercase();
    data.recommendations
        .iter()
        .filter(|r| {
            r.titles.short.to_lowercase().contains(&needle)
                || r.titles.long.to_lowercase().contains(&needle)
                || r.text.to_lowercase().contains(&needle)
                || r.code.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn filter_recommendations<'a>(
    data: &'a TaskforceData,
    filter: &RecommendationFilter,
) -> Vec<&'a Recommendation> {
    data.recommendations
        .iter()
        .filter(|r| filter.status.map_or(true, |s| r.status() == s))
        .filter(|r| filter.chapter.map_or(true, |c| r.chapter.number == c))
        .filter(|r| filter.owner.as_deref().map_or(true, |o| r.is_owned_by(o)))
        .filter(|r| filter.tag.as_deref().map_or(true, |t| r.has_tag(t)))
        .collect()
}

// =============================================================================
// Aggregations
// =============================================================================

/// Chapters sorted by id: the dataset's list if present, otherwise derived
/// from the chapters embedded in recommendations.
pub fn chapters(data: &TaskforceData) -> Vec<Chapter> {
    if !data.chapters.is_empty() {
        let mut chapters = data.chapters.clone();
        chapters.sort_by_key(|c| c.id);
        return chapters;
    }

    let derived: BTreeMap<u32, Chapter> = data
        .recommendations
        .iter()
        .map(|r| {
            (
                r.chapter.number,
                Chapter {
                    id: r.chapter.number,
                    title: r.chapter.title.clone(),
                    description: None,
                },
            )
        })
        .collect();
    derived.into_values().collect()
}

/// Chapters that own at least one recommendation, by id, each with its
/// recommendations in dataset order.
pub fn chapters_with_recommendations(data: &TaskforceData) -> Vec<ChapterWithRecommendations<'_>> {
    chapters(data)
        .into_iter()
        .filter_map(|chapter| {
            let recommendations = recommendations_by_chapter(data, chapter.id);
            if recommendations.is_empty() {
                return None;
            }
            Some(ChapterWithRecommendations {
                id: chapter.id,
                title: chapter.title,
                recommendations,
            })
        })
        .collect()
}

pub fn chapter_by_id(data: &TaskforceData, id: u32) -> Option<ChapterWithRecommendations<'_>> {
    chapters_with_recommendations(data)
        .into_iter()
        .find(|c| c.id == id)
}

pub fn status_counts(data: &TaskforceData) -> StatusCounts {
    StatusCounts::tally(&data.recommendations)
}

/// Every primary or co-owner, sorted.
pub fn unique_owners(data: &TaskforceData) -> Vec<String> {
    let owners: BTreeSet<&str> = data
        .recommendations
        .iter()
        .flat_map(Recommendation::owners)
        .collect();
    owners.into_iter().map(String::from).collect()
}

/// Open deadlines, soonest (most overdue) first.
pub fn upcoming_deadlines(
    data: &TaskforceData,
    limit: usize,
    today: NaiveDate,
) -> Vec<UpcomingDeadline<'_>> {
    let mut deadlines: Vec<UpcomingDeadline<'_>> = data
        .recommendations
        .iter()
        .filter(|r| !r.status().is_terminal())
        .filter_map(|r| {
            let date = r.effective_target_date()?;
            let days = days_until(date, today);
            Some(UpcomingDeadline {
                recommendation: r,
                date,
                days_until: days,
                is_overdue: days < 0,
            })
        })
        .collect();
    deadlines.sort_by(|a, b| {
        a.days_until
            .cmp(&b.days_until)
            .then_with(|| a.recommendation.code.cmp(&b.recommendation.code))
    });
    deadlines.truncate(limit);
    deadlines
}

/// Every update across the dataset, newest first.
pub fn all_updates(data: &TaskforceData) -> Vec<RecentUpdate<'_>> {
    let mut updates: Vec<RecentUpdate<'_>> = data
        .recommendations
        .iter()
        .flat_map(|recommendation| {
            recommendation.updates.iter().map(move |update| RecentUpdate {
                update,
                recommendation,
            })
        })
        .collect();
    updates.sort_by(|a, b| b.update.date.cmp(&a.update.date));
    updates
}

pub fn recent_updates(data: &TaskforceData, limit: usize) -> Vec<RecentUpdate<'_>> {
    let mut updates = all_updates(data);
    updates.truncate(limit);
    updates
}

/// Owners with at least `min_count` recommendations, most loaded first.
pub fn owners_with_stats(data: &TaskforceData, min_count: usize) -> Vec<OwnerWithStats<'_>> {
    let mut by_owner: BTreeMap<&str, Vec<&Recommendation>> = BTreeMap::new();
    for rec in &data.recommendations {
        let mut seen = BTreeSet::new();
        for owner in rec.owners() {
            if seen.insert(owner) {
                by_owner.entry(owner).or_default().push(rec);
            }
        }
    }

    let mut owners: Vec<OwnerWithStats<'_>> = by_owner
        .into_iter()
        .filter(|(_, recs)| recs.len() >= min_count)
        .map(|(owner, recommendations)| {
            let status_counts = StatusCounts::tally(recommendations.iter().copied());
            OwnerWithStats {
                owner: owner.to_string(),
                progress_percentage: status_counts.progress_percentage(),
                status_counts,
                key_people: key_people(data, owner),
                recommendations,
            }
        })
        .collect();

    owners.sort_by(|a, b| {
        b.status_counts
            .total
            .cmp(&a.status_counts.total)
            .then_with(|| b.progress_percentage.cmp(&a.progress_percentage))
            .then_with(|| a.owner.cmp(&b.owner))
    });
    owners
}

pub fn key_people<'a>(data: &'a TaskforceData, owner: &str) -> Option<&'a [KeyPerson]> {
    data.owner_info
        .iter()
        .find(|info| info.owner == owner && !info.key_people.is_empty())
        .map(|info| info.key_people.as_slice())
}
