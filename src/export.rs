//! CSV exporters for recommendations, updates, timeline and departments.
//!
//! Output is Excel-friendly: UTF-8 BOM, header row, `\n` line endings. An
//! export with no rows is the empty string (no BOM, no header).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_utils::days_until;
use crate::error::TrackerError;
use crate::queries::{RecentUpdate, RecommendationFilter, StatusCounts};
use crate::timeline::TimelineItem;
use crate::types::{Chapter, Recommendation, Update};

const BOM: &str = "\u{FEFF}";
const FILENAME_PREFIX: &str = "nuclear-taskforce";

/// Abbreviation → full organisation name.
pub const OWNER_FULL_NAMES: &[(&str, &str)] = &[
    ("DESNZ", "Department for Energy Security and Net Zero"),
    ("MOD", "Ministry of Defence"),
    ("ONR", "Office for Nuclear Regulation"),
    ("EA", "Environment Agency"),
    ("MHCLG", "Ministry of Housing, Communities and Local Government"),
    ("DEFRA", "Department for Environment, Food & Rural Affairs"),
    ("NDA", "Nuclear Decommissioning Authority"),
    ("HSE", "Health and Safety Executive"),
    ("DWP", "Department for Work and Pensions"),
    ("HM Treasury", "HM Treasury"),
    ("UKHSA", "UK Health Security Agency"),
    ("UKRI", "UK Research and Innovation"),
    ("DBT", "Department for Business and Trade"),
    ("FCDO", "Foreign, Commonwealth & Development Office"),
    ("MOJ", "Ministry of Justice"),
    ("EDF", "EDF Energy"),
];

pub fn owner_full_name(owner: &str) -> &str {
    OWNER_FULL_NAMES
        .iter()
        .find(|(abbr, _)| *abbr == owner)
        .map(|(_, full)| *full)
        .unwrap_or(owner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Recommendations,
    Updates,
    Timeline,
    Departments,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommendations => "recommendations",
            Self::Updates => "updates",
            Self::Timeline => "timeline",
            Self::Departments => "departments",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "recommendations" => Ok(Self::Recommendations),
            "updates" => Ok(Self::Updates),
            "timeline" => Ok(Self::Timeline),
            "departments" => Ok(Self::Departments),
            other => Err(TrackerError::UnknownExport(other.to_string())),
        }
    }
}

// =============================================================================
// CSV primitives
// =============================================================================

/// Quote a field if it contains a comma, quote or newline.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        lines.push(
            row.iter()
                .map(|field| escape_csv_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    format!("{}{}", BOM, lines.join("\n"))
}

fn join(values: &[String]) -> String {
    values.join(", ")
}

fn yes_no(value: bool) -> String {
    let text = if value { "Yes" } else { "No" };
    text.to_string()
}

fn date_or_empty(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn recommendation_code(id: u32) -> String {
    format!("R{:02}", id)
}

// =============================================================================
// Recommendations
// =============================================================================

const RECOMMENDATION_HEADERS: &[&str] = &[
    "Code",
    "Short Title",
    "Long Title",
    "Chapter ID",
    "Chapter Title",
    "Overall Status",
    "Status Last Updated",
    "Status Confidence",
    "Status Summary",
    "Primary Owner",
    "Co-Owners",
    "Key Regulators",
    "Target Date",
    "Revised Target Date",
    "Days Until Deadline",
    "Is Overdue",
    "Sectors",
    "Domains",
    "Implementation Types",
    "Depends On",
    "Enables",
    "Update Count",
    "Latest Update Date",
    "Latest Update Status",
    "Full Recommendation Text",
];

pub fn export_recommendations_csv(
    recommendations: &[&Recommendation],
    chapters: &[Chapter],
    today: NaiveDate,
) -> String {
    let chapter_titles: BTreeMap<u32, &str> =
        chapters.iter().map(|c| (c.id, c.title.as_str())).collect();

    let rows: Vec<Vec<String>> = recommendations
        .iter()
        .map(|rec| {
            let chapter_title = chapter_titles
                .get(&rec.chapter.number)
                .map(|t| t.to_string())
                .unwrap_or_else(|| format!("Chapter {}", rec.chapter.number));
            let effective = rec.effective_target_date();
            let days = effective.map(|d| days_until(d, today)).unwrap_or(0);
            let latest = rec.updates.iter().max_by_key(|u| u.date);
            let status = &rec.overall_status;

            vec![
                rec.code.clone(),
                rec.titles.short.clone(),
                rec.titles.long.clone(),
                rec.chapter.number.to_string(),
                chapter_title,
                status.status.label().to_string(),
                date_or_empty(status.last_updated),
                status.confidence.map(|c| c.as_str().to_string()).unwrap_or_default(),
                status.summary.clone().unwrap_or_default(),
                rec.ownership.primary_owner.clone(),
                join(&rec.ownership.co_owners),
                join(&rec.ownership.key_regulators),
                date_or_empty(rec.delivery_timeline.target_date),
                date_or_empty(rec.delivery_timeline.revised_target_date),
                days.to_string(),
                yes_no(days < 0),
                join(&rec.scope.sectors),
                join(&rec.scope.domains),
                join(&rec.implementation_type),
                rec.dependencies
                    .depends_on
                    .iter()
                    .map(|id| recommendation_code(*id))
                    .collect::<Vec<_>>()
                    .join(", "),
                rec.dependencies
                    .enables
                    .iter()
                    .map(|id| recommendation_code(*id))
                    .collect::<Vec<_>>()
                    .join(", "),
                rec.updates.len().to_string(),
                latest.map(|u| u.date.to_string()).unwrap_or_default(),
                latest.map(|u| u.status.label().to_string()).unwrap_or_default(),
                rec.text.clone(),
            ]
        })
        .collect();

    to_csv(RECOMMENDATION_HEADERS, &rows)
}

// =============================================================================
// Updates and timeline
// =============================================================================

const UPDATE_HEADERS: &[&str] = &[
    "Date",
    "Recommendation Code",
    "Recommendation Title",
    "Update Status",
    "Update Title",
    "Update Description",
    "Tags",
    "Links",
    "Source Type",
    "Source Reference",
    "Impact on Overall Status",
    "Impact on Confidence",
    "Impact Notes",
];

/// The columns an update contributes, from "Update Status" to "Impact Notes".
fn update_columns(update: &Update) -> Vec<String> {
    let impact = update.impact_on_overall.as_ref();
    vec![
        update.status.label().to_string(),
        update.title.clone(),
        update.description.clone(),
        join(&update.tags),
        update
            .links
            .iter()
            .map(|l| format!("{}|{}", l.title, l.url))
            .collect::<Vec<_>>()
            .join("; "),
        update
            .source
            .as_ref()
            .map(|s| s.source_type.clone())
            .unwrap_or_default(),
        update
            .source
            .as_ref()
            .and_then(|s| s.reference.clone())
            .unwrap_or_default(),
        impact
            .and_then(|i| i.changes_overall_status_to)
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        impact
            .and_then(|i| i.changes_confidence_to)
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
        impact.and_then(|i| i.notes.clone()).unwrap_or_default(),
    ]
}

pub fn export_updates_csv(updates: &[RecentUpdate<'_>]) -> String {
    let rows: Vec<Vec<String>> = updates
        .iter()
        .map(|RecentUpdate { update, recommendation }| {
            let mut row = vec![
                update.date.to_string(),
                recommendation.code.clone(),
                recommendation.titles.short.clone(),
            ];
            row.extend(update_columns(update));
            row
        })
        .collect();

    to_csv(UPDATE_HEADERS, &rows)
}

const TIMELINE_HEADERS: &[&str] = &[
    "Date",
    "Type",
    "Recommendation Code",
    "Recommendation Title",
    "Update Status",
    "Update Title",
    "Update Description",
    "Tags",
    "Links",
    "Source Type",
    "Source Reference",
    "Impact on Overall Status",
    "Impact on Confidence",
    "Impact Notes",
    "Deadline Target Date",
    "Deadline Revised Date",
    "Days Until Deadline",
    "Is Overdue",
];

pub fn export_timeline_csv(items: &[TimelineItem<'_>]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let rec = item.recommendation();
            let mut row = vec![item.date().to_string()];
            match item {
                TimelineItem::Update { update, .. } => {
                    row.extend([
                        "Update".to_string(),
                        rec.code.clone(),
                        rec.titles.short.clone(),
                    ]);
                    row.extend(update_columns(update));
                    row.extend(std::iter::repeat(String::new()).take(4));
                }
                TimelineItem::Deadline { deadline, .. } => {
                    row.extend([
                        "Deadline".to_string(),
                        rec.code.clone(),
                        rec.titles.short.clone(),
                        String::new(),
                        format!("Deadline: {}", rec.titles.short),
                    ]);
                    row.extend(std::iter::repeat(String::new()).take(8));
                    row.extend([
                        date_or_empty(deadline.target_date),
                        date_or_empty(deadline.revised_date),
                        deadline.days_until.to_string(),
                        yes_no(deadline.is_overdue),
                    ]);
                }
            }
            row
        })
        .collect();

    to_csv(TIMELINE_HEADERS, &rows)
}

// =============================================================================
// Departments
// =============================================================================

const DEPARTMENT_HEADERS: &[&str] = &[
    "Owner/Department",
    "Full Name",
    "Total Recommendations",
    "Not Started",
    "On Track",
    "Off Track",
    "Completed",
    "Abandoned",
    "Completion Percentage",
    "Average Days Until Deadline",
    "Overdue Count",
];

pub fn export_departments_csv(recommendations: &[Recommendation], today: NaiveDate) -> String {
    let mut by_owner: BTreeMap<&str, Vec<&Recommendation>> = BTreeMap::new();
    for rec in recommendations {
        for owner in rec.owners() {
            let entry = by_owner.entry(owner).or_default();
            if !entry.iter().any(|r| r.id == rec.id) {
                entry.push(rec);
            }
        }
    }

    let rows: Vec<Vec<String>> = by_owner
        .into_iter()
        .map(|(owner, recs)| {
            let counts = StatusCounts::tally(recs.iter().copied());
            let open_days: Vec<i64> = recs
                .iter()
                .filter(|r| !r.status().is_terminal())
                .filter_map(|r| r.effective_target_date())
                .map(|d| days_until(d, today))
                .collect();
            let overdue = open_days.iter().filter(|d| **d < 0).count();
            let completion = if counts.total > 0 {
                counts.completed as f64 / counts.total as f64 * 100.0
            } else {
                0.0
            };
            let average_days = if open_days.is_empty() {
                String::new()
            } else {
                format!(
                    "{:.1}",
                    open_days.iter().sum::<i64>() as f64 / open_days.len() as f64
                )
            };

            vec![
                owner.to_string(),
                owner_full_name(owner).to_string(),
                counts.total.to_string(),
                counts.not_started.to_string(),
                counts.on_track.to_string(),
                counts.off_track.to_string(),
                counts.completed.to_string(),
                counts.abandoned.to_string(),
                format!("{:.1}%", completion),
                average_days,
                overdue.to_string(),
            ]
        })
        .collect();

    to_csv(DEPARTMENT_HEADERS, &rows)
}

// =============================================================================
// Filenames
// =============================================================================

/// `nuclear-taskforce-<kind>-<date>[-status][-chapterN][-owner][-tag].csv`
pub fn export_filename(kind: ExportKind, filter: &RecommendationFilter, today: NaiveDate) -> String {
    let mut name = format!("{}-{}-{}", FILENAME_PREFIX, kind.as_str(), today);
    if let Some(status) = filter.status {
        name.push('-');
        name.push_str(status.as_str());
    }
    if let Some(chapter) = filter.chapter {
        name.push_str(&format!("-chapter{}", chapter));
    }
    if let Some(owner) = &filter.owner {
        name.push('-');
        name.push_str(owner);
    }
    if let Some(tag) = &filter.tag {
        name.push('-');
        name.push_str(tag);
    }
    name.push_str(".csv");
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, rec, update, with_target, with_update};
    use crate::timeline::collect_timeline_items;
    use crate::types::{ImpactOnOverall, Link, OverallStatus, Source, UpdateStatus};

    fn lines(csv: &str) -> Vec<&str> {
        csv.trim_start_matches(BOM).split('\n').collect()
    }

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a, b"), "\"a, b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn empty_export_is_empty_string() {
        assert_eq!(export_recommendations_csv(&[], &[], date("2024-01-01")), "");
        assert_eq!(export_updates_csv(&[]), "");
        assert_eq!(export_timeline_csv(&[]), "");
        assert_eq!(export_departments_csv(&[], date("2024-01-01")), "");
    }

    #[test]
    fn recommendation_rows() {
        let mut r = with_target(
            with_update(rec(3, "R03", "ONR", &["DESNZ", "EA"], OverallStatus::OffTrack), "2024-02-01", "later"),
            "2024-03-01",
            Some("2024-04-15"),
        );
        r.updates.insert(0, update("2024-01-01", "earlier", UpdateStatus::Risk));
        r.dependencies.depends_on = vec![1, 12];

        let chapters = vec![Chapter {
            id: 5,
            title: "Regulatory reform".to_string(),
            description: None,
        }];
        let csv = export_recommendations_csv(&[&r], &chapters, date("2024-04-20"));
        assert!(csv.starts_with(BOM));

        let lines = lines(&csv);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Code,Short Title,Long Title,Chapter ID"));
        let row = lines[1];
        assert!(row.starts_with("R03,Recommendation R03,"));
        assert!(row.contains(",Regulatory reform,Off Track,"));
        assert!(row.contains(",\"DESNZ, EA\","));
        assert!(row.contains(",2024-03-01,2024-04-15,-5,Yes,"));
        assert!(row.contains(",\"R01, R12\","));
        assert!(row.contains(",2,2024-02-01,Progress,"));
    }

    #[test]
    fn unknown_chapter_gets_placeholder_title() {
        let r = rec(1, "R01", "ONR", &[], OverallStatus::NotStarted);
        let csv = export_recommendations_csv(&[&r], &[], date("2024-01-01"));
        assert!(lines(&csv)[1].contains(",5,Chapter 5,Not Started,"));
    }

    #[test]
    fn update_rows_include_links_and_impact() {
        let mut r = rec(1, "R01", "ONR", &[], OverallStatus::OnTrack);
        let mut u = update("2024-01-10", "Consultation", UpdateStatus::Progress);
        u.tags = vec!["consultation".to_string(), "policy".to_string()];
        u.links = vec![
            Link { title: "Notice".to_string(), url: "https://a.example".to_string() },
            Link { title: "Annex".to_string(), url: "https://b.example".to_string() },
        ];
        u.source = Some(Source {
            source_type: "press_release".to_string(),
            reference: Some("PR-12".to_string()),
        });
        u.impact_on_overall = Some(ImpactOnOverall {
            changes_overall_status_to: Some(OverallStatus::OffTrack),
            changes_confidence_to: None,
            notes: Some("Slipped".to_string()),
        });
        r.updates.push(u);

        let recent = vec![RecentUpdate {
            update: &r.updates[0],
            recommendation: &r,
        }];
        let csv = export_updates_csv(&recent);
        let row = lines(&csv)[1];
        assert_eq!(
            row,
            "2024-01-10,R01,Recommendation R01,Progress,Consultation,,\"consultation, policy\",\
             Notice|https://a.example; Annex|https://b.example,press_release,PR-12,Off Track,,Slipped"
        );
    }

    #[test]
    fn timeline_rows_have_uniform_width() {
        let recs = vec![with_target(
            with_update(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-10", "kickoff"),
            "2024-06-01",
            None,
        )];
        let items = collect_timeline_items(&recs, date("2024-05-30"), true);
        let csv = export_timeline_csv(&items);
        let lines = lines(&csv);

        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(line.split(',').count(), TIMELINE_HEADERS.len());
        }
        assert!(lines[1].starts_with("2024-01-10,Update,R01,"));
        assert!(lines[2].starts_with("2024-06-01,Deadline,R01,Recommendation R01,,Deadline: Recommendation R01,"));
        assert!(lines[2].ends_with(",2024-06-01,,2,No"));
    }

    #[test]
    fn department_rows() {
        let recs = vec![
            with_target(rec(1, "R01", "ONR", &[], OverallStatus::OnTrack), "2024-01-11", None),
            with_target(rec(2, "R02", "ONR", &["DESNZ"], OverallStatus::OffTrack), "2023-12-31", None),
            rec(3, "R03", "DESNZ", &[], OverallStatus::Completed),
            rec(4, "R04", "Test Org", &[], OverallStatus::NotStarted),
        ];
        let csv = export_departments_csv(&recs, date("2024-01-01"));
        let lines = lines(&csv);

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            "DESNZ,Department for Energy Security and Net Zero,2,0,0,1,1,0,50.0%,-1.0,1"
        );
        assert_eq!(lines[2], "ONR,Office for Nuclear Regulation,2,0,1,1,0,0,0.0%,4.5,1");
        assert_eq!(lines[3], "Test Org,Test Org,1,1,0,0,0,0,0.0%,,0");
    }

    #[test]
    fn filenames_carry_filters() {
        let today = date("2024-07-01");
        assert_eq!(
            export_filename(ExportKind::Timeline, &RecommendationFilter::default(), today),
            "nuclear-taskforce-timeline-2024-07-01.csv"
        );
        let filter = RecommendationFilter {
            status: Some(OverallStatus::OnTrack),
            chapter: Some(7),
            owner: Some("ONR".to_string()),
            tag: Some("siting".to_string()),
        };
        assert_eq!(
            export_filename(ExportKind::Recommendations, &filter, today),
            "nuclear-taskforce-recommendations-2024-07-01-on_track-chapter7-ONR-siting.csv"
        );
    }

    #[test]
    fn export_kind_parses() {
        assert_eq!("updates".parse::<ExportKind>().unwrap(), ExportKind::Updates);
        assert!(matches!(
            "xlsx".parse::<ExportKind>(),
            Err(TrackerError::UnknownExport(_))
        ));
    }
}
