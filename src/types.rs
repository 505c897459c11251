//! Dataset model for the taskforce tracker.
//!
//! Mirrors `taskforce.yaml`: snake_case keys, dates as `YYYY-MM-DD`. Status
//! values are closed enums so every label/icon/class lookup below is an
//! exhaustive match.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Status scales
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    NotStarted,
    OnTrack,
    OffTrack,
    Completed,
    Abandoned,
}

impl OverallStatus {
    pub const ALL: [OverallStatus; 5] = [
        Self::NotStarted,
        Self::OnTrack,
        Self::OffTrack,
        Self::Completed,
        Self::Abandoned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::OnTrack => "on_track",
            Self::OffTrack => "off_track",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::OnTrack => "On Track",
            Self::OffTrack => "Off Track",
            Self::Completed => "Completed",
            Self::Abandoned => "Abandoned",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::NotStarted => "status-not-started",
            Self::OnTrack => "status-on-track",
            Self::OffTrack => "status-off-track",
            Self::Completed => "status-completed",
            Self::Abandoned => "status-abandoned",
        }
    }

    /// Lucide icon name used by the renderer.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::NotStarted => "Circle",
            Self::OnTrack => "CheckCircle2",
            Self::OffTrack => "AlertCircle",
            Self::Completed => "CheckCircle",
            Self::Abandoned => "XCircle",
        }
    }

    /// Terminal recommendations no longer carry a live deadline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Info,
    Progress,
    Risk,
    OffTrack,
    Completed,
    Blocked,
}

impl UpdateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Progress => "Progress",
            Self::Risk => "Risk",
            Self::OffTrack => "Off Track",
            Self::Completed => "Completed",
            Self::Blocked => "Blocked",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "status-info",
            Self::Progress => "status-progress",
            Self::Risk => "status-risk",
            Self::OffTrack => "status-off-track",
            Self::Completed => "status-completed",
            Self::Blocked => "status-blocked",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Progress => "TrendingUp",
            Self::Risk => "AlertTriangle",
            Self::OffTrack => "AlertCircle",
            Self::Completed => "CheckCircle",
            Self::Blocked => "Ban",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// =============================================================================
// Dataset root
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskforceData {
    #[serde(default, deserialize_with = "optional_date")]
    pub last_updated: Option<NaiveDate>,
    #[serde(default)]
    pub status_scales: Option<StatusScales>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub owner_info: Vec<OwnerInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusScales {
    #[serde(default)]
    pub overall_status: Vec<OverallStatus>,
    #[serde(default)]
    pub update_status: Vec<UpdateStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendation_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInfo {
    pub owner: String,
    #[serde(default)]
    pub key_people: Vec<KeyPerson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPerson {
    pub title: String,
    pub name: String,
}

// =============================================================================
// Recommendation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub code: String,
    pub chapter: EmbeddedChapter,
    #[serde(default)]
    pub proposal_ids: Vec<u32>,
    pub titles: Titles,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub scope: Scope,
    pub ownership: Ownership,
    #[serde(default)]
    pub delivery_timeline: DeliveryTimeline,
    #[serde(default)]
    pub implementation_type: Vec<String>,
    #[serde(default)]
    pub dependencies: Dependencies,
    pub overall_status: OverallStatusInfo,
    #[serde(default)]
    pub updates: Vec<Update>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Recommendation {
    pub fn status(&self) -> OverallStatus {
        self.overall_status.status
    }

    /// Revised target date if set, else the original target date.
    pub fn effective_target_date(&self) -> Option<NaiveDate> {
        self.delivery_timeline.effective_date()
    }

    /// Primary owner or any co-owner.
    pub fn is_owned_by(&self, organization: &str) -> bool {
        self.ownership.primary_owner == organization
            || self.ownership.co_owners.iter().any(|o| o == organization)
    }

    /// Primary owner first, then co-owners in dataset order.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.ownership.primary_owner.as_str())
            .chain(self.ownership.co_owners.iter().map(String::as_str))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.updates
            .iter()
            .any(|u| u.tags.iter().any(|t| t == tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChapter {
    pub number: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Titles {
    pub short: String,
    #[serde(default)]
    pub long: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub primary_owner: String,
    #[serde(default)]
    pub co_owners: Vec<String>,
    #[serde(default)]
    pub key_regulators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTimeline {
    #[serde(default)]
    pub original_text: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub target_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub revised_target_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeliveryTimeline {
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.revised_target_date.or(self.target_date)
    }

    /// A revision only counts when it actually moves the date.
    pub fn is_revised(&self) -> bool {
        match (self.revised_target_date, self.target_date) {
            (Some(revised), Some(target)) => revised != target,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    #[serde(default)]
    pub depends_on: Vec<u32>,
    #[serde(default)]
    pub enables: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallStatusInfo {
    pub status: OverallStatus,
    #[serde(default, deserialize_with = "optional_date")]
    pub last_updated: Option<NaiveDate>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// =============================================================================
// Updates
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    #[serde(deserialize_with = "required_date")]
    pub date: NaiveDate,
    pub status: UpdateStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_on_overall: Option<ImpactOnOverall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactOnOverall {
    #[serde(default)]
    pub changes_overall_status_to: Option<OverallStatus>,
    #[serde(default)]
    pub changes_confidence_to: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Prefix of the decode error raised for a malformed date. The loader
/// recognises it to report `TrackerError::InvalidDate`.
pub(crate) const INVALID_DATE_PREFIX: &str = "invalid date ";

fn parse_dataset_date<E: serde::de::Error>(value: &str) -> Result<NaiveDate, E> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| E::custom(format!("{}{:?}", INVALID_DATE_PREFIX, value)))
}

/// `null`, a missing key, and `""` all mean "no date". Anything else must
/// parse as `YYYY-MM-DD`.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_dataset_date(value).map(Some),
    }
}

fn required_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_dataset_date(raw.trim())
}
