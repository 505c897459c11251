//! Fixture builders shared by unit tests.

use chrono::NaiveDate;

use crate::types::{
    DeliveryTimeline, Dependencies, EmbeddedChapter, OverallStatus, OverallStatusInfo, Ownership,
    Recommendation, Scope, Titles, Update, UpdateStatus,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date")
}

pub fn rec(
    id: u32,
    code: &str,
    primary_owner: &str,
    co_owners: &[&str],
    status: OverallStatus,
) -> Recommendation {
    Recommendation {
        id,
        code: code.to_string(),
        chapter: EmbeddedChapter {
            number: 5,
            title: "Regulatory reform".to_string(),
        },
        proposal_ids: vec![],
        titles: Titles {
            short: format!("Recommendation {}", code),
            long: format!("Long title for {}", code),
        },
        text: format!("Full text of {}", code),
        scope: Scope::default(),
        ownership: Ownership {
            primary_owner: primary_owner.to_string(),
            co_owners: co_owners.iter().map(|s| s.to_string()).collect(),
            key_regulators: vec![],
        },
        delivery_timeline: DeliveryTimeline::default(),
        implementation_type: vec![],
        dependencies: Dependencies::default(),
        overall_status: OverallStatusInfo {
            status,
            last_updated: None,
            confidence: None,
            summary: None,
        },
        updates: vec![],
        notes: None,
    }
}

pub fn with_target(mut rec: Recommendation, target: &str, revised: Option<&str>) -> Recommendation {
    rec.delivery_timeline.target_date = Some(date(target));
    rec.delivery_timeline.revised_target_date = revised.map(date);
    rec
}

pub fn with_update(mut rec: Recommendation, on: &str, title: &str) -> Recommendation {
    rec.updates.push(update(on, title, UpdateStatus::Progress));
    rec
}

pub fn update(on: &str, title: &str, status: UpdateStatus) -> Update {
    Update {
        date: date(on),
        status,
        tags: vec![],
        title: title.to_string(),
        description: String::new(),
        links: vec![],
        source: None,
        impact_on_overall: None,
    }
}
