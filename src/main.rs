//! taskforce CLI: timeline grid, dashboard stats and CSV exports.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use taskforce_lib::config::{load_config, load_config_from, validate_weeks, Config};
use taskforce_lib::date_utils::parse_date;
use taskforce_lib::export::{self, ExportKind};
use taskforce_lib::queries::{
    self, OwnerWithStats, RecentUpdate, RecommendationFilter, StatusCounts, UpcomingDeadline,
};
use taskforce_lib::timeline::collect_timeline_items;
use taskforce_lib::types::OverallStatus;
use taskforce_lib::{build_timeline_grid, DataStore, GridOptions, TrackerError};

#[derive(Parser)]
#[command(name = "taskforce", version, about = "Taskforce recommendation tracker")]
struct Cli {
    /// Config file (defaults to ~/.taskforce/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset YAML, overriding the configured dataPath.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to the local date.
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the timeline grid as JSON.
    Grid {
        #[arg(long)]
        weeks_ahead: Option<u32>,
        #[arg(long)]
        weeks_back: Option<u32>,
    },

    /// Print dashboard statistics as JSON.
    Stats,

    /// Print a CSV export.
    Export {
        /// recommendations, updates, timeline or departments.
        kind: String,

        /// Overall status, e.g. on_track.
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        chapter: Option<u32>,

        #[arg(long)]
        owner: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardStats<'a> {
    status_counts: StatusCounts,
    progress_percentage: u32,
    upcoming_deadlines: Vec<UpcomingDeadline<'a>>,
    recent_updates: Vec<RecentUpdate<'a>>,
    owners: Vec<OwnerWithStats<'a>>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        eprintln!("{}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TrackerError> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    let today = match cli.today.as_deref() {
        Some(value) => parse_date("--today", value)?,
        None => Local::now().date_naive(),
    };
    let data_path = cli.data.clone().unwrap_or_else(|| config.data_path.clone());
    let data = DataStore::global().get_or_load(&data_path)?;

    match cli.command {
        Commands::Grid {
            weeks_ahead,
            weeks_back,
        } => {
            let options = GridOptions {
                weeks_ahead: validate_weeks(
                    "--weeks-ahead",
                    weeks_ahead.unwrap_or(config.weeks_ahead),
                )?,
                weeks_back: validate_weeks("--weeks-back", weeks_back.unwrap_or(config.weeks_back))?,
                today,
            };
            let grid = build_timeline_grid(&data.recommendations, &options);
            print_json(&grid)?;
        }

        Commands::Stats => {
            let stats = dashboard_stats(&data, &config, today);
            print_json(&stats)?;
        }

        Commands::Export {
            kind,
            status,
            chapter,
            owner,
            tag,
        } => {
            let kind: ExportKind = kind.parse()?;
            let status = status
                .map(|s| OverallStatus::parse(&s).ok_or(TrackerError::UnknownStatus(s)))
                .transpose()?;
            let filter = RecommendationFilter {
                status,
                chapter,
                owner,
                tag,
            };
            let csv = render_export(kind, &data, &filter, today);
            log::info!("Suggested filename: {}", export::export_filename(kind, &filter, today));
            print!("{csv}");
        }
    }

    Ok(())
}

fn dashboard_stats<'a>(
    data: &'a taskforce_lib::TaskforceData,
    config: &Config,
    today: NaiveDate,
) -> DashboardStats<'a> {
    let status_counts = queries::status_counts(data);
    DashboardStats {
        progress_percentage: status_counts.progress_percentage(),
        status_counts,
        upcoming_deadlines: queries::upcoming_deadlines(data, config.upcoming_deadline_limit, today),
        recent_updates: queries::recent_updates(data, config.recent_update_limit),
        owners: queries::owners_with_stats(data, 1),
    }
}

fn render_export(
    kind: ExportKind,
    data: &taskforce_lib::TaskforceData,
    filter: &RecommendationFilter,
    today: NaiveDate,
) -> String {
    match kind {
        ExportKind::Recommendations => {
            let recs = queries::filter_recommendations(data, filter);
            export::export_recommendations_csv(&recs, &queries::chapters(data), today)
        }
        ExportKind::Updates => {
            let updates: Vec<RecentUpdate<'_>> = queries::all_updates(data)
                .into_iter()
                .filter(|u| {
                    filter
                        .tag
                        .as_deref()
                        .map_or(true, |t| u.update.tags.iter().any(|x| x == t))
                })
                .filter(|u| filter_matches(filter, u.recommendation))
                .collect();
            export::export_updates_csv(&updates)
        }
        ExportKind::Timeline => {
            let recs: Vec<_> = queries::filter_recommendations(data, filter)
                .into_iter()
                .cloned()
                .collect();
            let items = collect_timeline_items(&recs, today, true);
            export::export_timeline_csv(&items)
        }
        ExportKind::Departments => export::export_departments_csv(&data.recommendations, today),
    }
}

/// Recommendation-level filters, ignoring the update tag.
fn filter_matches(filter: &RecommendationFilter, rec: &taskforce_lib::Recommendation) -> bool {
    filter.status.map_or(true, |s| rec.status() == s)
        && filter.chapter.map_or(true, |c| rec.chapter.number == c)
        && filter.owner.as_deref().map_or(true, |o| rec.is_owned_by(o))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), TrackerError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TrackerError::Output(e.to_string()))?;
    println!("{json}");
    Ok(())
}
