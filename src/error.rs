//! Error types for dataset loading and configuration
//!
//! The grid builder, queries and exporters never fail. Everything here
//! originates outside them:
//! - Data errors: missing file, unreadable YAML, malformed dates
//! - Config errors: unreadable or invalid config.json
//! - Usage errors: unknown export kind or status requested from the CLI
//! - Output errors: rendering JSON for stdout failed

use std::path::PathBuf;
use thiserror::Error;

/// Error types for the tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    // Data errors
    #[error("Dataset not found: {0}")]
    DataNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    #[error("Invalid date in {field}: {value:?}")]
    InvalidDate { field: String, value: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Usage errors
    #[error("Unknown export kind: {0}")]
    UnknownExport(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    // Output errors
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl TrackerError {
    /// Returns true if this error was caused by the dataset itself
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            TrackerError::DataNotFound(_)
                | TrackerError::Parse(_)
                | TrackerError::InvalidDate { .. }
        )
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::DataNotFound(_) => {
                "Check dataPath in ~/.taskforce/config.json or pass --data."
            }
            TrackerError::Io(_) => "Check file permissions and try again.",
            TrackerError::Parse(_) => "Check the YAML matches the taskforce schema.",
            TrackerError::InvalidDate { .. } => "Dates must be written as YYYY-MM-DD.",
            TrackerError::Config(_) => "Check ~/.taskforce/config.json is valid JSON.",
            TrackerError::UnknownExport(_) => {
                "Use one of: recommendations, updates, timeline, departments."
            }
            TrackerError::UnknownStatus(_) => {
                "Use one of: not_started, on_track, off_track, completed, abandoned."
            }
            TrackerError::Output(_) => "Retry; if it persists, report the command that failed.",
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for TrackerError {
    fn from(err: serde_yaml::Error) -> Self {
        TrackerError::Parse(err.to_string())
    }
}
