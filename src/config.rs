//! Tracker configuration (~/.taskforce/config.json)
//!
//! Every key is optional. A missing file means defaults; a file that exists
//! but cannot be parsed is an error so typos don't silently fall back.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::timeline::MAX_WEEKS_RANGE;

const DEFAULT_WEEKS_AHEAD: u32 = 52;
const DEFAULT_WEEKS_BACK: u32 = 4;
const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_weeks_ahead")]
    pub weeks_ahead: u32,
    #[serde(default = "default_weeks_back")]
    pub weeks_back: u32,
    #[serde(default = "default_list_limit")]
    pub upcoming_deadline_limit: usize,
    #[serde(default = "default_list_limit")]
    pub recent_update_limit: usize,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("public").join("taskforce.yaml")
}

fn default_weeks_ahead() -> u32 {
    DEFAULT_WEEKS_AHEAD
}

fn default_weeks_back() -> u32 {
    DEFAULT_WEEKS_BACK
}

fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            weeks_ahead: DEFAULT_WEEKS_AHEAD,
            weeks_back: DEFAULT_WEEKS_BACK,
            upcoming_deadline_limit: DEFAULT_LIST_LIMIT,
            recent_update_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl Config {
    /// Reject values the grid builder would refuse to honour.
    pub fn validate(&self) -> Result<(), TrackerError> {
        validate_weeks("weeksAhead", self.weeks_ahead)?;
        validate_weeks("weeksBack", self.weeks_back)?;
        Ok(())
    }
}

/// Week counts must stay within [`MAX_WEEKS_RANGE`].
pub fn validate_weeks(field: &str, value: u32) -> Result<u32, TrackerError> {
    if value > MAX_WEEKS_RANGE {
        return Err(TrackerError::Config(format!(
            "{} is {}; the maximum is {} weeks",
            field, value, MAX_WEEKS_RANGE
        )));
    }
    Ok(value)
}

/// Get the canonical config file path (~/.taskforce/config.json)
pub fn config_path() -> Result<PathBuf, TrackerError> {
    let home = dirs::home_dir()
        .ok_or_else(|| TrackerError::Config("Could not find home directory".to_string()))?;
    Ok(home.join(".taskforce").join("config.json"))
}

/// Load configuration from ~/.taskforce/config.json, or defaults if absent.
pub fn load_config() -> Result<Config, TrackerError> {
    let path = config_path()?;
    if !path.exists() {
        log::debug!("No config at {}; using defaults", path.display());
        return Ok(Config::default());
    }
    load_config_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_config_from(path: &Path) -> Result<Config, TrackerError> {
    let content = fs::read_to_string(path).map_err(|e| {
        TrackerError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| TrackerError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.weeks_ahead, 52);
        assert_eq!(config.weeks_back, 4);
    }

    #[test]
    fn camel_case_keys_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "dataPath": "/srv/taskforce.yaml", "weeksAhead": 26, "recentUpdateLimit": 3 }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/taskforce.yaml"));
        assert_eq!(config.weeks_ahead, 26);
        assert_eq!(config.weeks_back, 4);
        assert_eq!(config.recent_update_limit, 3);
        assert_eq!(config.upcoming_deadline_limit, 10);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ weeksAhead: 26 }").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }

    #[test]
    fn out_of_range_weeks_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "weeksBack": 4294967295 }"#).unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, TrackerError::Config(ref msg) if msg.contains("weeksBack")));
        assert_eq!(validate_weeks("--weeks-ahead", MAX_WEEKS_RANGE).unwrap(), MAX_WEEKS_RANGE);
        assert!(validate_weeks("--weeks-ahead", MAX_WEEKS_RANGE + 1).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));
    }
}
