//! YAML dataset loader with a process-wide cache
//!
//! The dataset is read-only and loaded once per process. `DataStore::global()`
//! hands out `Arc<TaskforceData>` snapshots; `reload` swaps the snapshot in
//! place so readers holding the old one keep a consistent view.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::TrackerError;
use crate::types::{TaskforceData, INVALID_DATE_PREFIX};

/// Read and parse a dataset file without touching the cache.
pub fn load_taskforce_data(path: &Path) -> Result<TaskforceData, TrackerError> {
    if !path.exists() {
        return Err(TrackerError::DataNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let data = parse_taskforce_data(&content)?;

    log::info!(
        "Loaded {} recommendations ({} chapters, {} proposals) from {}",
        data.recommendations.len(),
        data.chapters.len(),
        data.proposals.len(),
        path.display()
    );
    Ok(data)
}

/// Decode a dataset. A malformed date surfaces as `TrackerError::InvalidDate`
/// naming where it was found; any other decode failure is `Parse`.
pub fn parse_taskforce_data(content: &str) -> Result<TaskforceData, TrackerError> {
    serde_yaml::from_str(content).map_err(|e| invalid_date(&e).unwrap_or_else(|| e.into()))
}

/// Pull the field path and raw value back out of a date decode error.
fn invalid_date(err: &serde_yaml::Error) -> Option<TrackerError> {
    let message = err.to_string();
    let start = message.find(INVALID_DATE_PREFIX)?;
    let field = message[..start].trim_end().trim_end_matches(':');
    let quoted = message[start + INVALID_DATE_PREFIX.len()..].strip_prefix('"')?;
    let (value, _) = quoted.rsplit_once('"')?;
    let field = if field.is_empty() { "date" } else { field };
    Some(TrackerError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

struct CachedData {
    path: PathBuf,
    data: Arc<TaskforceData>,
}

#[derive(Default)]
pub struct DataStore {
    slot: RwLock<Option<CachedData>>,
}

impl DataStore {
    pub fn global() -> &'static Self {
        static STORE: OnceLock<DataStore> = OnceLock::new();
        STORE.get_or_init(Self::default)
    }

    /// Return the cached dataset, loading it on first use.
    ///
    /// A request for a different path than the cached one replaces the cache.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<TaskforceData>, TrackerError> {
        {
            let slot = self.slot.read();
            if let Some(cached) = slot.as_ref() {
                if cached.path == path {
                    log::debug!("Dataset cache hit for {}", path.display());
                    return Ok(Arc::clone(&cached.data));
                }
            }
        }

        let mut slot = self.slot.write();
        // Another caller may have filled the slot while we waited for the lock.
        if let Some(cached) = slot.as_ref() {
            if cached.path == path {
                return Ok(Arc::clone(&cached.data));
            }
        }

        let data = Arc::new(load_taskforce_data(path)?);
        *slot = Some(CachedData {
            path: path.to_path_buf(),
            data: Arc::clone(&data),
        });
        Ok(data)
    }

    /// Drop the cached snapshot and load `path` again.
    pub fn reload(&self, path: &Path) -> Result<Arc<TaskforceData>, TrackerError> {
        let data = Arc::new(load_taskforce_data(path)?);
        *self.slot.write() = Some(CachedData {
            path: path.to_path_buf(),
            data: Arc::clone(&data),
        });
        log::info!("Reloaded dataset from {}", path.display());
        Ok(data)
    }

    /// The cached snapshot, if a load has already happened.
    pub fn cached(&self) -> Option<Arc<TaskforceData>> {
        self.slot.read().as_ref().map(|c| Arc::clone(&c.data))
    }
}
