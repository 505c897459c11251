//! Implementation tracker for the nuclear regulatory taskforce.
//!
//! Loads the recommendations dataset, answers dashboard queries, builds the
//! week-by-week timeline grid and renders CSV exports. Everything downstream
//! of [`loader`] is pure: it borrows the dataset and takes `today` explicitly.

pub mod config;
pub mod date_utils;
pub mod error;
pub mod export;
pub mod loader;
pub mod queries;
pub mod timeline;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::TrackerError;
pub use loader::DataStore;
pub use timeline::{build_timeline_grid, GridAxis, GridOptions, TimelineGrid};
pub use types::{Recommendation, TaskforceData};
