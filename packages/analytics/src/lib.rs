#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Moderation dashboard statistics and CSV export.
//!
//! Everything here works on an in-memory snapshot: [`apply_filter`] narrows
//! it, [`summarize`] produces the dashboard numbers, and [`export_csv`]
//! writes the tabular layout that the store crate can load back.

pub mod export;
pub mod summary;

pub use export::export_csv;
pub use incident_map_analytics_models::{
    AnalyticsSummary, IncidentFilter, StatusCount, TimeGranularity, TimeSeriesPoint, Timeframe,
    TypeCount,
};
pub use summary::summarize;

use incident_map_incident_models::Incident;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Writing CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Incidents passing `filter`, in input order.
#[must_use]
pub fn apply_filter<'a>(incidents: &'a [Incident], filter: &IncidentFilter) -> Vec<&'a Incident> {
    let kept: Vec<&Incident> = incidents.iter().filter(|i| filter.matches(i)).collect();
    log::debug!("Filter kept {} of {} incidents", kept.len(), incidents.len());
    kept
}
