#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and result types for incident analytics.
//!
//! Defines the moderation filter, the reporting window and the summary
//! shape returned to dashboards.

use incident_map_incident_models::{Incident, IncidentStatus, IncidentType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Reporting window for time-series statistics.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Timeframe {
    /// Last 7 days.
    #[default]
    Week,
    /// Last 30 days.
    Month,
    /// Last 365 days.
    Year,
}

impl Timeframe {
    /// Length of the window in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    /// Bucket width used for this window's series.
    #[must_use]
    pub const fn granularity(self) -> TimeGranularity {
        match self {
            Self::Week => TimeGranularity::Daily,
            Self::Month => TimeGranularity::Weekly,
            Self::Year => TimeGranularity::Monthly,
        }
    }
}

/// Bucket width of the time series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimeGranularity {
    /// One bucket per calendar day, labelled `YYYY-MM-DD`.
    Daily,
    /// Seven-day buckets counted from the start of the window, labelled by
    /// their first day.
    Weekly,
    /// One bucket per calendar month, labelled `YYYY-MM`.
    Monthly,
}

/// Moderation filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilter {
    /// Keep only this status.
    pub status: Option<IncidentStatus>,
    /// Keep only this type.
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,
    /// Case-insensitive substring matched against title, description and
    /// address.
    pub search: Option<String>,
}

impl IncidentFilter {
    /// Whether `incident` passes every set criterion.
    #[must_use]
    pub fn matches(&self, incident: &Incident) -> bool {
        if let Some(status) = self.status
            && incident.status != status
        {
            return false;
        }
        if let Some(incident_type) = self.incident_type
            && incident.incident_type != incident_type
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                incident.title.to_lowercase().contains(&needle)
                    || incident.description.to_lowercase().contains(&needle)
                    || incident
                        .address
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Incident count for one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Incident type.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Number of incidents.
    pub count: u64,
}

/// Incident count for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Moderation status.
    pub status: IncidentStatus,
    /// Number of incidents.
    pub count: u64,
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Bucket label (e.g. "2025-01-15" or "2025-01").
    pub period: String,
    /// Incidents reported in this bucket.
    pub count: u64,
}

/// Dashboard statistics over an incident snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of incidents considered.
    pub total_incidents: u64,
    /// Percentage of incidents with status `resolved` (0 when empty).
    pub resolution_rate: f64,
    /// Mean hours from report to last update over resolved incidents, if any
    /// carry an update time.
    pub avg_resolution_hours: Option<f64>,
    /// Counts for every type in catalog order, zeros included.
    pub by_type: Vec<TypeCount>,
    /// Counts for every status in catalog order, zeros included.
    pub by_status: Vec<StatusCount>,
    /// Window the series covers.
    pub timeframe: Timeframe,
    /// Bucket width of the series.
    pub granularity: TimeGranularity,
    /// One point per bucket in the window, oldest first, zeros included.
    pub time_series: Vec<TimeSeriesPoint>,
}
