#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident record types and the static incident catalogs.
//!
//! An [`Incident`] is a community report pinned to a latitude/longitude.
//! The type and status catalogs are closed enumerations carrying their
//! display metadata, so downstream crates only ever count discriminants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentType {
    /// Property taken without consent
    Theft,
    /// Physical attack or threat against a person
    Assault,
    /// Willful damage to property
    Vandalism,
    /// Unlawful entry into a building
    Burglary,
    /// Anything not covered above
    Other,
}

impl IncidentType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Assault => "Assault",
            Self::Vandalism => "Vandalism",
            Self::Burglary => "Burglary",
            Self::Other => "Other",
        }
    }

    /// Marker color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Theft => "#FF5733",
            Self::Assault => "#C70039",
            Self::Vandalism => "#FFC300",
            Self::Burglary => "#900C3F",
            Self::Other => "#581845",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Assault,
            Self::Vandalism,
            Self::Burglary,
            Self::Other,
        ]
    }
}

/// Moderation status of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentStatus {
    /// Newly reported, not yet reviewed
    #[default]
    Pending,
    /// Under review by an administrator
    Investigating,
    /// Closed as handled
    Resolved,
    /// Closed without action
    Dismissed,
}

impl IncidentStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Investigating => "Investigating",
            Self::Resolved => "Resolved",
            Self::Dismissed => "Dismissed",
        }
    }

    /// Badge color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "#FFC107",
            Self::Investigating => "#2196F3",
            Self::Resolved => "#4CAF50",
            Self::Dismissed => "#9E9E9E",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Investigating,
            Self::Resolved,
            Self::Dismissed,
        ]
    }
}

/// Error returned when a latitude/longitude pair is outside the WGS84 range
/// or not a finite number.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidCoordinatesError {
    /// Latitude outside `[-90, 90]` (or NaN).
    #[error("invalid latitude {0}: expected -90 to 90")]
    Latitude(f64),
    /// Longitude outside `[-180, 180]` (or NaN).
    #[error("invalid longitude {0}: expected -180 to 180")]
    Longitude(f64),
}

/// A latitude/longitude pair in signed decimal degrees.
///
/// Deserialization goes through [`Coordinates::new`], so out-of-range pairs
/// are rejected. Struct literals are unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a validated coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinatesError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinatesError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

/// A community-reported incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Opaque unique identifier.
    pub id: String,
    /// Short headline.
    #[serde(default)]
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub description: String,
    /// Incident category.
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    /// Moderation status.
    #[serde(default)]
    pub status: IncidentStatus,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Street address, when the reporter supplied one.
    #[serde(default)]
    pub address: Option<String>,
    /// Public URL of an attached photo.
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the report was filed.
    pub created_at: DateTime<Utc>,
    /// When the report was last modified (status changes included).
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Reporting user.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Incident {
    /// The incident's position.
    ///
    /// Does not validate; use [`Incident::validate`] on untrusted records.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Checks that the record carries usable coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the latitude or longitude is out of range.
    pub fn validate(&self) -> Result<Coordinates, InvalidCoordinatesError> {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Column names of the tabular incident layout, in order.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Title",
    "Type",
    "Status",
    "Latitude",
    "Longitude",
    "Address",
    "Created At",
    "Updated At",
];

/// One row of the tabular incident layout used for CSV export and import.
///
/// Description, image and reporter are not part of the layout and come back
/// empty after a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRow {
    /// Opaque unique identifier.
    #[serde(rename = "ID")]
    pub id: String,
    /// Short headline.
    #[serde(rename = "Title")]
    pub title: String,
    /// Incident category.
    #[serde(rename = "Type")]
    pub incident_type: IncidentType,
    /// Moderation status.
    #[serde(rename = "Status")]
    pub status: IncidentStatus,
    /// Latitude (WGS84).
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    /// Longitude (WGS84).
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Street address; an empty cell reads back as `None`.
    #[serde(rename = "Address")]
    pub address: Option<String>,
    /// When the report was filed (RFC 3339).
    #[serde(rename = "Created At")]
    pub created_at: DateTime<Utc>,
    /// When the report was last modified (RFC 3339), if ever.
    #[serde(rename = "Updated At")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Incident> for IncidentRow {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id.clone(),
            title: incident.title.clone(),
            incident_type: incident.incident_type,
            status: incident.status,
            latitude: incident.latitude,
            longitude: incident.longitude,
            address: incident.address.clone(),
            created_at: incident.created_at,
            updated_at: incident.updated_at,
        }
    }
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: String::new(),
            incident_type: row.incident_type,
            status: row.status,
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address.filter(|a| !a.is_empty()),
            image_url: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user_id: None,
        }
    }
}
