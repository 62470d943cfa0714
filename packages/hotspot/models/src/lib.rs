#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot types, risk classification and clustering configuration.
//!
//! A [`Hotspot`] is derived data: it is rebuilt from the current incident
//! list on every clustering call and never persisted. [`HotspotConfig`]
//! holds every tunable of the clusterer and can be loaded from TOML.

use std::collections::BTreeMap;

use incident_map_incident_models::{Coordinates, Incident, IncidentType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default clustering distance threshold, in meters.
pub const DEFAULT_DISTANCE_THRESHOLD_METERS: f64 = 1_000.0;

/// Default minimum number of incidents for a cluster to count as a hotspot.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

/// Default floor for a hotspot's radius, in meters.
pub const DEFAULT_MIN_RADIUS_METERS: f64 = 300.0;

/// Ordinal risk classification of a hotspot, derived from its size.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// A handful of incidents
    Low,
    /// Noticeable concentration
    Medium,
    /// Dense concentration
    High,
    /// Very dense concentration
    Critical,
}

impl RiskLevel {
    /// Map color as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#4CAF50",
            Self::Medium => "#FFC107",
            Self::High => "#FF5722",
            Self::Critical => "#F44336",
        }
    }

    /// Returns all variants of this enum, lowest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Upper bounds (inclusive) of the LOW, MEDIUM and HIGH bands. Anything
/// above `high_max` is CRITICAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RiskBands {
    /// Largest count still classified LOW.
    pub low_max: usize,
    /// Largest count still classified MEDIUM.
    pub medium_max: usize,
    /// Largest count still classified HIGH.
    pub high_max: usize,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            low_max: 3,
            medium_max: 5,
            high_max: 10,
        }
    }
}

impl RiskBands {
    /// Creates validated risk bands.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are not non-decreasing.
    pub fn new(
        low_max: usize,
        medium_max: usize,
        high_max: usize,
    ) -> Result<Self, HotspotConfigError> {
        let bands = Self {
            low_max,
            medium_max,
            high_max,
        };
        bands.validate()?;
        Ok(bands)
    }

    /// Checks that the bounds are non-decreasing.
    ///
    /// # Errors
    ///
    /// Returns [`HotspotConfigError::RiskBands`] otherwise.
    pub fn validate(&self) -> Result<(), HotspotConfigError> {
        if self.low_max <= self.medium_max && self.medium_max <= self.high_max {
            Ok(())
        } else {
            Err(HotspotConfigError::RiskBands {
                low_max: self.low_max,
                medium_max: self.medium_max,
                high_max: self.high_max,
            })
        }
    }

    /// Classifies a hotspot of `count` incidents.
    #[must_use]
    pub const fn classify(&self, count: usize) -> RiskLevel {
        if count <= self.low_max {
            RiskLevel::Low
        } else if count <= self.medium_max {
            RiskLevel::Medium
        } else if count <= self.high_max {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

/// How a pair exactly at the distance threshold is treated.
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
pub enum ThresholdComparison {
    /// `distance < threshold`; ties are not linked.
    #[default]
    Exclusive,
    /// `distance <= threshold`; ties are linked.
    Inclusive,
}

impl ThresholdComparison {
    /// Whether a pair `distance` apart is linked under `threshold`.
    #[must_use]
    pub fn admits(self, distance: f64, threshold: f64) -> bool {
        match self {
            Self::Exclusive => distance < threshold,
            Self::Inclusive => distance <= threshold,
        }
    }
}

/// Tunables for the hotspot clusterer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotspotConfig {
    /// Maximum seed-to-member distance, in meters.
    pub distance_threshold_meters: f64,
    /// Smallest neighborhood that forms a hotspot.
    pub min_cluster_size: usize,
    /// Floor applied to every hotspot radius, in meters.
    pub min_radius_meters: f64,
    /// Tie handling at exactly the threshold.
    pub threshold: ThresholdComparison,
    /// Count-to-risk mapping.
    pub risk_bands: RiskBands,
}

impl Default for HotspotConfig {
    fn default() -> Self {
        Self {
            distance_threshold_meters: DEFAULT_DISTANCE_THRESHOLD_METERS,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            min_radius_meters: DEFAULT_MIN_RADIUS_METERS,
            threshold: ThresholdComparison::default(),
            risk_bands: RiskBands::default(),
        }
    }
}

impl HotspotConfig {
    /// Checks every field for a usable value.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), HotspotConfigError> {
        if !self.distance_threshold_meters.is_finite() || self.distance_threshold_meters <= 0.0 {
            return Err(HotspotConfigError::Threshold(
                self.distance_threshold_meters,
            ));
        }
        if self.min_cluster_size < 2 {
            return Err(HotspotConfigError::MinClusterSize(self.min_cluster_size));
        }
        if !self.min_radius_meters.is_finite() || self.min_radius_meters < 0.0 {
            return Err(HotspotConfigError::MinRadius(self.min_radius_meters));
        }
        self.risk_bands.validate()
    }

    /// Parses and validates a config from TOML. Missing fields take their
    /// defaults, so an empty document is the reference configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, HotspotConfigError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors from building or loading a [`HotspotConfig`].
#[derive(Debug, thiserror::Error)]
pub enum HotspotConfigError {
    /// Threshold is zero, negative or not finite.
    #[error("Invalid distance threshold {0}: expected a positive number of meters")]
    Threshold(f64),

    /// Minimum cluster size below 2.
    #[error("Invalid minimum cluster size {0}: expected at least 2")]
    MinClusterSize(usize),

    /// Minimum radius negative or not finite.
    #[error("Invalid minimum radius {0}: expected a non-negative number of meters")]
    MinRadius(f64),

    /// Risk bands out of order.
    #[error("Invalid risk bands {low_max}/{medium_max}/{high_max}: expected non-decreasing bounds")]
    RiskBands {
        /// LOW upper bound.
        low_max: usize,
        /// MEDIUM upper bound.
        medium_max: usize,
        /// HIGH upper bound.
        high_max: usize,
    },

    /// TOML parse failure.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A cluster of nearby incidents with derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Coordinate-wise mean of the member incidents.
    pub center: Coordinates,
    /// Members in discovery order.
    pub incidents: Vec<Incident>,
    /// Number of members.
    pub count: usize,
    /// Largest member distance from `center`, floored at the configured
    /// minimum, in meters.
    pub radius_meters: f64,
    /// Member tally per incident type.
    pub counts_by_type: BTreeMap<IncidentType, usize>,
    /// Classification of `count`.
    pub risk_level: RiskLevel,
}
