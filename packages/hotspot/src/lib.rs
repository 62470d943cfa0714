#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot detection over incident snapshots.
//!
//! [`compute_hotspots`] groups incidents by greedy single-pass linkage:
//! incidents are visited most recent first, and each unassigned incident
//! claims every other unassigned incident within the distance threshold.
//! The result depends on visit order, which is why the recency sort is
//! part of the contract. Hotspots are recomputed from scratch on every
//! call.

pub mod cluster;
pub mod export;
pub mod rank;

pub use cluster::compute_hotspots;
pub use export::hotspots_to_geojson;
pub use incident_map_hotspot_models::{
    Hotspot, HotspotConfig, HotspotConfigError, RiskBands, RiskLevel, ThresholdComparison,
};
pub use rank::{incidents_in_hotspot, rank_hotspots};
