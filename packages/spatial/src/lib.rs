#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial primitives for incident proximity queries.
//!
//! Provides the haversine great-circle distance shared by the nearby filter
//! and the hotspot clusterer, the radius-to-bounding-box conversion used as
//! a cheap pre-filter, and two ways to run a radius query: a linear scan
//! over a slice ([`find_nearby`]) and an R-tree backed [`IncidentIndex`] for
//! repeated queries against one snapshot.

pub mod bbox;
pub mod distance;
pub mod nearby;

pub use bbox::{BoundingBox, METERS_PER_DEGREE_LATITUDE};
pub use distance::{
    DistanceUnit, EARTH_RADIUS_KM, EARTH_RADIUS_METERS, distance_between, haversine_distance,
    haversine_distance_km,
};
pub use nearby::{IncidentIndex, find_nearby, is_within_radius};
