//! Haversine great-circle distance on a spherical Earth.
//!
//! Ignores ellipsoidal flattening. At the sub-100 km scales incidents are
//! compared over, the error against a geodesic is well under a percent.

use incident_map_incident_models::Coordinates;

/// Mean Earth radius used for all distance calculations, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Unit a distance is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceUnit {
    /// Meters (radius queries, hotspot radii).
    #[default]
    Meters,
    /// Kilometers.
    Kilometers,
}

impl DistanceUnit {
    /// Earth radius expressed in this unit.
    #[must_use]
    pub const fn earth_radius(self) -> f64 {
        match self {
            Self::Meters => EARTH_RADIUS_METERS,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// Great-circle distance in meters between two points given in degrees.
#[must_use]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_METERS * central_angle(lat1, lon1, lat2, lon2)
}

/// Great-circle distance in kilometers between two points given in degrees.
#[must_use]
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    EARTH_RADIUS_KM * central_angle(lat1, lon1, lat2, lon2)
}

/// Great-circle distance between two coordinate pairs in the given unit.
#[must_use]
pub fn distance_between(a: Coordinates, b: Coordinates, unit: DistanceUnit) -> f64 {
    unit.earth_radius() * central_angle(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Angle subtended at the sphere's center, in radians.
fn central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for antipodal points.
    let a = a.min(1.0);

    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}
