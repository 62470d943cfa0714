//! Coordinate-range bounding boxes for the radius pre-filter.
//!
//! A box is always a superset of the circle it was built from: the flat
//! 111 km-per-degree approximation is widened to the exact spherical extent
//! when that is larger, and longitude is left unbounded whenever the circle
//! touches a pole or the cosine correction degenerates.

use incident_map_incident_models::Coordinates;
use serde::{Deserialize, Serialize};

use crate::EARTH_RADIUS_METERS;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEGREE_LATITUDE: f64 = 111_000.0;

/// Below this, `cos(latitude)` is treated as zero.
const MIN_LONGITUDE_SCALE: f64 = 1e-12;

/// A geographic bounding box in WGS84 coordinates.
///
/// When `west > east` the box crosses the antimeridian and covers
/// `[west, 180] ∪ [-180, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: Self = Self::new(-180.0, -90.0, 180.0, 90.0);

    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Builds the pre-filter box for a circle of `radius_meters` around
    /// `center`.
    ///
    /// A negative or non-finite radius is treated as zero.
    #[must_use]
    pub fn around(center: Coordinates, radius_meters: f64) -> Self {
        let radius = if radius_meters.is_finite() {
            radius_meters.max(0.0)
        } else {
            0.0
        };

        let lat_delta = radius / METERS_PER_DEGREE_LATITUDE;
        let raw_south = center.latitude - lat_delta;
        let raw_north = center.latitude + lat_delta;
        let south = raw_south.max(-90.0);
        let north = raw_north.min(90.0);

        let cos_lat = center.latitude.to_radians().cos();
        if cos_lat < MIN_LONGITUDE_SCALE || raw_south <= -90.0 || raw_north >= 90.0 {
            return Self::new(-180.0, south, 180.0, north);
        }

        let Some(lon_delta) = longitude_delta(radius, cos_lat) else {
            return Self::new(-180.0, south, 180.0, north);
        };

        let mut west = center.longitude - lon_delta;
        let mut east = center.longitude + lon_delta;
        if west < -180.0 {
            west += 360.0;
        }
        if east > 180.0 {
            east -= 360.0;
        }

        Self::new(west, south, east, north)
    }

    /// Whether this box wraps across the ±180° meridian.
    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Whether the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if latitude < self.south || latitude > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            longitude >= self.west || longitude <= self.east
        } else {
            longitude >= self.west && longitude <= self.east
        }
    }

    /// Splits a wrapping box into its two non-wrapping halves. A box that
    /// does not wrap is returned as-is.
    #[must_use]
    pub fn parts(&self) -> Vec<Self> {
        if self.crosses_antimeridian() {
            vec![
                Self::new(self.west, self.south, 180.0, self.north),
                Self::new(-180.0, self.south, self.east, self.north),
            ]
        } else {
            vec![*self]
        }
    }
}

/// Longitude half-width in degrees, or `None` when the box should span all
/// longitudes.
fn longitude_delta(radius: f64, cos_lat: f64) -> Option<f64> {
    let approx = radius / (METERS_PER_DEGREE_LATITUDE * cos_lat);

    // Exact half-width of a spherical cap: asin(sin δ / cos φ).
    let angle = radius / EARTH_RADIUS_METERS;
    if angle >= std::f64::consts::FRAC_PI_2 {
        return None;
    }
    let ratio = angle.sin() / cos_lat;
    if ratio >= 1.0 {
        return None;
    }
    let exact = ratio.asin().to_degrees();

    let delta = approx.max(exact);
    if !delta.is_finite() || delta >= 180.0 {
        return None;
    }
    Some(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance;
    use crate::test_support::destination;

    fn coords(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn uses_111_km_per_degree_at_mid_latitudes() {
        let bbox = BoundingBox::around(coords(35.6, -80.8), 2000.0);
        let lat_delta = 2000.0 / 111_000.0;
        let lon_delta = 2000.0 / (111_000.0 * 35.6_f64.to_radians().cos());

        assert!((bbox.north - (35.6 + lat_delta)).abs() < 1e-12);
        assert!((bbox.south - (35.6 - lat_delta)).abs() < 1e-12);
        assert!((bbox.east - (-80.8 + lon_delta)).abs() < 1e-9);
        assert!((bbox.west - (-80.8 - lon_delta)).abs() < 1e-9);
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn polar_center_spans_all_longitudes() {
        for lat in [90.0, -90.0, 89.999_999] {
            let bbox = BoundingBox::around(coords(lat, 12.0), 500.0);
            assert!((bbox.west - -180.0).abs() < f64::EPSILON);
            assert!((bbox.east - 180.0).abs() < f64::EPSILON);
            assert!(bbox.south.is_finite() && bbox.north.is_finite());
            assert!(bbox.north <= 90.0 && bbox.south >= -90.0);
        }
    }

    #[test]
    fn wraps_across_the_antimeridian() {
        let bbox = BoundingBox::around(coords(0.0, 179.99), 5000.0);
        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(0.0, 179.999));
        assert!(bbox.contains(0.0, -179.99));
        assert!(!bbox.contains(0.0, 0.0));
        assert_eq!(bbox.parts().len(), 2);
    }

    #[test]
    fn degenerate_radius_collapses_to_point() {
        for radius in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let bbox = BoundingBox::around(coords(10.0, 20.0), radius);
            assert!(bbox.contains(10.0, 20.0));
            assert!(!bbox.contains(10.001, 20.0));
        }
    }

    #[test]
    fn box_is_superset_of_circle() {
        let centers = [
            (35.6, -80.8),
            (0.0, 0.0),
            (60.0, 25.0),
            (-45.0, 170.0),
            (0.0, 179.99),
            (80.0, -179.9),
            (89.95, 0.0),
            (-89.95, 45.0),
        ];
        let radii = [10.0, 500.0, 2_000.0, 25_000.0, 150_000.0, 900_000.0];

        for &(lat, lon) in &centers {
            for &radius in &radii {
                let bbox = BoundingBox::around(coords(lat, lon), radius);
                for bearing in (0..360).step_by(5) {
                    let (plat, plon) =
                        destination(lat, lon, f64::from(bearing), radius * 0.999_999);
                    if haversine_distance(lat, lon, plat, plon) <= radius {
                        assert!(
                            bbox.contains(plat, plon),
                            "center ({lat},{lon}) r={radius} bearing={bearing}: \
                             ({plat},{plon}) outside {bbox:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn world_contains_everything() {
        assert!(BoundingBox::WORLD.contains(90.0, 180.0));
        assert!(BoundingBox::WORLD.contains(-90.0, -180.0));
        assert!(!BoundingBox::WORLD.crosses_antimeridian());
    }
}
