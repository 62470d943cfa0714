//! Radius queries over incident snapshots.
//!
//! Both entry points run the same two stages: a bounding-box pre-filter
//! ([`BoundingBox::around`]) followed by the exact haversine check
//! ([`is_within_radius`]). Only the second stage defines which incidents
//! are returned; the first only skips work.

use incident_map_incident_models::{Coordinates, Incident};
use rstar::{AABB, RTree, RTreeObject};

use crate::{BoundingBox, haversine_distance};

/// Exact containment test: is the incident within `radius_meters` of
/// `center` (inclusive)?
#[must_use]
pub fn is_within_radius(center: Coordinates, radius_meters: f64, incident: &Incident) -> bool {
    haversine_distance(
        center.latitude,
        center.longitude,
        incident.latitude,
        incident.longitude,
    ) <= radius_meters
}

/// Returns the incidents within `radius_meters` of `center`, in input order.
///
/// A radius that is zero, negative or not finite yields no matches.
#[must_use]
pub fn find_nearby(center: Coordinates, radius_meters: f64, incidents: &[Incident]) -> Vec<&Incident> {
    if !is_searchable(radius_meters) {
        return Vec::new();
    }

    let bbox = BoundingBox::around(center, radius_meters);
    let mut candidates = 0usize;

    let nearby: Vec<&Incident> = incidents
        .iter()
        .filter(|incident| bbox.contains(incident.latitude, incident.longitude))
        .inspect(|_| candidates += 1)
        .filter(|incident| is_within_radius(center, radius_meters, incident))
        .collect();

    log::debug!(
        "find_nearby({}, {}, r={radius_meters}): {} of {} in bbox, {} within radius",
        center.latitude,
        center.longitude,
        candidates,
        incidents.len(),
        nearby.len()
    );

    nearby
}

fn is_searchable(radius_meters: f64) -> bool {
    radius_meters.is_finite() && radius_meters > 0.0
}

/// An incident position stored in the R-tree, pointing back into the
/// snapshot slice.
struct IndexedIncident {
    position: usize,
    point: [f64; 2],
}

impl RTreeObject for IndexedIncident {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// R-tree over an immutable incident snapshot for repeated radius queries.
///
/// Points are stored as `[longitude, latitude]`.
pub struct IncidentIndex<'a> {
    incidents: &'a [Incident],
    tree: RTree<IndexedIncident>,
}

impl<'a> IncidentIndex<'a> {
    /// Bulk-loads an index over `incidents`.
    #[must_use]
    pub fn new(incidents: &'a [Incident]) -> Self {
        let entries = incidents
            .iter()
            .enumerate()
            .map(|(position, incident)| IndexedIncident {
                position,
                point: [incident.longitude, incident.latitude],
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!("Indexed {} incidents", tree.size());

        Self { incidents, tree }
    }

    /// Number of indexed incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Same contract as [`find_nearby`]: incidents within `radius_meters`
    /// of `center`, in snapshot order.
    #[must_use]
    pub fn find_nearby(&self, center: Coordinates, radius_meters: f64) -> Vec<&'a Incident> {
        if !is_searchable(radius_meters) {
            return Vec::new();
        }

        let bbox = BoundingBox::around(center, radius_meters);
        let mut positions: Vec<usize> = Vec::new();

        for part in bbox.parts() {
            let query_env = AABB::from_corners([part.west, part.south], [part.east, part.north]);
            for entry in self.tree.locate_in_envelope_intersecting(&query_env) {
                if let Some(incident) = self.incidents.get(entry.position)
                    && is_within_radius(center, radius_meters, incident)
                {
                    positions.push(entry.position);
                }
            }
        }

        positions.sort_unstable();
        positions.dedup();

        positions
            .into_iter()
            .filter_map(|position| self.incidents.get(position))
            .collect()
    }
}
