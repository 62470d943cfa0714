//! Greedy distance-threshold clustering.

use std::collections::BTreeMap;

use incident_map_hotspot_models::{Hotspot, HotspotConfig};
use incident_map_incident_models::{Coordinates, Incident};
use incident_map_spatial::haversine_distance;

/// Smallest member count any hotspot can have.
const MIN_HOTSPOT_SIZE: usize = 2;

/// Groups incidents into hotspots.
///
/// Incidents are stable-sorted by `created_at` descending. Each incident not
/// yet assigned seeds a neighborhood of every unassigned incident within
/// `config.distance_threshold_meters` of it (itself included). A
/// neighborhood of at least `config.min_cluster_size` becomes a hotspot and
/// its members are assigned; a smaller one is dropped and its seed stays
/// unassigned, available to later seeds.
///
/// A `min_cluster_size` below 2 is raised to 2, so a hotspot never has a
/// single member. A threshold that is not a positive finite number links
/// nothing, and the result is empty.
///
/// Members keep recency order. The output is deterministic for a given
/// input order but not transitive: members may end up farther than the
/// threshold from each other or from the center.
#[must_use]
pub fn compute_hotspots(incidents: &[Incident], config: &HotspotConfig) -> Vec<Hotspot> {
    let threshold = config.distance_threshold_meters;
    if !threshold.is_finite() || threshold <= 0.0 {
        log::warn!("Ignoring clustering request with distance threshold {threshold}");
        return Vec::new();
    }

    let mut ordered: Vec<&Incident> = incidents.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let min_size = config.min_cluster_size.max(MIN_HOTSPOT_SIZE);
    let mut assigned = vec![false; ordered.len()];
    let mut hotspots = Vec::new();

    for (seed_pos, seed) in ordered.iter().enumerate() {
        if assigned[seed_pos] {
            continue;
        }

        let members: Vec<usize> = ordered
            .iter()
            .enumerate()
            .filter(|(pos, candidate)| {
                !assigned[*pos] && (*pos == seed_pos || is_linked(seed, candidate, config))
            })
            .map(|(pos, _)| pos)
            .collect();

        if members.len() < min_size {
            log::trace!(
                "Seed {} has {} neighbor(s), below minimum {min_size}",
                seed.id,
                members.len(),
            );
            continue;
        }

        for &pos in &members {
            assigned[pos] = true;
        }

        let hotspot = build_hotspot(members.iter().map(|&pos| ordered[pos]), config);
        log::debug!(
            "Hotspot seeded by {}: {} incidents, center ({:.5}, {:.5}), radius {:.0}m, {}",
            seed.id,
            hotspot.count,
            hotspot.center.latitude,
            hotspot.center.longitude,
            hotspot.radius_meters,
            hotspot.risk_level
        );
        hotspots.push(hotspot);
    }

    log::debug!(
        "Clustered {} incidents into {} hotspot(s), {} unassigned",
        incidents.len(),
        hotspots.len(),
        assigned.iter().filter(|a| !**a).count()
    );

    hotspots
}

fn is_linked(seed: &Incident, candidate: &Incident, config: &HotspotConfig) -> bool {
    let distance = haversine_distance(
        seed.latitude,
        seed.longitude,
        candidate.latitude,
        candidate.longitude,
    );
    config
        .threshold
        .admits(distance, config.distance_threshold_meters)
}

/// Derives center, radius, type tally and risk level for a member list.
fn build_hotspot<'a>(
    members: impl IntoIterator<Item = &'a Incident>,
    config: &HotspotConfig,
) -> Hotspot {
    let incidents: Vec<Incident> = members.into_iter().cloned().collect();
    let count = incidents.len();
    let center = mean_center(&incidents);

    let radius_meters = incidents
        .iter()
        .map(|incident| {
            haversine_distance(
                center.latitude,
                center.longitude,
                incident.latitude,
                incident.longitude,
            )
        })
        .fold(config.min_radius_meters, f64::max);

    let mut counts_by_type = BTreeMap::new();
    for incident in &incidents {
        *counts_by_type.entry(incident.incident_type).or_insert(0) += 1;
    }

    Hotspot {
        center,
        incidents,
        count,
        radius_meters,
        counts_by_type,
        risk_level: config.risk_bands.classify(count),
    }
}

/// Coordinate-wise arithmetic mean. Callers never pass an empty slice.
#[allow(clippy::cast_precision_loss)]
fn mean_center(incidents: &[Incident]) -> Coordinates {
    let n = incidents.len().max(1) as f64;
    let (lat_sum, lon_sum) = incidents
        .iter()
        .fold((0.0, 0.0), |(lat, lon), incident| {
            (lat + incident.latitude, lon + incident.longitude)
        });

    Coordinates {
        latitude: lat_sum / n,
        longitude: lon_sum / n,
    }
}
