//! Display ordering and membership lookups for computed hotspots.

use std::cmp::Reverse;

use incident_map_hotspot_models::Hotspot;
use incident_map_incident_models::Incident;
use incident_map_spatial::find_nearby;

/// Sorts hotspots most severe first, breaking ties by incident count
/// (largest first). The sort is stable, so equal hotspots keep discovery
/// order.
pub fn rank_hotspots(hotspots: &mut [Hotspot]) {
    hotspots.sort_by_key(|hotspot| (Reverse(hotspot.risk_level), Reverse(hotspot.count)));
}

/// Incidents from `incidents` that fall inside the hotspot's circle.
///
/// This is a geometric lookup and can include incidents that were assigned
/// to a different hotspot, or to none.
#[must_use]
pub fn incidents_in_hotspot<'a>(hotspot: &Hotspot, incidents: &'a [Incident]) -> Vec<&'a Incident> {
    find_nearby(hotspot.center, hotspot.radius_meters, incidents)
}

#[cfg(test)]
mod tests {
    use incident_map_hotspot_models::{HotspotConfig, RiskLevel};
    use incident_map_incident_models::IncidentType;

    use super::*;
    use crate::compute_hotspots;
    use crate::test_support::{incident, north_of};

    fn cluster_at(prefix: &str, latitude: f64, size: u8, age: i64) -> Vec<Incident> {
        (0..size)
            .map(|k| {
                incident(
                    &format!("{prefix}{k}"),
                    north_of(latitude, f64::from(k) * 30.0),
                    -80.8,
                    age + i64::from(k),
                    IncidentType::Theft,
                )
            })
            .collect()
    }

    #[test]
    fn ranks_by_risk_then_count() {
        let mut incidents = cluster_at("small", 35.0, 2, 0);
        incidents.extend(cluster_at("huge", 35.1, 12, 100));
        incidents.extend(cluster_at("mid", 35.2, 4, 200));
        incidents.extend(cluster_at("pair", 35.3, 3, 300));

        let mut hotspots = compute_hotspots(&incidents, &HotspotConfig::default());
        assert_eq!(hotspots.len(), 4);
        rank_hotspots(&mut hotspots);

        let summary: Vec<(RiskLevel, usize)> =
            hotspots.iter().map(|h| (h.risk_level, h.count)).collect();
        assert_eq!(
            summary,
            vec![
                (RiskLevel::Critical, 12),
                (RiskLevel::Medium, 4),
                (RiskLevel::Low, 3),
                (RiskLevel::Low, 2),
            ]
        );
    }

    #[test]
    fn membership_lookup_uses_center_and_radius() {
        let incidents = cluster_at("c", 35.6, 3, 0);
        let hotspots = compute_hotspots(&incidents, &HotspotConfig::default());
        let hotspot = &hotspots[0];

        let mut others = incidents.clone();
        others.push(incident("stray", north_of(35.6, 100.0), -80.8, 90, IncidentType::Other));
        others.push(incident("distant", 36.0, -80.8, 90, IncidentType::Other));

        let inside: Vec<&str> = incidents_in_hotspot(hotspot, &others)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(inside, vec!["c0", "c1", "c2", "stray"]);
    }
}
