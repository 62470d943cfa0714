//! `GeoJSON` rendering of hotspots for map layers.

use incident_map_hotspot_models::Hotspot;
use serde_json::Value;

/// Renders hotspots as a `FeatureCollection` of center points.
///
/// Each feature carries the radius, risk level, its map color and the
/// per-type tally so a client can draw a circle without refetching members.
#[must_use]
pub fn hotspots_to_geojson(hotspots: &[Hotspot]) -> Value {
    let features: Vec<Value> = hotspots
        .iter()
        .map(|hotspot| {
            let counts_by_type: serde_json::Map<String, Value> = hotspot
                .counts_by_type
                .iter()
                .map(|(incident_type, count)| (incident_type.to_string(), Value::from(*count)))
                .collect();
            let incident_ids: Vec<&str> =
                hotspot.incidents.iter().map(|i| i.id.as_str()).collect();

            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [hotspot.center.longitude, hotspot.center.latitude]
                },
                "properties": {
                    "count": hotspot.count,
                    "radiusMeters": hotspot.radius_meters,
                    "riskLevel": hotspot.risk_level.as_ref(),
                    "color": hotspot.risk_level.color(),
                    "countsByType": counts_by_type,
                    "incidentIds": incident_ids,
                }
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
