#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident snapshot sources.
//!
//! The proximity and hotspot engines are pure functions over slices; this
//! crate is where those slices come from. [`IncidentStore`] is the seam a
//! persistent backend plugs into, and [`MemoryStore`] is the file-backed
//! implementation used by the CLI and tests.

use std::io::Read;
use std::path::Path;

use incident_map_incident_models::{Coordinates, Incident, IncidentRow, InvalidCoordinatesError};
use incident_map_spatial::{BoundingBox, is_within_radius};

/// Errors that can occur while loading or querying a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record carried unusable coordinates.
    #[error("Invalid record {id}: {source}")]
    InvalidRecord {
        /// Identifier of the offending record.
        id: String,
        /// Why its coordinates were rejected.
        source: InvalidCoordinatesError,
    },
}

/// A source of incident snapshots.
///
/// Both methods return incidents sorted by `created_at`, most recent first.
pub trait IncidentStore {
    /// Coarse range query: every incident whose position lies inside `bbox`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn fetch_in_bounds(&self, bbox: &BoundingBox) -> Result<Vec<Incident>, StoreError>;

    /// Every stored incident.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn fetch_all(&self) -> Result<Vec<Incident>, StoreError>;
}

/// An in-memory snapshot of validated incidents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    incidents: Vec<Incident>,
}

impl MemoryStore {
    /// Builds a store from already-parsed incidents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] for the first incident with
    /// out-of-range coordinates.
    pub fn new(mut incidents: Vec<Incident>) -> Result<Self, StoreError> {
        for incident in &incidents {
            incident
                .validate()
                .map_err(|source| StoreError::InvalidRecord {
                    id: incident.id.clone(),
                    source,
                })?;
        }

        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Self { incidents })
    }

    /// Parses a JSON array of incidents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the input is not a valid incident array or
    /// a record fails validation.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, StoreError> {
        let incidents: Vec<Incident> = serde_json::from_reader(reader)?;
        log::info!("Parsed {} incidents from JSON", incidents.len());
        Self::new(incidents)
    }

    /// Parses incidents in the tabular export layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a row cannot be parsed or fails validation.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, StoreError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let incidents = csv_reader
            .deserialize::<IncidentRow>()
            .map(|row| row.map(Incident::from))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Parsed {} incidents from CSV", incidents.len());
        Self::new(incidents)
    }

    /// Loads a file, picking the format from its extension: `.csv` is read
    /// as CSV, anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn load_path(path: &Path) -> Result<Self, StoreError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);

        log::debug!("Loading incidents from {}", path.display());

        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            Self::from_csv_reader(reader)
        } else {
            Self::from_json_reader(reader)
        }
    }

    /// The snapshot, most recent first.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of stored incidents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

impl IncidentStore for MemoryStore {
    fn fetch_in_bounds(&self, bbox: &BoundingBox) -> Result<Vec<Incident>, StoreError> {
        Ok(self
            .incidents
            .iter()
            .filter(|incident| bbox.contains(incident.latitude, incident.longitude))
            .cloned()
            .collect())
    }

    fn fetch_all(&self) -> Result<Vec<Incident>, StoreError> {
        Ok(self.incidents.clone())
    }
}

/// Incidents within `radius_meters` of `center`, most recent first.
///
/// The store answers the bounding-box range query; the exact haversine
/// filter runs here. A radius that is zero, negative or not finite returns
/// an empty list without querying the store.
///
/// # Errors
///
/// Returns [`StoreError`] if the store query fails.
pub fn find_nearby_in_store(
    store: &dyn IncidentStore,
    center: Coordinates,
    radius_meters: f64,
) -> Result<Vec<Incident>, StoreError> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        log::warn!("Ignoring nearby query with radius {radius_meters}");
        return Ok(Vec::new());
    }

    let bbox = BoundingBox::around(center, radius_meters);
    let candidates = store.fetch_in_bounds(&bbox)?;
    let candidate_count = candidates.len();

    let mut nearby: Vec<Incident> = candidates
        .into_iter()
        .filter(|incident| is_within_radius(center, radius_meters, incident))
        .collect();
    nearby.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    log::debug!(
        "Store query around ({}, {}) r={radius_meters}: {candidate_count} candidates, {} within radius",
        center.latitude,
        center.longitude,
        nearby.len()
    );

    Ok(nearby)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use incident_map_incident_models::{IncidentStatus, IncidentType};

    use super::*;

    fn incident(id: &str, latitude: f64, longitude: f64, hours_ago: i64) -> Incident {
        let reference = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Incident {
            id: id.to_string(),
            title: format!("Report {id}"),
            description: String::new(),
            incident_type: IncidentType::Vandalism,
            status: IncidentStatus::Pending,
            latitude,
            longitude,
            address: None,
            image_url: None,
            created_at: reference - Duration::hours(hours_ago),
            updated_at: None,
            user_id: None,
        }
    }

    fn ids(incidents: &[Incident]) -> Vec<&str> {
        incidents.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn new_sorts_most_recent_first() {
        let store = MemoryStore::new(vec![
            incident("old", 35.6, -80.8, 48),
            incident("new", 35.6, -80.8, 1),
            incident("mid", 35.6, -80.8, 12),
        ])
        .unwrap();

        assert_eq!(ids(store.incidents()), vec!["new", "mid", "old"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn new_rejects_out_of_range_record() {
        let err = MemoryStore::new(vec![
            incident("ok", 35.6, -80.8, 1),
            incident("bad", 95.0, -80.8, 2),
        ])
        .unwrap_err();

        match err {
            StoreError::InvalidRecord { id, source } => {
                assert_eq!(id, "bad");
                assert!(matches!(source, InvalidCoordinatesError::Latitude(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nearby_is_exact_and_recency_sorted() {
        // ~555 m, ~1.1 km and ~3.3 km north of the center.
        let store = MemoryStore::new(vec![
            incident("near-old", 35.605, -80.8, 30),
            incident("near-new", 35.610, -80.8, 2),
            incident("far", 35.630, -80.8, 1),
        ])
        .unwrap();
        let center = Coordinates::new(35.6, -80.8).unwrap();

        let nearby = find_nearby_in_store(&store, center, 2000.0).unwrap();
        assert_eq!(ids(&nearby), vec!["near-new", "near-old"]);
    }

    #[test]
    fn nearby_with_bad_radius_is_empty() {
        let store = MemoryStore::new(vec![incident("a", 35.6, -80.8, 1)]).unwrap();
        let center = Coordinates::new(35.6, -80.8).unwrap();
        for radius in [0.0, -1.0, f64::NAN] {
            assert!(find_nearby_in_store(&store, center, radius).unwrap().is_empty());
        }
    }

    #[test]
    fn fetch_in_bounds_is_a_range_filter() {
        let store = MemoryStore::new(vec![
            incident("inside", 10.0, 10.0, 1),
            incident("outside", 20.0, 10.0, 2),
        ])
        .unwrap();

        let found = store
            .fetch_in_bounds(&BoundingBox::new(9.0, 9.0, 11.0, 11.0))
            .unwrap();
        assert_eq!(ids(&found), vec!["inside"]);
        assert_eq!(store.fetch_all().unwrap().len(), 2);
    }

    #[test]
    fn parses_json_array() {
        let json = r#"[
            {"id": "1", "type": "theft", "latitude": 35.6, "longitude": -80.8,
             "createdAt": "2024-01-01T00:00:00Z"},
            {"id": "2", "type": "assault", "status": "resolved", "latitude": 35.7,
             "longitude": -80.9, "createdAt": "2024-02-01T00:00:00Z",
             "updatedAt": "2024-02-02T00:00:00Z"}
        ]"#;

        let store = MemoryStore::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(ids(store.incidents()), vec!["2", "1"]);
        assert_eq!(store.incidents()[0].status, IncidentStatus::Resolved);
    }

    #[test]
    fn parses_csv_export_layout() {
        let csv = "\
ID,Title,Type,Status,Latitude,Longitude,Address,Created At,Updated At
a,Broken window,vandalism,pending,35.6,-80.8,\"12 Main St, Apt 4\",2024-01-01T08:00:00Z,
b,Stolen bike,theft,resolved,35.61,-80.81,,2024-01-02T08:00:00Z,2024-01-03T08:00:00Z
";

        let store = MemoryStore::from_csv_reader(csv.as_bytes()).unwrap();
        let incidents = store.incidents();
        assert_eq!(ids(incidents), vec!["b", "a"]);
        assert_eq!(incidents[0].incident_type, IncidentType::Theft);
        assert!(incidents[0].address.is_none());
        assert!(incidents[0].updated_at.is_some());
        assert_eq!(incidents[1].address.as_deref(), Some("12 Main St, Apt 4"));
        assert!(incidents[1].updated_at.is_none());
    }

    #[test]
    fn csv_with_unknown_type_fails() {
        let csv = "\
ID,Title,Type,Status,Latitude,Longitude,Address,Created At,Updated At
a,Fire,arson,pending,35.6,-80.8,,2024-01-01T08:00:00Z,
";
        assert!(matches!(
            MemoryStore::from_csv_reader(csv.as_bytes()),
            Err(StoreError::Csv(_))
        ));
    }
}
