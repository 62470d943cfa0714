//! CSV export in the tabular incident layout.

use std::io::Write;

use incident_map_incident_models::{CSV_HEADER, Incident, IncidentRow};

use crate::AnalyticsError;

/// Writes `incidents` as CSV, header first, in input order.
///
/// The header is written even when there are no incidents.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if writing to `writer` fails.
pub fn export_csv<'a>(
    incidents: impl IntoIterator<Item = &'a Incident>,
    writer: impl Write,
) -> Result<u64, AnalyticsError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    let mut written = 0u64;
    for incident in incidents {
        csv_writer.serialize(IncidentRow::from(incident))?;
        written += 1;
    }
    csv_writer.flush()?;

    log::info!("Exported {written} incidents to CSV");

    Ok(written)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use incident_map_incident_models::{IncidentStatus, IncidentType};

    use super::*;

    #[test]
    fn writes_header_and_quoted_rows() {
        let incident = Incident {
            id: "abc".to_string(),
            title: "Car broken into, window smashed".to_string(),
            description: "ignored".to_string(),
            incident_type: IncidentType::Burglary,
            status: IncidentStatus::Investigating,
            latitude: 35.6,
            longitude: -80.8,
            address: None,
            image_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap(),
            updated_at: None,
            user_id: None,
        };

        let mut out = Vec::new();
        let written = export_csv([&incident], &mut out).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "ID,Title,Type,Status,Latitude,Longitude,Address,Created At,Updated At"
        );
        assert_eq!(
            lines[1],
            "abc,\"Car broken into, window smashed\",burglary,investigating,35.6,-80.8,,2024-05-06T07:08:09Z,"
        );
    }

    #[test]
    fn empty_export_still_has_header() {
        let mut out = Vec::new();
        assert_eq!(export_csv(std::iter::empty(), &mut out).unwrap(), 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
