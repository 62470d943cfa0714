//! Dashboard summary statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use incident_map_analytics_models::{
    AnalyticsSummary, StatusCount, TimeGranularity, TimeSeriesPoint, Timeframe, TypeCount,
};
use incident_map_incident_models::{Incident, IncidentStatus, IncidentType};

/// Computes dashboard statistics for `incidents`.
///
/// Totals and breakdowns cover the whole snapshot. The series covers the
/// `timeframe` days ending on `now`'s date, bucketed by day for a week, by
/// seven-day span for a month and by calendar month for a year. Quiet
/// buckets are reported as zeros.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    incidents: &[&Incident],
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let total = incidents.len() as u64;

    let resolved: Vec<&Incident> = incidents
        .iter()
        .copied()
        .filter(|i| i.status == IncidentStatus::Resolved)
        .collect();

    let resolution_rate = if total == 0 {
        0.0
    } else {
        resolved.len() as f64 / total as f64 * 100.0
    };

    let durations: Vec<f64> = resolved
        .iter()
        .filter_map(|i| i.updated_at.map(|updated| updated - i.created_at))
        .filter(|elapsed| *elapsed >= Duration::zero())
        .map(|elapsed| elapsed.num_seconds() as f64 / 3600.0)
        .collect();

    let avg_resolution_hours = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    };

    let by_type = IncidentType::all()
        .iter()
        .map(|&incident_type| TypeCount {
            incident_type,
            count: incidents
                .iter()
                .filter(|i| i.incident_type == incident_type)
                .count() as u64,
        })
        .collect();

    let by_status = IncidentStatus::all()
        .iter()
        .map(|&status| StatusCount {
            status,
            count: incidents.iter().filter(|i| i.status == status).count() as u64,
        })
        .collect();

    let granularity = timeframe.granularity();
    let time_series = bucketed_series(incidents, timeframe, now.date_naive());

    log::info!(
        "Summarized {total} incidents: {:.1}% resolved, {} {granularity} bucket(s)",
        resolution_rate,
        time_series.len()
    );

    AnalyticsSummary {
        total_incidents: total,
        resolution_rate,
        avg_resolution_hours,
        by_type,
        by_status,
        timeframe,
        granularity,
        time_series,
    }
}

fn bucketed_series(
    incidents: &[&Incident],
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<TimeSeriesPoint> {
    let granularity = timeframe.granularity();
    let first_day = today - Duration::days(timeframe.days() - 1);
    let label = |day: NaiveDate| bucket_label(granularity, first_day, day);

    let mut buckets: BTreeMap<String, u64> = first_day
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| (label(day), 0))
        .collect();

    for incident in incidents {
        let day = incident.created_at.date_naive();
        if day < first_day || day > today {
            continue;
        }
        if let Some(count) = buckets.get_mut(&label(day)) {
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(period, count)| TimeSeriesPoint { period, count })
        .collect()
}

/// Labels sort chronologically as strings.
fn bucket_label(granularity: TimeGranularity, first_day: NaiveDate, day: NaiveDate) -> String {
    match granularity {
        TimeGranularity::Daily => day.format("%Y-%m-%d").to_string(),
        TimeGranularity::Weekly => {
            let offset = (day - first_day).num_days() / 7 * 7;
            (first_day + Duration::days(offset))
                .format("%Y-%m-%d")
                .to_string()
        }
        TimeGranularity::Monthly => day.format("%Y-%m").to_string(),
    }
}
