#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for incident proximity, hotspot and analytics queries.
//!
//! Every command loads a snapshot file (`.csv` in the export layout,
//! anything else as a JSON array of incidents) and writes its result to
//! stdout. Set `RUST_LOG=debug` to see query and clustering details.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use incident_map_analytics::{IncidentFilter, Timeframe, apply_filter, export_csv, summarize};
use incident_map_hotspot::{HotspotConfig, compute_hotspots, hotspots_to_geojson, rank_hotspots};
use incident_map_incident_models::{Coordinates, IncidentStatus, IncidentType};
use incident_map_store::{MemoryStore, find_nearby_in_store};

/// Radius used by `nearby` when none is given, in meters.
const DEFAULT_NEARBY_RADIUS_METERS: f64 = 2_000.0;

#[derive(Parser)]
#[command(name = "incident_map", about = "Incident proximity and hotspot tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List incidents within a radius of a point, most recent first
    Nearby {
        /// Incident snapshot (JSON array or CSV export)
        #[arg(long)]
        input: PathBuf,
        /// Latitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search center
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters
        #[arg(long, default_value_t = DEFAULT_NEARBY_RADIUS_METERS)]
        radius: f64,
    },
    /// Cluster incidents into hotspots, most severe first
    Hotspots {
        /// Incident snapshot (JSON array or CSV export)
        #[arg(long)]
        input: PathBuf,
        /// TOML file with clustering parameters
        #[arg(long)]
        config: Option<PathBuf>,
        /// Linking distance in meters (overrides the config file)
        #[arg(long)]
        threshold: Option<f64>,
        /// Minimum incidents per hotspot (overrides the config file)
        #[arg(long)]
        min_size: Option<usize>,
        /// Emit a `GeoJSON` `FeatureCollection` instead of plain JSON
        #[arg(long)]
        geojson: bool,
    },
    /// Print dashboard statistics
    Summary {
        /// Incident snapshot (JSON array or CSV export)
        #[arg(long)]
        input: PathBuf,
        /// Window for the time series: week, month or year
        #[arg(long, default_value = "week", value_parser = parse_catalog::<Timeframe>)]
        timeframe: Timeframe,
    },
    /// Export incidents as CSV
    Export {
        /// Incident snapshot (JSON array or CSV export)
        #[arg(long)]
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Keep only this status (e.g. "pending")
        #[arg(long, value_parser = parse_catalog::<IncidentStatus>)]
        status: Option<IncidentStatus>,
        /// Keep only this type (e.g. "theft")
        #[arg(long = "type", value_parser = parse_catalog::<IncidentType>)]
        incident_type: Option<IncidentType>,
        /// Case-insensitive text search over title, description and address
        #[arg(long)]
        search: Option<String>,
    },
}

/// Parses a lowercase catalog name such as `theft` or `month`.
fn parse_catalog<T>(value: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| format!("{value}: {e}"))
}

fn load(path: &Path) -> Result<MemoryStore, Box<dyn std::error::Error>> {
    let store = MemoryStore::load_path(path)?;
    log::info!("Loaded {} incidents from {}", store.len(), path.display());
    Ok(store)
}

fn load_config(
    path: Option<&Path>,
    threshold: Option<f64>,
    min_size: Option<usize>,
) -> Result<HotspotConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => HotspotConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => HotspotConfig::default(),
    };

    if let Some(threshold) = threshold {
        config.distance_threshold_meters = threshold;
    }
    if let Some(min_size) = min_size {
        config.min_cluster_size = min_size;
    }
    config.validate()?;

    log::debug!("Hotspot config: {config:?}");
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Nearby {
            input,
            lat,
            lng,
            radius,
        } => {
            let store = load(&input)?;
            let center = Coordinates::new(lat, lng)?;
            let nearby = find_nearby_in_store(&store, center, radius)?;
            log::info!("{} incidents within {radius}m of ({lat}, {lng})", nearby.len());
            println!("{}", serde_json::to_string_pretty(&nearby)?);
        }
        Commands::Hotspots {
            input,
            config,
            threshold,
            min_size,
            geojson,
        } => {
            let store = load(&input)?;
            let config = load_config(config.as_deref(), threshold, min_size)?;

            let mut hotspots = compute_hotspots(store.incidents(), &config);
            rank_hotspots(&mut hotspots);
            log::info!("Found {} hotspots", hotspots.len());

            if geojson {
                println!("{}", serde_json::to_string_pretty(&hotspots_to_geojson(&hotspots))?);
            } else {
                println!("{}", serde_json::to_string_pretty(&hotspots)?);
            }
        }
        Commands::Summary { input, timeframe } => {
            let store = load(&input)?;
            let all: Vec<_> = store.incidents().iter().collect();
            let summary = summarize(&all, timeframe, chrono::Utc::now());
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Export {
            input,
            output,
            status,
            incident_type,
            search,
        } => {
            let store = load(&input)?;
            let filter = IncidentFilter {
                status,
                incident_type,
                search,
            };
            let selected = apply_filter(store.incidents(), &filter);

            let written = if let Some(path) = output {
                let file = std::fs::File::create(&path)?;
                let written = export_csv(selected, std::io::BufWriter::new(file))?;
                log::info!("Wrote {}", path.display());
                written
            } else {
                export_csv(selected, std::io::stdout().lock())?
            };
            log::info!("Exported {written} incidents");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_coordinates_and_default_radius() {
        let cli = Cli::try_parse_from([
            "incident_map",
            "nearby",
            "--input",
            "incidents.json",
            "--lat",
            "-33.9",
            "--lng",
            "-80.8",
        ])
        .unwrap();

        match cli.command {
            Commands::Nearby { lat, lng, radius, .. } => {
                assert!((lat - -33.9).abs() < f64::EPSILON);
                assert!((lng - -80.8).abs() < f64::EPSILON);
                assert!((radius - DEFAULT_NEARBY_RADIUS_METERS).abs() < f64::EPSILON);
            }
            _ => panic!("expected nearby"),
        }
    }

    #[test]
    fn parses_catalog_filters() {
        let cli = Cli::try_parse_from([
            "incident_map",
            "export",
            "--input",
            "incidents.csv",
            "--status",
            "resolved",
            "--type",
            "theft",
        ])
        .unwrap();

        match cli.command {
            Commands::Export {
                status,
                incident_type,
                ..
            } => {
                assert_eq!(status, Some(IncidentStatus::Resolved));
                assert_eq!(incident_type, Some(IncidentType::Theft));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn parses_timeframe_and_rejects_unknown_catalog_names() {
        let cli = Cli::try_parse_from([
            "incident_map",
            "summary",
            "--input",
            "incidents.json",
            "--timeframe",
            "year",
        ])
        .unwrap();
        match cli.command {
            Commands::Summary { timeframe, .. } => assert_eq!(timeframe, Timeframe::Year),
            _ => panic!("expected summary"),
        }

        for args in [
            ["incident_map", "summary", "--input", "x.json", "--timeframe", "decade"],
            ["incident_map", "export", "--input", "x.json", "--type", "arson"],
            ["incident_map", "export", "--input", "x.json", "--status", "closed"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn flags_override_config_defaults() {
        let config = load_config(None, Some(750.0), Some(3)).unwrap();
        assert!((config.distance_threshold_meters - 750.0).abs() < f64::EPSILON);
        assert_eq!(config.min_cluster_size, 3);

        assert!(load_config(None, Some(-1.0), None).is_err());
    }
}
