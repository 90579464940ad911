// src/bin/nearest_site.rs
// Prints the nearest site and every site within the radius as JSON.
use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use complaint_lib::corpus::snapshot::load_snapshot;
use complaint_lib::matching::nearest_site::find_nearest_site;
use complaint_lib::utils::engine_config::EngineConfig;
use complaint_lib::utils::env::load_env;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct NearestSiteArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Nearby-site radius in km (overrides NEARBY_SITE_RADIUS_KM)
    #[arg(long)]
    radius_km: Option<f64>,

    /// Corpus snapshot path (overrides CORPUS_SNAPSHOT_PATH)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let args = NearestSiteArgs::parse();
    let config = EngineConfig::from_env();
    let radius_km = args.radius_km.unwrap_or(config.nearby_radius_km);
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| PathBuf::from(&config.snapshot_path));

    let corpus = load_snapshot(&snapshot_path).await?;
    info!(
        "Searching {} sites around ({}, {}) within {} km",
        corpus.locations().len(),
        args.lat,
        args.lon,
        radius_km
    );

    let output = match find_nearest_site(&corpus, args.lat, args.lon, radius_km) {
        Some(report) => serde_json::to_value(&report).context("Failed to serialize site report")?,
        None => {
            warn!("No site with usable coordinates in the snapshot");
            serde_json::json!({ "error": "No sites found" })
        }
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize output")?
    );
    Ok(())
}
