// src/main.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use complaint_lib::batch::run_batch_resolution;
use complaint_lib::corpus::snapshot::load_snapshot;
use complaint_lib::models::{ComplaintConditions, IncomingComplaint};
use complaint_lib::utils::engine_config::EngineConfig;
use complaint_lib::utils::env::load_env;
use complaint_lib::utils::progress_config::ProgressConfig;
use complaint_lib::ResolutionEngine;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Corpus snapshot path (overrides CORPUS_SNAPSHOT_PATH)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a single complaint and print the resolution as JSON
    Resolve {
        #[arg(long)]
        complaint: String,
        #[arg(long)]
        msisdn: Option<String>,
        #[arg(long)]
        device_settings: Option<String>,
        #[arg(long)]
        signal_strength: Option<String>,
        #[arg(long)]
        quality_of_signal: Option<String>,
        #[arg(long)]
        site_kpi_alarm: Option<String>,
        #[arg(long)]
        past_data_analysis: Option<String>,
        #[arg(long)]
        indoor_outdoor_coverage: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
    },
    /// Resolve every complaint in a JSON Lines file
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Report the nearest site and the sites around a point
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    load_env();

    let cli = Cli::parse();
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let start_time = Instant::now();
    let config = EngineConfig::from_env();
    config.log_config();

    let snapshot_path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.snapshot_path));
    let corpus = load_snapshot(&snapshot_path)
        .await
        .context("Cannot start without a corpus snapshot")?;
    let max_concurrent = config.max_concurrent_resolutions;
    let engine = Arc::new(ResolutionEngine::new(corpus, config));
    info!("🚀 Resolution engine ready in {:.2?}", start_time.elapsed());

    match cli.command {
        Command::Resolve {
            complaint,
            msisdn,
            device_settings,
            signal_strength,
            quality_of_signal,
            site_kpi_alarm,
            past_data_analysis,
            indoor_outdoor_coverage,
            location,
            lon,
            lat,
        } => {
            let incoming = IncomingComplaint {
                msisdn,
                complaint,
                conditions: ComplaintConditions {
                    device_settings,
                    signal_strength,
                    quality_of_signal,
                    site_kpi_alarm,
                    past_data_analysis,
                    indoor_outdoor_coverage,
                    location_name: location,
                    longitude: lon,
                    latitude: lat,
                },
            };
            let resolution = engine.resolve(&incoming);
            info!("Resolved complaint with strategy {}", resolution.strategy);
            let output = serde_json::json!({
                "msisdn": incoming.msisdn,
                "resolution": resolution,
                "draft_solution": resolution.draft_solution(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialize resolution")?
            );
        }
        Command::Batch { input, output } => {
            let progress = ProgressConfig::from_env();
            let stats = run_batch_resolution(engine, &input, &output, &progress, max_concurrent)
                .await
                .context("Batch resolution failed")?;
            info!(
                "✅ Wrote {} resolutions to {}",
                stats.complaints_resolved,
                output.display()
            );
        }
        Command::Nearest { lat, lon } => {
            let Some(report) = engine.nearest_site(lat, lon) else {
                bail!("No site with usable coordinates near ({}, {})", lat, lon);
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize site report")?
            );
        }
    }

    Ok(())
}
