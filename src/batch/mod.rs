// src/batch/mod.rs
// Resolves a JSON Lines file of complaints concurrently and writes one result per line.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::matching::ResolutionEngine;
use crate::models::stats_models::BatchStats;
use crate::models::{IncomingComplaint, Resolution};
use crate::utils::get_memory_usage;
use crate::utils::progress_config::ProgressConfig;

/// One line of batch output. `line` is the 1-based input line number.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutputLine {
    pub line: usize,
    pub msisdn: Option<String>,
    pub resolution: Resolution,
    pub draft_solution: Option<String>,
}

/// Parses the input into `(line_number, complaint)` pairs. Blank lines are
/// ignored; malformed lines are counted and skipped.
fn parse_input(raw: &str, stats: &mut BatchStats) -> Vec<(usize, IncomingComplaint)> {
    let mut complaints = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines_read += 1;
        match serde_json::from_str::<IncomingComplaint>(line) {
            Ok(complaint) => complaints.push((line_number, complaint)),
            Err(e) => {
                stats.malformed_lines += 1;
                warn!("Skipping malformed line {}: {}", line_number, e);
            }
        }
    }
    complaints
}

pub async fn run_batch_resolution(
    engine: Arc<ResolutionEngine>,
    input: &Path,
    output: &Path,
    progress: &ProgressConfig,
    max_concurrent: usize,
) -> Result<BatchStats> {
    let start = Instant::now();
    let mut stats = BatchStats::new(Uuid::new_v4().to_string(), Utc::now());
    info!(
        "Batch {}: resolving {} with concurrency limit {}",
        stats.run_id,
        input.display(),
        max_concurrent
    );

    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read batch input {}", input.display()))?;
    let complaints = parse_input(&raw, &mut stats);

    let pb = progress.create_bar(complaints.len() as u64, "Resolving complaints")?;
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut tasks: Vec<JoinHandle<Result<BatchOutputLine>>> = Vec::with_capacity(complaints.len());

    for (line_number, complaint) in complaints {
        let engine = engine.clone();
        let semaphore = semaphore.clone();
        let pb = pb.clone();
        tasks.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .context("Failed to acquire semaphore permit for complaint resolution")?;
            let resolution = engine.resolve(&complaint);
            pb.inc(1);
            Ok(BatchOutputLine {
                line: line_number,
                msisdn: complaint.msisdn,
                draft_solution: resolution.draft_solution(),
                resolution,
            })
        }));
    }

    // join_all keeps spawn order, so output follows input order.
    let mut output_lines = Vec::with_capacity(tasks.len());
    for join_result in join_all(tasks).await {
        match join_result {
            Ok(Ok(line)) => {
                stats.record_strategy(line.resolution.strategy);
                output_lines.push(line);
            }
            Ok(Err(e)) => {
                stats.failed_tasks += 1;
                warn!("A resolution task returned an error: {:?}", e);
            }
            Err(e) => {
                stats.failed_tasks += 1;
                warn!("A resolution task panicked or was cancelled: {:?}", e);
            }
        }
    }

    if progress.should_show_memory() {
        let memory_mb = get_memory_usage().await;
        pb.finish_with_message(format!(
            "Resolved {} complaints (mem: {} MB)",
            output_lines.len(),
            memory_mb
        ));
    } else {
        pb.finish_with_message(format!("Resolved {} complaints", output_lines.len()));
    }

    let mut buffer = String::new();
    for line in &output_lines {
        buffer.push_str(
            &serde_json::to_string(line)
                .with_context(|| format!("Failed to serialize result for line {}", line.line))?,
        );
        buffer.push('\n');
    }
    tokio::fs::write(output, buffer)
        .await
        .with_context(|| format!("Failed to write batch output {}", output.display()))?;

    stats.processing_time = start.elapsed();
    stats.log_summary();
    Ok(stats)
}
