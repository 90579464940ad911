// src/models/stats_models.rs

use chrono::{DateTime, Utc};
use log::info;
use std::collections::BTreeMap;
use std::time::Duration;

use super::resolution::StrategyLabel;

/// Counters for one batch resolution run.
#[derive(Debug, Clone)]
pub struct BatchStats {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub lines_read: usize,
    pub complaints_resolved: usize,
    pub malformed_lines: usize,
    pub failed_tasks: usize,
    pub strategy_counts: BTreeMap<String, usize>,
    pub processing_time: Duration,
}

impl BatchStats {
    pub fn new(run_id: String, started_at: DateTime<Utc>) -> Self {
        let strategy_counts = StrategyLabel::ALL
            .iter()
            .map(|label| (label.as_str().to_string(), 0))
            .collect();
        Self {
            run_id,
            started_at,
            lines_read: 0,
            complaints_resolved: 0,
            malformed_lines: 0,
            failed_tasks: 0,
            strategy_counts,
            processing_time: Duration::default(),
        }
    }

    pub fn record_strategy(&mut self, label: StrategyLabel) {
        self.complaints_resolved += 1;
        *self
            .strategy_counts
            .entry(label.as_str().to_string())
            .or_insert(0) += 1;
    }

    pub fn count_for(&self, label: StrategyLabel) -> usize {
        self.strategy_counts.get(label.as_str()).copied().unwrap_or(0)
    }

    pub fn log_summary(&self) {
        info!(
            "Batch {} (started {}) complete in {:.2?}: {} lines read, {} resolved, {} malformed, {} failed",
            self.run_id,
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.processing_time,
            self.lines_read,
            self.complaints_resolved,
            self.malformed_lines,
            self.failed_tasks
        );
        for (label, count) in &self.strategy_counts {
            info!("   {}: {}", label, count);
        }
    }
}
