//! Batch battle runner for balance sweeps.
//!
//! Runs the same scenario across a range of seeds in parallel with
//! rayon and aggregates outcome statistics. Each battle is itself
//! single-threaded; parallelism lives entirely at the batch level.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metrics::BattleMetrics;
use crate::runner::run_scenario;
use crate::scenario::Scenario;

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Scenario to sweep.
    pub scenario: Scenario,
    /// Number of battles to run.
    pub count: u32,
    /// First seed; battle `i` uses `seed_start + i`.
    pub seed_start: u64,
}

impl BatchConfig {
    /// Sweep a scenario across `count` consecutive seeds.
    #[must_use]
    pub fn new(scenario: Scenario, count: u32) -> Self {
        Self {
            scenario,
            count,
            seed_start: 0,
        }
    }
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Battles run.
    pub games: u32,
    /// Player victories.
    pub victories: u32,
    /// Player defeats.
    pub defeats: u32,
    /// Draws (simultaneous annihilation).
    pub draws: u32,
    /// Runs that hit the tick budget.
    pub timeouts: u32,
    /// Mean final score.
    pub average_score: f64,
    /// Mean battle length in ticks.
    pub average_duration_ticks: f64,
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// Individual battle metrics, in seed order.
    pub games: Vec<BattleMetrics>,
    /// Aggregate summary.
    pub summary: BatchSummary,
}

/// Run a batch of battles in parallel.
#[must_use]
pub fn run_batch(config: &BatchConfig) -> BatchResults {
    info!(
        scenario = %config.scenario.name,
        count = config.count,
        seed_start = config.seed_start,
        "Starting batch run"
    );

    let games: Vec<BattleMetrics> = (0..config.count)
        .into_par_iter()
        .map(|i| {
            let mut scenario = config.scenario.clone();
            scenario.seed = config.seed_start + u64::from(i);
            run_scenario(&scenario)
        })
        .collect();

    let summary = summarize(&games);
    info!(
        victories = summary.victories,
        defeats = summary.defeats,
        draws = summary.draws,
        timeouts = summary.timeouts,
        "Batch complete"
    );

    BatchResults {
        config: config.clone(),
        games,
        summary,
    }
}

/// Aggregate per-battle metrics into a summary.
#[must_use]
pub fn summarize(games: &[BattleMetrics]) -> BatchSummary {
    let mut summary = BatchSummary {
        games: games.len() as u32,
        ..BatchSummary::default()
    };

    for game in games {
        match game.outcome.as_deref() {
            Some("victory") => summary.victories += 1,
            Some("defeat") => summary.defeats += 1,
            Some("draw") => summary.draws += 1,
            _ => summary.timeouts += 1,
        }
    }

    if !games.is_empty() {
        let count = games.len() as f64;
        summary.average_score = games.iter().map(|g| f64::from(g.score)).sum::<f64>() / count;
        summary.average_duration_ticks =
            games.iter().map(|g| g.duration_ticks as f64).sum::<f64>() / count;
    }

    summary
}

/// Write batch results to a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn write_results(results: &BatchResults, path: &Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}
