//! Headless battle runner binary.
//!
//! Runs battles without graphics for CI testing and balance sweeps.
//! Metrics go to stdout (or a file) as JSON; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use battle_headless::{
    batch::{run_batch, write_results, BatchConfig},
    runner::run_scenario,
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "battle_headless")]
#[command(about = "Headless battle runner for CI testing and balance sweeps")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single battle
    Run {
        /// Scenario file to load (defaults to the standard skirmish)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write metrics to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a batch of battles across consecutive seeds
    Batch {
        /// Scenario file to sweep (defaults to the standard skirmish)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of battles to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Starting seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output file for results
        #[arg(short, long, default_value = "batch_results.json")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            seed,
            output,
        } => {
            let mut scenario = load_scenario(scenario)?;
            if let Some(seed) = seed {
                scenario.seed = seed;
            }

            let metrics = run_scenario(&scenario);
            let json = serde_json::to_string_pretty(&metrics)?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
        }

        Commands::Batch {
            scenario,
            count,
            seed,
            output,
        } => {
            let scenario = load_scenario(scenario)?;
            let config = BatchConfig {
                scenario,
                count,
                seed_start: seed,
            };

            let results = run_batch(&config);
            write_results(&results, &output)?;

            let summary = &results.summary;
            println!(
                "{} games: {} victories, {} defeats, {} draws, {} timeouts",
                summary.games, summary.victories, summary.defeats, summary.draws, summary.timeouts
            );
            println!(
                "average score {:.0}, average duration {:.0} ticks",
                summary.average_score, summary.average_duration_ticks
            );
        }
    }

    Ok(())
}

fn load_scenario(path: Option<PathBuf>) -> Result<Scenario, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Scenario::load(path)?),
        None => Ok(Scenario::skirmish()),
    }
}
