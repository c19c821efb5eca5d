//! Headless battle runner for CI verification and balance sweeps.
//!
//! Runs complete battles without graphics: a scripted controller stands
//! in for the human player, the enemy roster uses the core's tactical
//! AI, and each run produces JSON metrics. Batch mode sweeps many seeds
//! in parallel to collect outcome statistics.
//!
//! The [`leaderboard`] module hosts the asynchronous score store. It is
//! fire-and-forget from the simulation's perspective: submissions and
//! fetches never block or get blocked by the tick loop, and their
//! success or failure has no effect on simulation state.
//!
//! # Usage
//!
//! ```bash
//! # Run a single battle with the default skirmish scenario
//! cargo run -p battle_headless -- run
//!
//! # Run a scenario file with a fixed seed, metrics on stdout
//! cargo run -p battle_headless -- run --scenario scenarios/rush.ron --seed 7
//!
//! # Sweep 100 seeds in parallel and write aggregate results
//! cargo run -p battle_headless -- batch --count 100 --output results.json
//! ```

pub mod batch;
pub mod leaderboard;
pub mod metrics;
pub mod runner;
pub mod scenario;
pub mod strategies;
