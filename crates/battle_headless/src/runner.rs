//! Real battle execution for headless runs.
//!
//! Builds a [`Battle`] from a [`Scenario`], auto-deploys the player
//! line on a left-edge grid, then drives the tick loop with the
//! scripted controller until the battle resolves or the tick budget
//! runs out.
//!
//! All loops are bounded and progress is logged at regular intervals,
//! so a stalled battle shows up in the logs instead of hanging CI.

use tracing::{debug, info, warn};

use battle_core::prelude::*;

use crate::metrics::BattleMetrics;
use crate::scenario::Scenario;

/// Grid spacing of the auto-deployed player line. Comfortably above the
/// minimum placement distance.
const DEPLOY_SPACING: i32 = 60;

/// Rows per deployment column.
const DEPLOY_ROWS: i32 = 10;

/// Ticks between progress log lines.
const PROGRESS_LOG_INTERVAL: u64 = 600;

/// Run one scenario to completion and collect its metrics.
///
/// # Panics
///
/// Panics if the scenario has no units at all, or if the deployment
/// grid cannot fit the composition (neither happens for compositions
/// that fit the budget).
#[must_use]
pub fn run_scenario(scenario: &Scenario) -> BattleMetrics {
    info!(
        scenario = %scenario.name,
        seed = scenario.seed,
        units = scenario.total_units(),
        max_ticks = scenario.max_ticks,
        "Starting headless battle"
    );

    let mut battle = build_battle(scenario);
    let mut total_hits: u64 = 0;

    let mut tick: u64 = 0;
    while tick < scenario.max_ticks {
        for command in scenario.script.commands(&battle, tick) {
            battle.enqueue(command);
        }

        let report = battle.tick();
        total_hits += report.hits.len() as u64;
        tick += 1;

        if tick % PROGRESS_LOG_INTERVAL == 0 {
            debug!(
                tick,
                player_units = battle.living_count(Team::Player),
                enemy_units = battle.living_count(Team::Enemy),
                "Battle progress"
            );
        }

        if let Some(outcome) = report.outcome {
            info!(?outcome, tick, score = battle.score(), "Battle resolved");
            break;
        }
    }

    if battle.outcome().is_none() {
        warn!(
            ticks = tick,
            player_units = battle.living_count(Team::Player),
            enemy_units = battle.living_count(Team::Enemy),
            "Battle hit the tick budget without resolving"
        );
    }

    BattleMetrics::collect(&scenario.name, scenario.seed, &battle, total_hits)
}

/// Build a combat-ready battle from a scenario.
fn build_battle(scenario: &Scenario) -> Battle {
    let mut battle = Battle::new(BattleConfig {
        seed: scenario.seed,
        ..BattleConfig::default()
    });

    let mut placements: Vec<Archetype> = Vec::new();
    for (archetype, count) in scenario.composition() {
        for _ in 0..count {
            if battle.add_to_army(archetype) {
                placements.push(archetype);
            } else {
                warn!(%archetype, "Budget exhausted, dropping unit from scenario");
            }
        }
    }

    battle
        .start_battle()
        .expect("scenario composition is non-empty");

    for (i, archetype) in placements.into_iter().enumerate() {
        let slot = i as i32;
        battle.enqueue(BattleCommand::PlaceUnit {
            archetype,
            position: Vec2Fixed::new(
                Fixed::from_num(100 + (slot / DEPLOY_ROWS) * DEPLOY_SPACING),
                Fixed::from_num(DEPLOY_SPACING + (slot % DEPLOY_ROWS) * DEPLOY_SPACING),
            ),
        });
    }
    let report = battle.tick();
    for rejection in &report.rejected {
        warn!(reason = %rejection.reason, "Auto-deployment placement rejected");
    }

    battle.start_combat().expect("grid deployment is complete");
    battle
}
