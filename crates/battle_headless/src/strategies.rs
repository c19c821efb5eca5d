//! Scripted player controllers.
//!
//! The core only moves player units on command, so a headless run needs
//! a stand-in for the human: without one the line never advances and a
//! kiting enemy can stall the battle forever. Scripts issue regular
//! battle commands on the same cadence as the enemy AI - they get no
//! privileged access to simulation state.

use serde::{Deserialize, Serialize};

use battle_core::prelude::*;

/// Ticks between scripted command batches.
pub const SCRIPT_INTERVAL: u64 = 30;

/// Available player scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptKind {
    /// Issue nothing; units fight only what walks into range.
    HoldGround,
    /// March the whole line at the enemy's center of mass.
    Advance,
    /// Concentrate the whole line on the weakest living enemy.
    FocusFire,
}

impl ScriptKind {
    /// Commands to issue this tick (empty off the cadence).
    #[must_use]
    pub fn commands(self, battle: &Battle, tick: u64) -> Vec<BattleCommand> {
        if tick % SCRIPT_INTERVAL != 0 {
            return Vec::new();
        }

        let ids: Vec<UnitId> = battle
            .units()
            .iter()
            .filter(|u| u.is_alive() && u.team == Team::Player)
            .map(|u| u.id)
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }

        match self {
            ScriptKind::HoldGround => Vec::new(),
            ScriptKind::Advance => match enemy_centroid(battle) {
                Some(target) => vec![BattleCommand::MoveTo { ids, target }],
                None => Vec::new(),
            },
            ScriptKind::FocusFire => match weakest_enemy(battle) {
                Some(target) => vec![BattleCommand::SetFocus { ids, target }],
                None => Vec::new(),
            },
        }
    }
}

/// Center of mass of the living enemy roster.
fn enemy_centroid(battle: &Battle) -> Option<Vec2Fixed> {
    let mut sum = Vec2Fixed::ZERO;
    let mut count = 0i64;
    for unit in battle.units() {
        if unit.is_alive() && unit.team == Team::Enemy {
            sum = sum + unit.position;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    let divisor = Fixed::from_num(count);
    Some(Vec2Fixed::new(sum.x / divisor, sum.y / divisor))
}

/// The living enemy with the lowest health fraction.
fn weakest_enemy(battle: &Battle) -> Option<UnitId> {
    battle
        .units()
        .iter()
        .filter(|u| u.is_alive() && u.team == Team::Enemy)
        .min_by(|a, b| a.health_fraction().cmp(&b.health_fraction()))
        .map(|u| u.id)
}
