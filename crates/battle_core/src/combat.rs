//! Per-tick combat resolution.
//!
//! Each living unit makes at most one attack per tick. A living focus
//! target is attempted first and, on success, exclusively; otherwise the
//! unit falls through to scanning living opponents in arena order and
//! stops at the first attack that lands.
//!
//! Kill bookkeeping is keyed off the defender's before/after aliveness,
//! so a death increments exactly one counter exactly once no matter how
//! many attackers piled onto the victim that tick.

use serde::{Deserialize, Serialize};

use crate::math::Vec2Fixed;
use crate::unit::{Team, Unit, UnitId};

/// A landed attack, for the rendering collaborator's hit effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEvent {
    /// Unit that dealt the blow.
    pub attacker: UnitId,
    /// Unit that was struck.
    pub target: UnitId,
    /// Where the blow landed (the target's position).
    pub position: Vec2Fixed,
}

/// A unit death, emitted exactly once at the alive-to-dead transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathEvent {
    /// The unit that died.
    pub unit: UnitId,
    /// Side the dead unit fought for.
    pub team: Team,
    /// Where it fell.
    pub position: Vec2Fixed,
}

/// Outcome of one combat tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    /// Attacks that landed this tick.
    pub hits: Vec<HitEvent>,
    /// Units that died this tick.
    pub deaths: Vec<DeathEvent>,
    /// Enemy units killed by player attacks this tick.
    pub enemy_kills: u32,
    /// Player units killed by enemy attacks this tick.
    pub player_losses: u32,
}

/// Resolve one tick of combat over the whole arena.
///
/// Player attackers are resolved before enemy attackers, matching the
/// phase ordering the rest of the simulation observes.
pub fn combat_phase(units: &mut [Unit]) -> CombatReport {
    let mut report = CombatReport::default();
    resolve_team(units, Team::Player, &mut report);
    resolve_team(units, Team::Enemy, &mut report);
    report
}

fn resolve_team(units: &mut [Unit], team: Team, report: &mut CombatReport) {
    for attacker_idx in 0..units.len() {
        let attacker = &units[attacker_idx];
        if attacker.is_dead || attacker.team != team {
            continue;
        }

        // Focus target first. On success the unit is done for the tick;
        // a failed attempt falls through to the scan below.
        if let Some(focus_id) = attacker.focus_target {
            let focus_idx = focus_id as usize;
            if focus_idx < units.len() && focus_idx != attacker_idx && units[focus_idx].is_alive() {
                if try_attack(units, attacker_idx, focus_idx, report) {
                    if units[focus_idx].is_dead {
                        units[attacker_idx].clear_focus();
                    }
                    continue;
                }
            }
        }

        for target_idx in 0..units.len() {
            let target = &units[target_idx];
            if target.is_dead || target.team != team.opponent() {
                continue;
            }
            if try_attack(units, attacker_idx, target_idx, report) {
                break;
            }
        }
    }
}

/// Attempt one attack, recording hit/death events and kill counters.
fn try_attack(
    units: &mut [Unit],
    attacker_idx: usize,
    target_idx: usize,
    report: &mut CombatReport,
) -> bool {
    let (attacker, target) = pair_mut(units, attacker_idx, target_idx);
    let was_alive = target.is_alive();

    if !attacker.attack(target) {
        return false;
    }

    report.hits.push(HitEvent {
        attacker: attacker.id,
        target: target.id,
        position: target.position,
    });

    if was_alive && target.is_dead {
        report.deaths.push(DeathEvent {
            unit: target.id,
            team: target.team,
            position: target.position,
        });
        match attacker.team {
            Team::Player => report.enemy_kills += 1,
            Team::Enemy => report.player_losses += 1,
        }
    }

    true
}

/// Disjoint mutable references to two arena slots.
fn pair_mut(units: &mut [Unit], i: usize, j: usize) -> (&mut Unit, &mut Unit) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = units.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = units.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
