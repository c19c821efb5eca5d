//! Tactical controller for the enemy roster.
//!
//! Runs once every [`DECISION_INTERVAL`] ticks over living enemy units.
//! Each archetype dispatches to one [`Tactic`] implementation. Tactics
//! only produce movement directives; combat resolution acts separately
//! on whatever position and targeting state the tactics left behind.
//!
//! Decisions are computed against a read-only pass over the arena and
//! applied afterwards, so a tactic never observes a half-updated tick.

use crate::battlefield::Battlefield;
use crate::math::{Fixed, Vec2Fixed};
use crate::unit::{Team, Unit};

/// Ticks between tactical decision passes.
pub const DECISION_INTERVAL: u64 = 30;

/// How far a kiting unit retreats from a threat.
fn retreat_distance() -> Fixed {
    Fixed::from_num(150)
}

/// Battlefield inset applied to retreat destinations.
fn retreat_padding() -> Fixed {
    Fixed::from_num(50)
}

/// Offset of a flanking destination from the target.
fn flank_distance() -> Fixed {
    Fixed::from_num(100)
}

/// How close a ranged ally must be to count as protected.
fn protect_radius() -> Fixed {
    Fixed::from_num(200)
}

/// How close an opponent must be to a protected ally to count as a threat.
fn threat_radius() -> Fixed {
    Fixed::from_num(150)
}

/// Line units guarding the ranged line hold while the target is beyond this.
fn hold_distance() -> Fixed {
    Fixed::from_num(200)
}

/// A movement order produced by a tactic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Stand fast (also cancels any stale movement order).
    Hold,
    /// March to a destination.
    MoveTo(Vec2Fixed),
}

/// One archetype's tactical doctrine.
pub trait Tactic {
    /// Decide a movement directive for `unit`.
    ///
    /// `opponents` and `allies` are the living units of each side,
    /// in arena order; `opponents` is never empty.
    fn decide(
        &self,
        unit: &Unit,
        opponents: &[&Unit],
        allies: &[&Unit],
        field: &Battlefield,
    ) -> Directive;
}

/// Stay at range, kite away from anything that gets close.
pub struct RangedTactic;

/// Run down the weakest opponent from the side.
pub struct FlankerTactic;

/// Advance steadily, screen the ranged line when it is threatened.
pub struct LineTactic;

impl Tactic for RangedTactic {
    fn decide(
        &self,
        unit: &Unit,
        opponents: &[&Unit],
        _allies: &[&Unit],
        field: &Battlefield,
    ) -> Directive {
        let target = best_target(unit, opponents);
        let distance = unit.distance_to(target);
        let optimal_range = unit.range * Fixed::from_num(4) / Fixed::from_num(5);
        let danger_range = unit.range * Fixed::from_num(2) / Fixed::from_num(5);

        if distance < danger_range {
            let away = (unit.position - target.position).normalize();
            let dest = unit.position + away.scale(retreat_distance());
            Directive::MoveTo(field.clamp(dest, retreat_padding()))
        } else if distance <= optimal_range {
            Directive::Hold
        } else {
            // Approach to a point at optimal range on the near side of the target
            let toward = (target.position - unit.position).normalize();
            Directive::MoveTo(target.position - toward.scale(optimal_range))
        }
    }
}

impl Tactic for FlankerTactic {
    fn decide(
        &self,
        unit: &Unit,
        opponents: &[&Unit],
        _allies: &[&Unit],
        _field: &Battlefield,
    ) -> Directive {
        let target = weakest_target(opponents);

        if unit.distance_to(target) <= unit.range {
            return Directive::Hold;
        }

        // 90 degrees off the opposing army's centroid-to-target bearing
        let centroid = centroid(opponents);
        let bearing = (target.position - centroid).normalize();
        let dest = target.position + bearing.perpendicular().scale(flank_distance());
        Directive::MoveTo(dest)
    }
}

impl Tactic for LineTactic {
    fn decide(
        &self,
        unit: &Unit,
        opponents: &[&Unit],
        allies: &[&Unit],
        _field: &Battlefield,
    ) -> Directive {
        let target = best_target(unit, opponents);
        let distance = unit.distance_to(target);

        if protects_ranged_line(unit, allies, opponents) && distance > hold_distance() {
            // Screening duty: don't overextend away from the archers
            Directive::Hold
        } else if distance <= unit.range {
            Directive::Hold
        } else {
            Directive::MoveTo(target.position)
        }
    }
}

/// Doctrine lookup for an archetype.
///
/// Archetypes without a dedicated doctrine fight as line troops.
#[must_use]
pub fn tactic_for(archetype: crate::archetype::Archetype) -> &'static dyn Tactic {
    use crate::archetype::Archetype;

    static RANGED: RangedTactic = RangedTactic;
    static FLANKER: FlankerTactic = FlankerTactic;
    static LINE: LineTactic = LineTactic;

    match archetype {
        Archetype::Archers => &RANGED,
        Archetype::Cavalry => &FLANKER,
        Archetype::Infantry => &LINE,
    }
}

/// Run one tactical decision pass over all living enemy units.
pub fn ai_phase(units: &mut [Unit], field: &Battlefield) {
    let mut orders: Vec<(usize, Directive)> = Vec::new();

    {
        let opponents: Vec<&Unit> = units
            .iter()
            .filter(|u| u.is_alive() && u.team == Team::Player)
            .collect();
        if opponents.is_empty() {
            return;
        }
        let allies: Vec<&Unit> = units
            .iter()
            .filter(|u| u.is_alive() && u.team == Team::Enemy)
            .collect();

        for (idx, unit) in units.iter().enumerate() {
            if unit.is_dead || unit.team != Team::Enemy {
                continue;
            }
            let directive = tactic_for(unit.archetype).decide(unit, &opponents, &allies, field);
            orders.push((idx, directive));
        }
    }

    for (idx, directive) in orders {
        match directive {
            Directive::Hold => {
                let here = units[idx].position;
                units[idx].move_to(here);
            }
            Directive::MoveTo(dest) => units[idx].move_to(dest),
        }
    }
}

/// Best target by score: prioritize low health, then proximity.
///
/// Higher score wins; ties resolve to the first seen in arena order.
fn best_target<'a>(unit: &Unit, opponents: &[&'a Unit]) -> &'a Unit {
    let mut best = opponents[0];
    let mut best_score = score_target(unit, best);

    for &candidate in &opponents[1..] {
        let score = score_target(unit, candidate);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }

    best
}

fn score_target(unit: &Unit, candidate: &Unit) -> Fixed {
    let wounds = Fixed::from_num(1) - candidate.health_fraction();
    wounds * Fixed::from_num(100) - unit.distance_to(candidate) / Fixed::from_num(10)
}

/// Lowest health fraction wins; an all-healthy field yields the first unit.
fn weakest_target<'a>(opponents: &[&'a Unit]) -> &'a Unit {
    let mut weakest = opponents[0];
    let mut lowest = Fixed::from_num(1);

    for &candidate in opponents {
        let fraction = candidate.health_fraction();
        if fraction < lowest {
            lowest = fraction;
            weakest = candidate;
        }
    }

    weakest
}

/// Arithmetic center of a group of units.
fn centroid(group: &[&Unit]) -> Vec2Fixed {
    let mut sum = Vec2Fixed::ZERO;
    for unit in group {
        sum = sum + unit.position;
    }
    let count = Fixed::from_num(group.len() as i64);
    Vec2Fixed::new(sum.x / count, sum.y / count)
}

/// Whether a line unit is currently screening a threatened ranged ally.
///
/// True only if some ranged ally sits behind this unit (toward its own
/// spawn edge) within the protect radius, and an opponent is within the
/// threat radius of that ally.
fn protects_ranged_line(unit: &Unit, allies: &[&Unit], opponents: &[&Unit]) -> bool {
    use crate::archetype::Archetype;

    for &ally in allies {
        if ally.archetype != Archetype::Archers || ally.id == unit.id {
            continue;
        }
        if !is_rearward(unit.team, ally, unit) || unit.distance_to(ally) >= protect_radius() {
            continue;
        }
        for opponent in opponents {
            if opponent.distance_to(ally) < threat_radius() {
                return true;
            }
        }
    }

    false
}

/// Whether `a` sits behind `b` relative to the team's own spawn edge.
///
/// The enemy roster spawns on the right edge, the player deploys on the
/// left, so "behind" flips between teams.
fn is_rearward(team: Team, a: &Unit, b: &Unit) -> bool {
    match team {
        Team::Enemy => a.position.x > b.position.x,
        Team::Player => a.position.x < b.position.x,
    }
}
