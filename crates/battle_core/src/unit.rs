//! Unit state and intrinsic operations.
//!
//! A unit is a single combatant. Archetype-derived stats are copied onto
//! the instance at creation and never mutated afterwards; everything else
//! is per-tick simulation state.
//!
//! Units are never removed from the battle's arena. A dead unit keeps its
//! slot (so [`UnitId`]s stay stable for the renderer and for focus-target
//! references) but is excluded from movement, combat and AI.

use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, ArchetypeStats};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Stable identifier for a unit: its index in the battle's unit arena.
pub type UnitId = u32;

/// Which side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The human-controlled side (deploys on the left half).
    Player,
    /// The AI-controlled side (spawns on the right).
    Enemy,
}

impl Team {
    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Remaining distance below which a unit counts as arrived.
#[must_use]
pub fn arrival_epsilon() -> Fixed {
    Fixed::from_num(2)
}

/// Radius within which a moving unit may still attack.
///
/// Smaller than any nominal range: ranged units must stop before firing,
/// melee can fight on the move at point-blank distance.
#[must_use]
pub fn melee_engage_range() -> Fixed {
    Fixed::from_num(40)
}

/// Extra spacing added on top of both collision radii.
#[must_use]
pub fn collision_slack() -> Fixed {
    Fixed::from_num(2)
}

/// Ticks the movement line stays visible after a move command.
pub const MOVE_LINE_TICKS: u32 = 120;

/// Ticks the targeting line stays visible after a focus command.
pub const FOCUS_LINE_TICKS: u32 = 180;

/// A single combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identifier (arena index).
    pub id: UnitId,
    /// Combatant class.
    pub archetype: Archetype,
    /// Owning side.
    pub team: Team,

    // Archetype-derived constants, copied at creation.
    /// Maximum health points.
    #[serde(with = "fixed_serde")]
    pub max_health: Fixed,
    /// Base damage per attack.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Attack range in world units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Movement speed in world units per tick.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Ticks between attacks.
    pub cooldown_period: u32,
    /// Collision radius and visual size.
    #[serde(with = "fixed_serde")]
    pub size: Fixed,

    // Mutable simulation state.
    /// Current world position.
    pub position: Vec2Fixed,
    /// Movement destination. Equals `position` for a stationary unit.
    pub destination: Vec2Fixed,
    /// Current health, clamped to `0..=max_health`.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
    /// Ticks until the unit can attack again.
    pub cooldown_remaining: u32,
    /// Monotonic false-to-true death flag.
    pub is_dead: bool,
    /// Manually assigned priority target. Resolved by id and cleared
    /// when the referenced unit is found dead.
    pub focus_target: Option<UnitId>,
    /// Player selection flag.
    pub selected: bool,
    /// Remaining ticks the movement/targeting line stays visible.
    pub line_ticks: u32,
}

impl Unit {
    /// Create a unit at a position, copying stats from the archetype table entry.
    #[must_use]
    pub fn new(
        id: UnitId,
        archetype: Archetype,
        team: Team,
        position: Vec2Fixed,
        stats: &ArchetypeStats,
    ) -> Self {
        Self {
            id,
            archetype,
            team,
            max_health: stats.max_health,
            damage: stats.damage,
            range: stats.range,
            speed: stats.speed,
            cooldown_period: stats.attack_cooldown,
            size: stats.size,
            position,
            destination: position,
            health: stats.max_health,
            cooldown_remaining: 0,
            is_dead: false,
            focus_target: None,
            selected: false,
            line_ticks: 0,
        }
    }

    /// Whether the unit is still in play.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Remaining health as a fraction of maximum (0..=1).
    #[must_use]
    pub fn health_fraction(&self) -> Fixed {
        if self.max_health == Fixed::ZERO {
            Fixed::ZERO
        } else {
            self.health / self.max_health
        }
    }

    /// Euclidean distance to another unit.
    #[must_use]
    pub fn distance_to(&self, other: &Unit) -> Fixed {
        self.position.distance(other.position)
    }

    /// Hit-test a point against the unit's collision radius.
    #[must_use]
    pub fn contains_point(&self, point: Vec2Fixed) -> bool {
        self.position.distance_squared(point) <= self.size * self.size
    }

    /// Whether the unit still has ground to cover toward its destination.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.position.distance_squared(self.destination) > arrival_epsilon() * arrival_epsilon()
    }

    /// Order the unit to a destination.
    ///
    /// An explicit move always cancels any focus target.
    pub fn move_to(&mut self, destination: Vec2Fixed) {
        self.destination = destination;
        self.focus_target = None;
        self.line_ticks = MOVE_LINE_TICKS;
    }

    /// Assign a priority target, aiming the destination at its position.
    ///
    /// Subsequent ticks re-aim at the target's current position (pursuit)
    /// until the target dies or a new command arrives.
    pub fn set_focus_target(&mut self, target: UnitId, target_position: Vec2Fixed) {
        self.focus_target = Some(target);
        self.destination = target_position;
        self.line_ticks = FOCUS_LINE_TICKS;
    }

    /// Drop the focus target, keeping the last pursued destination.
    pub fn clear_focus(&mut self) {
        self.focus_target = None;
    }

    /// Whether an attack on `target` would land this tick.
    ///
    /// Requires both units alive, the target within range and the
    /// cooldown elapsed. A moving attacker only connects when the target
    /// is inside the short melee engage radius.
    #[must_use]
    pub fn can_attack(&self, target: &Unit) -> bool {
        if self.is_dead || target.is_dead || self.cooldown_remaining > 0 {
            return false;
        }

        let distance = self.distance_to(target);
        if distance > self.range {
            return false;
        }

        !self.is_moving() || distance <= melee_engage_range()
    }

    /// Attempt an attack, applying damage on success.
    ///
    /// The focus target takes a 1.5x damage bonus. On success the
    /// cooldown resets to the full period. Returns `false` with no side
    /// effect when the attack cannot land.
    pub fn attack(&mut self, target: &mut Unit) -> bool {
        if !self.can_attack(target) {
            return false;
        }

        let mut amount = self.damage;
        if self.focus_target == Some(target.id) {
            amount = amount * Fixed::from_num(3) / Fixed::from_num(2);
        }

        target.take_damage(amount);
        self.cooldown_remaining = self.cooldown_period;
        true
    }

    /// Apply damage, clamping health at zero and setting the death flag
    /// atomically with the clamp. Harmless on an already-dead unit.
    pub fn take_damage(&mut self, amount: Fixed) {
        if self.is_dead {
            return;
        }

        self.health -= amount;
        if self.health <= Fixed::ZERO {
            self.health = Fixed::ZERO;
            self.is_dead = true;
        }
    }

    /// Tick the attack cooldown toward zero.
    pub fn tick_cooldown(&mut self) {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
    }

    /// Tick the movement/targeting line display timer.
    pub fn tick_line_timer(&mut self) {
        if self.line_ticks > 0 {
            self.line_ticks -= 1;
        }
    }
}
