//! Data-driven combatant archetype definitions.
//!
//! An archetype is one of a small closed set of combatant classes with
//! fixed base stats. Stats are looked up from the table once at unit
//! creation and copied onto the instance; the table is never mutated
//! during a battle.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::math::{fixed_serde, Fixed};

/// Closed set of combatant classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Melee line troops - cheap, durable, short reach.
    Infantry,
    /// Ranged skirmishers - fragile, long reach, slow.
    Archers,
    /// Fast flankers - expensive, mobile, hard-hitting.
    Cavalry,
}

impl Archetype {
    /// All archetypes in stable iteration order.
    ///
    /// This order drives deployment auto-advance and enemy spawn layout,
    /// so it must not change between releases.
    pub const ALL: [Archetype; 3] = [Archetype::Infantry, Archetype::Archers, Archetype::Cavalry];

    /// Stable string identifier for data files and logs.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Archetype::Infantry => "infantry",
            Archetype::Archers => "archers",
            Archetype::Cavalry => "cavalry",
        }
    }

    /// Index into per-archetype arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Archetype::Infantry => 0,
            Archetype::Archers => 1,
            Archetype::Cavalry => 2,
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Visual silhouette used by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned square.
    Square,
    /// Upward-pointing triangle.
    Triangle,
    /// Regular hexagon.
    Hexagon,
}

/// Base statistics for one archetype.
///
/// # Example RON
///
/// ```ron
/// ArchetypeStats(
///     name: "Infantry",
///     cost: 50,
///     max_health: 429496729600,    // Fixed-point for 100.0
///     damage: 64424509440,         // Fixed-point for 15.0
///     range: 128849018880,         // Fixed-point for 30.0
///     speed: 8589934592,           // Fixed-point for 2.0
///     attack_cooldown: 60,
///     size: 51539607552,           // Fixed-point for 12.0
///     color: "#4a90e2",
///     shape: Square,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeStats {
    /// Display name.
    pub name: String,
    /// Budget cost per unit.
    pub cost: u32,
    /// Maximum health points.
    #[serde(with = "fixed_serde")]
    pub max_health: Fixed,
    /// Base damage per attack. Fractional values arise from the focus
    /// bonus multiplier, so damage is fixed-point throughout.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Attack range in world units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Movement speed in world units per tick.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Ticks between attacks.
    pub attack_cooldown: u32,
    /// Collision radius and visual size.
    #[serde(with = "fixed_serde")]
    pub size: Fixed,
    /// Display color (hex string, passed through to the renderer).
    pub color: String,
    /// Display shape.
    pub shape: Shape,
}

/// Immutable per-archetype stat table, loaded once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeTable {
    entries: [ArchetypeStats; 3],
}

impl ArchetypeTable {
    /// The standard stat table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: [
                ArchetypeStats {
                    name: "Infantry".to_string(),
                    cost: 50,
                    max_health: Fixed::from_num(100),
                    damage: Fixed::from_num(15),
                    range: Fixed::from_num(30),
                    speed: Fixed::from_num(2),
                    attack_cooldown: 60,
                    size: Fixed::from_num(12),
                    color: "#4a90e2".to_string(),
                    shape: Shape::Square,
                },
                ArchetypeStats {
                    name: "Archers".to_string(),
                    cost: 75,
                    max_health: Fixed::from_num(60),
                    damage: Fixed::from_num(20),
                    range: Fixed::from_num(150),
                    speed: Fixed::from_num(3) / Fixed::from_num(2),
                    attack_cooldown: 60,
                    size: Fixed::from_num(14),
                    color: "#e24a4a".to_string(),
                    shape: Shape::Triangle,
                },
                ArchetypeStats {
                    name: "Cavalry".to_string(),
                    cost: 100,
                    max_health: Fixed::from_num(80),
                    damage: Fixed::from_num(25),
                    range: Fixed::from_num(35),
                    speed: Fixed::from_num(4),
                    attack_cooldown: 60,
                    size: Fixed::from_num(14),
                    color: "#e2c44a".to_string(),
                    shape: Shape::Hexagon,
                },
            ],
        }
    }

    /// Look up the stats for an archetype.
    #[must_use]
    pub fn get(&self, archetype: Archetype) -> &ArchetypeStats {
        &self.entries[archetype.index()]
    }

    /// Budget cost of one unit of the archetype.
    #[must_use]
    pub fn cost(&self, archetype: Archetype) -> u32 {
        self.get(archetype).cost
    }

    /// Parse a table from a RON string.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParseError`] if the RON is malformed.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| BattleError::DataParseError {
            message: e.to_string(),
        })
    }
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_costs() {
        let table = ArchetypeTable::standard();
        assert_eq!(table.cost(Archetype::Infantry), 50);
        assert_eq!(table.cost(Archetype::Archers), 75);
        assert_eq!(table.cost(Archetype::Cavalry), 100);
    }

    #[test]
    fn test_archer_speed_is_fractional() {
        let table = ArchetypeTable::standard();
        let speed = table.get(Archetype::Archers).speed;
        assert_eq!(speed * Fixed::from_num(2), Fixed::from_num(3));
    }

    #[test]
    fn test_table_ron_roundtrip() {
        let table = ArchetypeTable::standard();
        let ron = ron::to_string(&table).unwrap();
        let restored = ArchetypeTable::from_ron_str(&ron).unwrap();
        assert_eq!(table, restored);
    }

    #[test]
    fn test_malformed_ron_is_rejected() {
        assert!(ArchetypeTable::from_ron_str("not a table").is_err());
    }

    #[test]
    fn test_archetype_ids_are_stable() {
        let ids: Vec<&str> = Archetype::ALL.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["infantry", "archers", "cavalry"]);
    }
}
