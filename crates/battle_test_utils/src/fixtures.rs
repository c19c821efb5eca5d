//! Test fixtures and helpers.
//!
//! Pre-built battles and fixed-point constructors for consistent testing.

use fixed::types::I32F32;

use battle_core::prelude::*;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point vector from integers.
#[must_use]
pub fn vec2(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(y))
}

/// A battle in the combat phase: `pairs` infantry per side, the player
/// line deployed on a left-edge column, enemies spawned by the seed.
///
/// # Panics
///
/// Panics if the composition exceeds the default budget (pairs > 20).
#[must_use]
pub fn deployed_skirmish(pairs: u32, seed: u64) -> Battle {
    let mut battle = Battle::new(BattleConfig {
        seed,
        ..BattleConfig::default()
    });

    for _ in 0..pairs {
        assert!(
            battle.add_to_army(Archetype::Infantry),
            "composition exceeds the default budget"
        );
    }
    battle.start_battle().expect("army is non-empty");

    for i in 0..pairs {
        let row = i as i32;
        battle.enqueue(BattleCommand::PlaceUnit {
            archetype: Archetype::Infantry,
            position: vec2(100 + (row / 10) * 60, 60 + (row % 10) * 60),
        });
    }
    battle.tick();
    battle.start_combat().expect("deployment is complete");
    battle
}

/// A mixed-composition battle in the combat phase, for scenarios that
/// need every tactic doctrine live at once.
#[must_use]
pub fn deployed_combined_arms(seed: u64) -> Battle {
    let mut battle = Battle::new(BattleConfig {
        seed,
        ..BattleConfig::default()
    });

    for _ in 0..4 {
        battle.add_to_army(Archetype::Infantry);
    }
    for _ in 0..4 {
        battle.add_to_army(Archetype::Archers);
    }
    for _ in 0..2 {
        battle.add_to_army(Archetype::Cavalry);
    }
    battle.start_battle().expect("army is non-empty");

    let mut placements = Vec::new();
    for (archetype, count) in battle.army().composition() {
        for _ in 0..count {
            placements.push(archetype);
        }
    }
    for (i, archetype) in placements.into_iter().enumerate() {
        let row = i as i32;
        battle.enqueue(BattleCommand::PlaceUnit {
            archetype,
            position: vec2(100 + (row / 10) * 60, 60 + (row % 10) * 60),
        });
    }
    battle.tick();
    battle.start_combat().expect("deployment is complete");
    battle
}
