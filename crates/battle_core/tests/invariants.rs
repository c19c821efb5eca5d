//! Property-based invariant tests.
//!
//! The testable properties that must hold for any input sequence:
//! health clamping, cooldown behavior, deployment counts and
//! seed-reproducibility.

use proptest::prelude::*;

use battle_core::prelude::*;
use battle_test_utils::fixtures::{fixed, vec2};

fn test_unit(id: UnitId, archetype: Archetype, team: Team, x: i32, y: i32) -> Unit {
    let table = ArchetypeTable::standard();
    Unit::new(id, archetype, team, vec2(x, y), table.get(archetype))
}

proptest! {
    /// After any sequence of damage, `0 <= health <= max` and the death
    /// flag mirrors `health == 0`.
    #[test]
    fn prop_health_invariant(amounts in proptest::collection::vec(0i32..200, 0..32)) {
        let mut unit = test_unit(0, Archetype::Infantry, Team::Player, 100, 100);

        for amount in amounts {
            unit.take_damage(fixed(amount));
            prop_assert!(unit.health >= Fixed::ZERO);
            prop_assert!(unit.health <= unit.max_health);
            prop_assert_eq!(unit.is_dead, unit.health == Fixed::ZERO);
        }
    }

    /// A successful attack always resets the cooldown to the full
    /// period, and no attack lands while the cooldown is running.
    #[test]
    fn prop_cooldown_invariant(pre_cooldown in 0u32..120) {
        let mut attacker = test_unit(0, Archetype::Infantry, Team::Player, 100, 100);
        let mut target = test_unit(1, Archetype::Infantry, Team::Enemy, 110, 100);
        attacker.cooldown_remaining = pre_cooldown;

        let landed = attacker.attack(&mut target);
        if pre_cooldown == 0 {
            prop_assert!(landed);
            prop_assert_eq!(attacker.cooldown_remaining, attacker.cooldown_period);
        } else {
            prop_assert!(!landed);
            prop_assert_eq!(target.health, target.max_health);
            prop_assert_eq!(attacker.cooldown_remaining, pre_cooldown);
        }
    }

    /// For a selection of R units of an archetype, exactly R placements
    /// succeed and placement at R = 0 never creates a unit.
    #[test]
    fn prop_deployment_count_is_exact(count in 1u32..12) {
        let mut battle = Battle::new(BattleConfig::default());
        for _ in 0..count {
            prop_assert!(battle.add_to_army(Archetype::Infantry));
        }
        battle.start_battle().unwrap();

        // Generous grid: 60-unit spacing, 10 rows per column
        let mut placed = 0u32;
        for attempt in 0..(count + 3) {
            let slot = attempt as i32;
            battle.enqueue(BattleCommand::PlaceUnit {
                archetype: Archetype::Infantry,
                position: vec2(100 + (slot / 10) * 60, 60 + (slot % 10) * 60),
            });
            let report = battle.tick();
            if report.rejected.is_empty() {
                placed += 1;
            } else {
                prop_assert_eq!(report.rejected[0].reason, RejectReason::NoneRemaining);
            }
        }

        prop_assert_eq!(placed, count);
        prop_assert_eq!(battle.living_count(Team::Player) as u32, count);
    }

    /// Identical seeds and command streams give identical battles.
    #[test]
    fn prop_seeded_battles_reproduce(seed in 0u64..5000, ticks in 1u64..120) {
        let build = |seed: u64| {
            let mut battle = Battle::new(BattleConfig { seed, ..BattleConfig::default() });
            battle.add_to_army(Archetype::Infantry);
            battle.add_to_army(Archetype::Archers);
            battle.start_battle().unwrap();
            battle.enqueue(BattleCommand::PlaceUnit {
                archetype: Archetype::Infantry,
                position: vec2(100, 100),
            });
            battle.enqueue(BattleCommand::PlaceUnit {
                archetype: Archetype::Archers,
                position: vec2(100, 200),
            });
            battle.tick();
            battle.start_combat().unwrap();
            battle
        };

        let mut a = build(seed);
        let mut b = build(seed);
        for _ in 0..ticks {
            a.tick();
            b.tick();
        }
        prop_assert_eq!(a.state_hash(), b.state_hash());
    }
}
