//! End-to-end battle flow tests.
//!
//! Walks whole battles through selection, deployment, combat and the
//! end screen, checking the cross-module contracts that the per-module
//! unit tests cannot see.

use battle_core::prelude::*;
use battle_test_utils::fixtures::{deployed_combined_arms, deployed_skirmish, vec2};

/// Drive a battle until it ends or the tick limit runs out.
fn run_to_completion(battle: &mut Battle, max_ticks: u64) -> Option<Outcome> {
    // March the player line into the fight so neither side stalls
    battle.enqueue(BattleCommand::SelectAll);
    battle.tick();
    battle.enqueue(BattleCommand::MoveTo {
        ids: battle.selected_player_ids(),
        target: vec2(900, 350),
    });

    for _ in 0..max_ticks {
        let report = battle.tick();
        if let Some(outcome) = report.outcome {
            return Some(outcome);
        }
    }
    None
}

#[test]
fn full_battle_reaches_an_outcome() {
    let mut battle = deployed_skirmish(4, 3);
    let outcome = run_to_completion(&mut battle, 30_000);

    assert!(outcome.is_some(), "battle never resolved");
    assert_eq!(battle.phase(), Phase::Ended);

    // Every death was counted on exactly one side
    let dead = battle.units().iter().filter(|u| u.is_dead).count() as u32;
    assert_eq!(dead, battle.enemy_kills() + battle.player_losses());
}

#[test]
fn combined_arms_battle_resolves_with_all_tactics_active() {
    let mut battle = deployed_combined_arms(19);
    let outcome = run_to_completion(&mut battle, 40_000);
    assert!(outcome.is_some(), "battle never resolved");
}

#[test]
fn health_invariant_holds_for_the_whole_battle() {
    let mut battle = deployed_skirmish(4, 21);
    battle.enqueue(BattleCommand::SelectAll);
    battle.tick();
    battle.enqueue(BattleCommand::MoveTo {
        ids: battle.selected_player_ids(),
        target: vec2(900, 350),
    });

    for _ in 0..5_000 {
        battle.tick();
        for unit in battle.units() {
            assert!(unit.health >= Fixed::ZERO, "health went negative");
            assert!(unit.health <= unit.max_health, "health exceeded maximum");
            assert_eq!(
                unit.is_dead,
                unit.health == Fixed::ZERO,
                "death flag out of sync with health"
            );
        }
        if battle.phase() == Phase::Ended {
            break;
        }
    }
}

#[test]
fn collision_containment_holds_for_the_whole_battle() {
    let mut battle = deployed_skirmish(6, 13);
    battle.enqueue(BattleCommand::SelectAll);
    battle.tick();
    // Orders that slam the line into the far corner
    battle.enqueue(BattleCommand::MoveTo {
        ids: battle.selected_player_ids(),
        target: vec2(1500, 900),
    });

    for _ in 0..2_000 {
        battle.tick();
        for unit in battle.units().iter().filter(|u| u.is_alive()) {
            let field = battle.field();
            assert!(unit.position.x >= unit.size && unit.position.x <= field.width - unit.size);
            assert!(unit.position.y >= unit.size && unit.position.y <= field.height - unit.size);
        }
    }
}

#[test]
fn focus_fire_kills_and_clears_the_reference() {
    let mut battle = deployed_skirmish(4, 9);
    let victim = battle
        .units()
        .iter()
        .find(|u| u.team == Team::Enemy)
        .unwrap()
        .id;

    battle.enqueue(BattleCommand::SelectAll);
    battle.tick();
    battle.enqueue(BattleCommand::SetFocus {
        ids: battle.selected_player_ids(),
        target: victim,
    });

    let mut victim_died = false;
    for _ in 0..10_000 {
        let report = battle.tick();
        if report.deaths.iter().any(|d| d.unit == victim) {
            victim_died = true;
            break;
        }
        if battle.phase() == Phase::Ended {
            break;
        }
    }
    assert!(victim_died, "focused target survived");

    // Stale references clear on the next tick
    battle.tick();
    for unit in battle.units().iter().filter(|u| u.is_alive()) {
        assert_ne!(unit.focus_target, Some(victim));
    }
}

#[test]
fn paused_battle_issues_orders_without_advancing_time() {
    let mut battle = deployed_skirmish(2, 2);

    battle.enqueue(BattleCommand::TogglePause);
    battle.tick();
    assert!(battle.is_paused());
    let frozen_hash = battle.state_hash();

    // Orders while paused take effect immediately
    battle.enqueue(BattleCommand::SelectAll);
    battle.tick();
    assert_eq!(battle.selected_player_ids().len(), 2);

    // But positions and the clock stay frozen
    assert_eq!(battle.elapsed_seconds(), 0);
    let selected_hash = battle.state_hash();
    for _ in 0..100 {
        battle.tick();
    }
    assert_eq!(battle.state_hash(), selected_hash);
    assert_ne!(frozen_hash, selected_hash, "selection should change the hash");

    battle.enqueue(BattleCommand::TogglePause);
    battle.tick();
    assert!(!battle.is_paused());
}

#[test]
fn deployment_budget_spends_down_to_exact_counts() {
    let mut battle = Battle::new(BattleConfig::default());

    // 1000 budget: 8 infantry (400) + 4 archers (300) + 3 cavalry (300)
    for _ in 0..8 {
        assert!(battle.add_to_army(Archetype::Infantry));
    }
    for _ in 0..4 {
        assert!(battle.add_to_army(Archetype::Archers));
    }
    for _ in 0..3 {
        assert!(battle.add_to_army(Archetype::Cavalry));
    }
    assert_eq!(battle.budget_remaining(), 0);
    assert!(!battle.add_to_army(Archetype::Infantry));

    battle.start_battle().unwrap();
    assert_eq!(battle.living_count(Team::Enemy), 15);
    assert_eq!(battle.remaining_to_place(Archetype::Infantry), 8);
}

#[test]
fn snapshot_tracks_the_battle_through_all_phases() {
    let mut battle = Battle::new(BattleConfig::default());
    battle.add_to_army(Archetype::Infantry);
    assert_eq!(battle.snapshot().phase, Phase::Selection);

    battle.start_battle().unwrap();
    assert_eq!(battle.snapshot().phase, Phase::Deployment);

    battle.enqueue(BattleCommand::PlaceUnit {
        archetype: Archetype::Infantry,
        position: vec2(100, 100),
    });
    battle.tick();
    battle.start_combat().unwrap();
    assert_eq!(battle.snapshot().phase, Phase::Combat);

    let view = battle.snapshot();
    assert_eq!(view.units.len(), 2);
    assert!(view.score.is_none());
}
