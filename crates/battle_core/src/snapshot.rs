//! Read-only battle views for the rendering collaborator.
//!
//! The renderer consumes one [`BattleView`] per frame and produces
//! nothing back into simulation state. Ephemeral visual events (hits,
//! deaths, rejection notices) travel separately on the tick report.

use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, Shape};
use crate::battle::{Battle, Outcome, Phase};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::unit::{Team, Unit, UnitId};

/// Kind of command line drawn from a unit to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Plain movement order.
    Movement,
    /// Pursuit of a focus target.
    Targeting,
}

/// A transient movement/targeting line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// Line start (the unit).
    pub from: Vec2Fixed,
    /// Line end (the destination).
    pub to: Vec2Fixed,
    /// Visual flavor.
    pub kind: LineKind,
    /// Remaining display ticks, for fade-out.
    pub ticks_left: u32,
}

/// Drawable state of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    /// Stable unit id.
    pub id: UnitId,
    /// Combatant class.
    pub archetype: Archetype,
    /// Owning side.
    pub team: Team,
    /// World position.
    pub position: Vec2Fixed,
    /// Current health.
    #[serde(with = "fixed_serde")]
    pub health: Fixed,
    /// Maximum health.
    #[serde(with = "fixed_serde")]
    pub max_health: Fixed,
    /// Attack range, for the selected-unit range ring.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Visual size / collision radius.
    #[serde(with = "fixed_serde")]
    pub size: Fixed,
    /// Display color.
    pub color: String,
    /// Display shape.
    pub shape: Shape,
    /// Selection highlight flag.
    pub selected: bool,
    /// Whether the unit is a corpse (drawn differently or skipped).
    pub is_dead: bool,
    /// Current focus target, for the targeting reticle.
    pub focus_target: Option<UnitId>,
    /// Movement/targeting line, player units only.
    pub line: Option<CommandLine>,
}

/// Drawable state of the whole battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleView {
    /// Current phase.
    pub phase: Phase,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whole seconds of unpaused combat.
    pub elapsed_seconds: u64,
    /// Enemy units killed.
    pub enemy_kills: u32,
    /// Player units lost.
    pub player_losses: u32,
    /// Final outcome, once ended.
    pub outcome: Option<Outcome>,
    /// Final score, once ended.
    pub score: Option<u32>,
    /// All units, dead ones included.
    pub units: Vec<UnitView>,
}

impl Battle {
    /// Produce the per-frame render view.
    #[must_use]
    pub fn snapshot(&self) -> BattleView {
        let units = self.units().iter().map(|u| self.unit_view(u)).collect();

        BattleView {
            phase: self.phase(),
            paused: self.is_paused(),
            elapsed_seconds: self.elapsed_seconds(),
            enemy_kills: self.enemy_kills(),
            player_losses: self.player_losses(),
            outcome: self.outcome(),
            score: self.outcome().map(|_| self.score()),
            units,
        }
    }

    fn unit_view(&self, unit: &Unit) -> UnitView {
        let stats = self.table().get(unit.archetype);

        // Command lines are player-side UI only
        let line = if unit.team == Team::Player && unit.line_ticks > 0 && unit.is_alive() {
            let focus_alive = unit
                .focus_target
                .and_then(|id| self.unit(id))
                .is_some_and(|t| t.is_alive());
            Some(CommandLine {
                from: unit.position,
                to: unit.destination,
                kind: if focus_alive {
                    LineKind::Targeting
                } else {
                    LineKind::Movement
                },
                ticks_left: unit.line_ticks,
            })
        } else {
            None
        };

        UnitView {
            id: unit.id,
            archetype: unit.archetype,
            team: unit.team,
            position: unit.position,
            health: unit.health,
            max_health: unit.max_health,
            range: unit.range,
            size: unit.size,
            color: stats.color.clone(),
            shape: stats.shape,
            selected: unit.selected,
            is_dead: unit.is_dead,
            focus_target: unit.focus_target,
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleConfig;
    use crate::command::BattleCommand;

    fn vec2(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    fn combat_battle() -> Battle {
        let mut battle = Battle::new(BattleConfig::default());
        battle.add_to_army(Archetype::Infantry);
        battle.start_battle().unwrap();
        battle.enqueue(BattleCommand::PlaceUnit {
            archetype: Archetype::Infantry,
            position: vec2(100, 100),
        });
        battle.tick();
        battle.start_combat().unwrap();
        battle
    }

    #[test]
    fn test_snapshot_carries_all_units() {
        let battle = combat_battle();
        let view = battle.snapshot();

        assert_eq!(view.units.len(), 2);
        assert_eq!(view.phase, Phase::Combat);
        assert!(view.score.is_none());
    }

    #[test]
    fn test_movement_line_appears_after_an_order() {
        let mut battle = combat_battle();
        let id = battle.selected_player_ids().first().copied().unwrap_or(
            battle
                .units()
                .iter()
                .find(|u| u.team == Team::Player)
                .unwrap()
                .id,
        );

        battle.enqueue(BattleCommand::MoveTo {
            ids: vec![id],
            target: vec2(400, 400),
        });
        battle.tick();

        let view = battle.snapshot();
        let unit_view = view.units.iter().find(|u| u.id == id).unwrap();
        let line = unit_view.line.as_ref().expect("movement line visible");
        assert_eq!(line.kind, LineKind::Movement);
        assert_eq!(line.to, vec2(400, 400));
    }

    #[test]
    fn test_targeting_line_for_a_living_focus() {
        let mut battle = combat_battle();
        let player_id = battle
            .units()
            .iter()
            .find(|u| u.team == Team::Player)
            .unwrap()
            .id;
        let enemy_id = battle
            .units()
            .iter()
            .find(|u| u.team == Team::Enemy)
            .unwrap()
            .id;

        battle.enqueue(BattleCommand::SetFocus {
            ids: vec![player_id],
            target: enemy_id,
        });
        battle.tick();

        let view = battle.snapshot();
        let unit_view = view.units.iter().find(|u| u.id == player_id).unwrap();
        assert_eq!(unit_view.line.as_ref().unwrap().kind, LineKind::Targeting);
        assert_eq!(unit_view.focus_target, Some(enemy_id));
    }

    #[test]
    fn test_enemy_units_have_no_command_lines() {
        let battle = combat_battle();
        let view = battle.snapshot();

        for unit_view in view.units.iter().filter(|u| u.team == Team::Enemy) {
            assert!(unit_view.line.is_none());
        }
    }
}
