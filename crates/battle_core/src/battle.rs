//! Battle orchestration and the phase state machine.
//!
//! [`Battle`] owns the unit arena and drives one logical tick per call:
//! command drain, then movement + collision, combat resolution, throttled
//! AI, and the victory check, in that strict order. No phase reads
//! another phase's half-updated state; each fully iterates the arena
//! before the next begins.
//!
//! Phases are one-directional (`Selection -> Deployment -> Combat ->
//! Ended`) and only advance through explicit calls; no phase is ever
//! re-entered. "Play again" is a fresh [`Battle`], not a transition.

use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::ai::{ai_phase, DECISION_INTERVAL};
use crate::archetype::{Archetype, ArchetypeTable};
use crate::battlefield::Battlefield;
use crate::combat::{combat_phase, DeathEvent, HitEvent};
use crate::command::{BattleCommand, RejectReason, RejectedCommand};
use crate::error::{BattleError, Result};
use crate::math::{Fixed, Vec2Fixed};
use crate::movement::movement_phase;
use crate::roster::{enemy_spawn_layout, ArmySelection, DeploymentQueue};
use crate::rng::SeededRng;
use crate::unit::{Team, Unit, UnitId};

/// Nominal simulation ticks per second (one tick per rendered frame).
pub const TICK_RATE: u32 = 60;

/// Minimum spacing between friendly units at placement time.
#[must_use]
pub fn min_placement_distance() -> Fixed {
    Fixed::from_num(35)
}

/// Top-level battle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Army building under the budget.
    Selection,
    /// Placing units on the friendly half.
    Deployment,
    /// The per-tick simulation is live.
    Combat,
    /// Terminal: the simulation is frozen.
    Ended,
}

/// How a finished battle came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The enemy roster was wiped out.
    Victory,
    /// The player roster was wiped out.
    Defeat,
    /// Both rosters emptied in the same tick.
    Draw,
}

/// Battle construction parameters.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    /// World geometry.
    pub field: Battlefield,
    /// Archetype stat table for this session.
    pub table: ArchetypeTable,
    /// Army-building budget.
    pub budget: u32,
    /// Seed for enemy spawn jitter.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            field: Battlefield::standard(),
            table: ArchetypeTable::standard(),
            budget: crate::roster::DEFAULT_BUDGET,
            seed: 0,
        }
    }
}

/// Everything that happened during one tick, for the host to consume.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    /// Attacks that landed.
    pub hits: Vec<HitEvent>,
    /// Units that died, exactly one entry per death.
    pub deaths: Vec<DeathEvent>,
    /// Commands refused this tick, with player-facing reasons.
    pub rejected: Vec<RejectedCommand>,
    /// Set on the tick the battle ends.
    pub outcome: Option<Outcome>,
}

/// A complete battle: unit arena, phase machine, command queue, score.
#[derive(Debug, Clone)]
pub struct Battle {
    field: Battlefield,
    table: ArchetypeTable,
    phase: Phase,
    units: Vec<Unit>,
    army: ArmySelection,
    deployment: Option<DeploymentQueue>,
    commands: VecDeque<BattleCommand>,
    paused: bool,
    combat_ticks: u64,
    enemy_kills: u32,
    player_losses: u32,
    outcome: Option<Outcome>,
    rng: SeededRng,
}

impl Battle {
    /// Create a battle in the army-selection phase.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self {
            field: config.field,
            army: ArmySelection::new(config.budget),
            rng: SeededRng::new(config.seed),
            table: config.table,
            phase: Phase::Selection,
            units: Vec::new(),
            deployment: None,
            commands: VecDeque::new(),
            paused: false,
            combat_ticks: 0,
            enemy_kills: 0,
            player_losses: 0,
            outcome: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// World geometry.
    #[must_use]
    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    /// The session's archetype table.
    #[must_use]
    pub fn table(&self) -> &ArchetypeTable {
        &self.table
    }

    /// The whole unit arena, dead units included.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id as usize)
    }

    /// Whether simulation ticking is suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Enemy units killed by the player so far.
    #[must_use]
    pub fn enemy_kills(&self) -> u32 {
        self.enemy_kills
    }

    /// Player units lost so far.
    #[must_use]
    pub fn player_losses(&self) -> u32 {
        self.player_losses
    }

    /// Combat ticks elapsed. Paused time never accumulates here.
    #[must_use]
    pub fn combat_ticks(&self) -> u64 {
        self.combat_ticks
    }

    /// Whole seconds of (unpaused) combat.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.combat_ticks / u64::from(TICK_RATE)
    }

    /// The final outcome, once the battle has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Living unit count for one side.
    #[must_use]
    pub fn living_count(&self, team: Team) -> usize {
        self.units
            .iter()
            .filter(|u| u.is_alive() && u.team == team)
            .count()
    }

    /// Ids of currently selected living player units.
    #[must_use]
    pub fn selected_player_ids(&self) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|u| u.is_alive() && u.team == Team::Player && u.selected)
            .map(|u| u.id)
            .collect()
    }

    /// First living player unit whose hit circle contains the point.
    #[must_use]
    pub fn living_player_at(&self, point: Vec2Fixed) -> Option<UnitId> {
        self.living_at(Team::Player, point)
    }

    /// First living enemy unit whose hit circle contains the point.
    #[must_use]
    pub fn living_enemy_at(&self, point: Vec2Fixed) -> Option<UnitId> {
        self.living_at(Team::Enemy, point)
    }

    fn living_at(&self, team: Team, point: Vec2Fixed) -> Option<UnitId> {
        self.units
            .iter()
            .find(|u| u.is_alive() && u.team == team && u.contains_point(point))
            .map(|u| u.id)
    }

    /// The archetype deployment clicks currently place.
    #[must_use]
    pub fn active_placement(&self) -> Option<Archetype> {
        self.deployment.as_ref().and_then(DeploymentQueue::active)
    }

    /// Units of one archetype still waiting for placement.
    #[must_use]
    pub fn remaining_to_place(&self, archetype: Archetype) -> u32 {
        self.deployment
            .as_ref()
            .map_or(0, |d| d.remaining(archetype))
    }

    /// Remaining army-building budget.
    #[must_use]
    pub fn budget_remaining(&self) -> u32 {
        self.army.budget_remaining()
    }

    /// The army composition.
    #[must_use]
    pub fn army(&self) -> &ArmySelection {
        &self.army
    }

    /// Add one unit to the army during selection. No-op outside the
    /// selection phase or when the budget is exhausted.
    pub fn add_to_army(&mut self, archetype: Archetype) -> bool {
        self.phase == Phase::Selection && self.army.add(archetype, &self.table)
    }

    /// Remove one unit from the army during selection, refunding its cost.
    pub fn remove_from_army(&mut self, archetype: Archetype) -> bool {
        self.phase == Phase::Selection && self.army.remove(archetype, &self.table)
    }

    /// Freeze the army, spawn the mirrored enemy roster and enter
    /// deployment.
    ///
    /// # Errors
    ///
    /// [`BattleError::PhaseMismatch`] outside the selection phase,
    /// [`BattleError::EmptyArmy`] if nothing was selected.
    pub fn start_battle(&mut self) -> Result<()> {
        self.expect_phase(Phase::Selection)?;
        if self.army.is_empty() {
            return Err(BattleError::EmptyArmy);
        }

        let layout = enemy_spawn_layout(&self.army, &self.field, &mut self.rng);
        for (archetype, position) in layout {
            self.spawn_unit(archetype, Team::Enemy, position);
        }

        self.deployment = Some(DeploymentQueue::new(&self.army));
        self.phase = Phase::Deployment;
        tracing::info!(
            enemy_units = self.units.len(),
            budget_left = self.army.budget_remaining(),
            "Battle started, entering deployment"
        );
        Ok(())
    }

    /// Confirm deployment and open combat.
    ///
    /// # Errors
    ///
    /// [`BattleError::PhaseMismatch`] outside deployment,
    /// [`BattleError::DeploymentIncomplete`] while units remain unplaced.
    pub fn start_combat(&mut self) -> Result<()> {
        self.expect_phase(Phase::Deployment)?;
        let remaining = self
            .deployment
            .as_ref()
            .map_or(0, DeploymentQueue::total_remaining);
        if remaining > 0 {
            return Err(BattleError::DeploymentIncomplete { remaining });
        }

        self.phase = Phase::Combat;
        self.paused = false;
        tracing::info!(
            player_units = self.living_count(Team::Player),
            enemy_units = self.living_count(Team::Enemy),
            "Combat started"
        );
        Ok(())
    }

    /// Queue a command for the next tick.
    pub fn enqueue(&mut self, command: BattleCommand) {
        self.commands.push_back(command);
    }

    /// Advance the battle by one tick.
    ///
    /// Commands always drain, even while paused or outside combat, so
    /// orders issued during a pause take effect the moment they are
    /// given. The simulation phases run only during unpaused combat.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        let pending: Vec<BattleCommand> = self.commands.drain(..).collect();
        for command in pending {
            self.apply(command, &mut report);
        }

        if self.phase == Phase::Combat && !self.paused {
            self.combat_ticks += 1;

            movement_phase(&mut self.units, &self.field);

            let combat = combat_phase(&mut self.units);
            self.enemy_kills += combat.enemy_kills;
            self.player_losses += combat.player_losses;
            report.hits = combat.hits;
            report.deaths = combat.deaths;

            if self.combat_ticks % DECISION_INTERVAL == 0 {
                ai_phase(&mut self.units, &self.field);
            }

            report.outcome = self.check_victory();
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(
                tick = self.combat_ticks,
                state_hash = hash,
                "Battle state hash"
            );
        }

        report
    }

    /// Final score once the battle has ended.
    ///
    /// `max(0, kills*100 - losses*50 + max(0, 300 - elapsedSeconds)*10)`
    #[must_use]
    pub fn score(&self) -> u32 {
        let base =
            i64::from(self.enemy_kills) * 100 - i64::from(self.player_losses) * 50;
        let time_bonus = (300 - self.elapsed_seconds() as i64).max(0) * 10;
        (base + time_bonus).max(0) as u32
    }

    /// Hash of the full simulation state, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.phase.hash(&mut hasher);
        self.combat_ticks.hash(&mut hasher);
        self.enemy_kills.hash(&mut hasher);
        self.player_losses.hash(&mut hasher);
        self.paused.hash(&mut hasher);

        self.units.len().hash(&mut hasher);
        for unit in &self.units {
            unit.id.hash(&mut hasher);
            unit.position.x.to_bits().hash(&mut hasher);
            unit.position.y.to_bits().hash(&mut hasher);
            unit.destination.x.to_bits().hash(&mut hasher);
            unit.destination.y.to_bits().hash(&mut hasher);
            unit.health.to_bits().hash(&mut hasher);
            unit.cooldown_remaining.hash(&mut hasher);
            unit.is_dead.hash(&mut hasher);
            unit.focus_target.hash(&mut hasher);
            unit.selected.hash(&mut hasher);
        }

        hasher.finish()
    }

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BattleError::PhaseMismatch {
                expected,
                actual: self.phase,
            })
        }
    }

    fn spawn_unit(&mut self, archetype: Archetype, team: Team, position: Vec2Fixed) -> UnitId {
        let id = self.units.len() as UnitId;
        let unit = Unit::new(id, archetype, team, position, self.table.get(archetype));
        self.units.push(unit);
        id
    }

    fn apply(&mut self, command: BattleCommand, report: &mut TickReport) {
        match command {
            BattleCommand::Select { .. }
            | BattleCommand::SelectAll
            | BattleCommand::DeselectAll
            | BattleCommand::MoveTo { .. }
            | BattleCommand::SetFocus { .. }
            | BattleCommand::TogglePause
                if self.phase != Phase::Combat =>
            {
                report.rejected.push(RejectedCommand {
                    command,
                    reason: RejectReason::WrongPhase,
                });
            }

            BattleCommand::Select { ref ids } => {
                for unit in &mut self.units {
                    if unit.team == Team::Player {
                        unit.selected = false;
                    }
                }
                for &id in ids {
                    if let Some(unit) = self.units.get_mut(id as usize) {
                        if unit.is_alive() && unit.team == Team::Player {
                            unit.selected = true;
                        }
                    }
                }
            }

            BattleCommand::SelectAll => {
                for unit in &mut self.units {
                    if unit.team == Team::Player {
                        unit.selected = unit.is_alive();
                    }
                }
            }

            BattleCommand::DeselectAll => {
                for unit in &mut self.units {
                    if unit.team == Team::Player {
                        unit.selected = false;
                    }
                }
            }

            BattleCommand::MoveTo { ref ids, target } => {
                for &id in ids {
                    if let Some(unit) = self.units.get_mut(id as usize) {
                        if unit.is_alive() && unit.team == Team::Player {
                            unit.move_to(target);
                        }
                    }
                }
            }

            BattleCommand::SetFocus { ref ids, target } => {
                let target_info = self
                    .units
                    .get(target as usize)
                    .filter(|t| t.is_alive() && t.team == Team::Enemy)
                    .map(|t| t.position);

                let Some(target_position) = target_info else {
                    report.rejected.push(RejectedCommand {
                        command: command.clone(),
                        reason: RejectReason::InvalidUnit,
                    });
                    return;
                };

                for &id in ids {
                    if let Some(unit) = self.units.get_mut(id as usize) {
                        if unit.is_alive() && unit.team == Team::Player {
                            unit.set_focus_target(target, target_position);
                        }
                    }
                }
            }

            BattleCommand::TogglePause => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "Pause toggled");
            }

            BattleCommand::PlaceUnit {
                archetype,
                position,
            } => {
                if self.phase != Phase::Deployment {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::WrongPhase,
                    });
                    return;
                }
                if let Some(reason) = self.placement_violation(position, None) {
                    report.rejected.push(RejectedCommand { command, reason });
                    return;
                }
                let took = self
                    .deployment
                    .as_mut()
                    .is_some_and(|queue| queue.take(archetype));
                if !took {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::NoneRemaining,
                    });
                    return;
                }
                self.spawn_unit(archetype, Team::Player, position);
            }

            BattleCommand::RepositionUnit { id, position } => {
                if self.phase != Phase::Deployment {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::WrongPhase,
                    });
                    return;
                }
                let valid_unit = self
                    .units
                    .get(id as usize)
                    .is_some_and(|u| u.is_alive() && u.team == Team::Player);
                if !valid_unit {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::InvalidUnit,
                    });
                    return;
                }
                if let Some(reason) = self.placement_violation(position, Some(id)) {
                    report.rejected.push(RejectedCommand { command, reason });
                    return;
                }
                let unit = &mut self.units[id as usize];
                unit.position = position;
                unit.destination = position;
            }

            BattleCommand::SelectPlacementArchetype(archetype) => {
                if self.phase != Phase::Deployment {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::WrongPhase,
                    });
                    return;
                }
                let selected = self
                    .deployment
                    .as_mut()
                    .is_some_and(|queue| queue.select(archetype));
                if !selected {
                    report.rejected.push(RejectedCommand {
                        command,
                        reason: RejectReason::NoneRemaining,
                    });
                }
            }
        }
    }

    /// Validate a deployment point: friendly half, minimum spacing.
    /// `ignore` excludes the unit being repositioned from the spacing check.
    fn placement_violation(
        &self,
        position: Vec2Fixed,
        ignore: Option<UnitId>,
    ) -> Option<RejectReason> {
        if !self.field.friendly_zone_contains(position) {
            return Some(RejectReason::OutOfZone);
        }

        let min_sq = min_placement_distance() * min_placement_distance();
        let crowded = self.units.iter().any(|u| {
            u.team == Team::Player
                && Some(u.id) != ignore
                && u.position.distance_squared(position) < min_sq
        });
        if crowded {
            return Some(RejectReason::TooClose);
        }

        None
    }

    /// The instant either side's living count reaches zero the battle
    /// ends. Both sides emptying in the same tick is an explicit draw.
    fn check_victory(&mut self) -> Option<Outcome> {
        let player_alive = self.living_count(Team::Player);
        let enemy_alive = self.living_count(Team::Enemy);

        if player_alive > 0 && enemy_alive > 0 {
            return None;
        }

        let outcome = match (player_alive, enemy_alive) {
            (0, 0) => Outcome::Draw,
            (_, 0) => Outcome::Victory,
            _ => Outcome::Defeat,
        };

        self.outcome = Some(outcome);
        self.phase = Phase::Ended;
        self.paused = false;
        tracing::info!(
            ?outcome,
            kills = self.enemy_kills,
            losses = self.player_losses,
            seconds = self.elapsed_seconds(),
            score = self.score(),
            "Battle ended"
        );
        Some(outcome)
    }
}
