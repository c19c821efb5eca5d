//! Pointer and keyboard input translation.
//!
//! The host delivers raw pointer press/move/release events (already
//! translated into battlefield coordinates) and abstract key actions.
//! This module turns them into [`BattleCommand`]s against a read-only
//! view of the battle; it owns only the transient drag state.
//!
//! A release whose total pointer travel stays under the click threshold
//! is reclassified as a click, regardless of which drag mode had
//! tentatively started, and falls through to the click handling rather
//! than being dropped. At most one unit can be drag-repositioned at a
//! time, which keeps a dragged unit out of placement-click handling.

use crate::battle::{Battle, Phase};
use crate::command::BattleCommand;
use crate::math::{Fixed, Vec2Fixed};
use crate::unit::UnitId;

/// Pointer travel below this is a click, not a drag.
fn click_threshold() -> Fixed {
    Fixed::from_num(5)
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left / primary button.
    Primary,
    /// Right / secondary button.
    Secondary,
}

/// Abstract keyboard actions the host maps physical keys onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Pause or resume the simulation.
    TogglePause,
    /// Select every living player unit.
    SelectAll,
    /// Clear the selection.
    Deselect,
}

/// What a press tentatively started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressMode {
    /// Combat selection box.
    SelectionBox,
    /// Deployment unit drag.
    UnitDrag(UnitId),
    /// Neither - resolution deferred to the release.
    Free,
}

#[derive(Debug, Clone, Copy)]
struct PressState {
    button: PointerButton,
    origin: Vec2Fixed,
    mode: PressMode,
}

/// Stateful translator from raw input events to battle commands.
#[derive(Debug, Default)]
pub struct InputTranslator {
    press: Option<PressState>,
    cursor: Vec2Fixed,
}

impl InputTranslator {
    /// Create an idle translator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last observed cursor position.
    #[must_use]
    pub fn cursor(&self) -> Vec2Fixed {
        self.cursor
    }

    /// The unit currently being drag-repositioned, if any.
    ///
    /// Exposed for the renderer's drag feedback; the unit itself does
    /// not move until the drop commits through a command.
    #[must_use]
    pub fn dragged_unit(&self) -> Option<UnitId> {
        match self.press {
            Some(PressState {
                mode: PressMode::UnitDrag(id),
                ..
            }) => Some(id),
            _ => None,
        }
    }

    /// The active selection box corners, if a box drag is in progress.
    #[must_use]
    pub fn selection_box(&self) -> Option<(Vec2Fixed, Vec2Fixed)> {
        match self.press {
            Some(PressState {
                mode: PressMode::SelectionBox,
                origin,
                ..
            }) => Some((origin, self.cursor)),
            _ => None,
        }
    }

    /// Record a pointer press.
    pub fn pointer_pressed(&mut self, battle: &Battle, button: PointerButton, position: Vec2Fixed) {
        self.cursor = position;

        let mode = match (battle.phase(), button) {
            (Phase::Deployment, PointerButton::Primary) => battle
                .living_player_at(position)
                .map_or(PressMode::Free, PressMode::UnitDrag),
            (Phase::Combat, PointerButton::Primary) => PressMode::SelectionBox,
            _ => PressMode::Free,
        };

        self.press = Some(PressState {
            button,
            origin: position,
            mode,
        });
    }

    /// Record pointer movement.
    pub fn pointer_moved(&mut self, position: Vec2Fixed) {
        self.cursor = position;
    }

    /// Record a pointer release, producing zero or more commands.
    pub fn pointer_released(
        &mut self,
        battle: &Battle,
        button: PointerButton,
        position: Vec2Fixed,
    ) -> Vec<BattleCommand> {
        self.cursor = position;

        let Some(press) = self.press.take() else {
            return Vec::new();
        };
        if press.button != button {
            // Mismatched release; restore and wait for the right button
            self.press = Some(press);
            return Vec::new();
        }

        let travel_sq = press.origin.distance_squared(position);
        let is_click = travel_sq < click_threshold() * click_threshold();

        match press.mode {
            PressMode::UnitDrag(id) => {
                if is_click {
                    // Sub-threshold drag on a unit: fall through to click
                    // handling (which never places on top of a unit)
                    self.deployment_click(battle, position)
                } else {
                    let drop = clamp_to_friendly_half(battle, position);
                    vec![BattleCommand::RepositionUnit { id, position: drop }]
                }
            }
            PressMode::SelectionBox => {
                if is_click {
                    self.combat_click(battle, button, position)
                } else {
                    vec![box_selection(battle, press.origin, position)]
                }
            }
            PressMode::Free => {
                if !is_click {
                    return Vec::new();
                }
                match battle.phase() {
                    Phase::Deployment => self.deployment_click(battle, position),
                    Phase::Combat => self.combat_click(battle, button, position),
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Translate a key action, honoring the phase gates.
    pub fn key_pressed(&mut self, battle: &Battle, action: KeyAction) -> Option<BattleCommand> {
        if battle.phase() != Phase::Combat {
            return None;
        }

        match action {
            KeyAction::TogglePause => Some(BattleCommand::TogglePause),
            KeyAction::SelectAll => Some(BattleCommand::SelectAll),
            KeyAction::Deselect => Some(BattleCommand::DeselectAll),
        }
    }

    fn deployment_click(&self, battle: &Battle, position: Vec2Fixed) -> Vec<BattleCommand> {
        // Clicking an existing unit never places a new one
        if battle.living_player_at(position).is_some() {
            return Vec::new();
        }

        match battle.active_placement() {
            Some(archetype) => vec![BattleCommand::PlaceUnit {
                archetype,
                position,
            }],
            None => Vec::new(),
        }
    }

    fn combat_click(
        &self,
        battle: &Battle,
        button: PointerButton,
        position: Vec2Fixed,
    ) -> Vec<BattleCommand> {
        let selected = battle.selected_player_ids();

        match button {
            PointerButton::Primary => {
                if let Some(id) = battle.living_player_at(position) {
                    return vec![BattleCommand::Select { ids: vec![id] }];
                }
                if let Some(enemy) = battle.living_enemy_at(position) {
                    if !selected.is_empty() {
                        return vec![BattleCommand::SetFocus {
                            ids: selected,
                            target: enemy,
                        }];
                    }
                }
                vec![BattleCommand::DeselectAll]
            }
            PointerButton::Secondary => {
                if let Some(enemy) = battle.living_enemy_at(position) {
                    if !selected.is_empty() {
                        return vec![BattleCommand::SetFocus {
                            ids: selected,
                            target: enemy,
                        }];
                    }
                }
                if !selected.is_empty() {
                    return vec![BattleCommand::MoveTo {
                        ids: selected,
                        target: position,
                    }];
                }
                vec![BattleCommand::DeselectAll]
            }
        }
    }
}

/// Clamp a deployment drop point into the friendly half of the field.
fn clamp_to_friendly_half(battle: &Battle, position: Vec2Fixed) -> Vec2Fixed {
    let field = battle.field();
    Vec2Fixed::new(
        position.x.clamp(Fixed::ZERO, field.center_x()),
        position.y.clamp(Fixed::ZERO, field.height),
    )
}

/// Box selection: every living player unit within the inclusive bounds.
///
/// An empty box still replaces (clears) the selection, matching the
/// deselect-then-select semantics of a drag release.
fn box_selection(battle: &Battle, corner_a: Vec2Fixed, corner_b: Vec2Fixed) -> BattleCommand {
    let min_x = corner_a.x.min(corner_b.x);
    let max_x = corner_a.x.max(corner_b.x);
    let min_y = corner_a.y.min(corner_b.y);
    let max_y = corner_a.y.max(corner_b.y);

    let ids: Vec<UnitId> = battle
        .units()
        .iter()
        .filter(|u| {
            u.is_alive()
                && u.team == crate::unit::Team::Player
                && u.position.x >= min_x
                && u.position.x <= max_x
                && u.position.y >= min_y
                && u.position.y <= max_y
        })
        .map(|u| u.id)
        .collect();

    BattleCommand::Select { ids }
}
