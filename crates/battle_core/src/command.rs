//! Player commands and their rejection notices.
//!
//! Input handling never mutates simulation state directly. Every input
//! event is translated into one of a small closed set of commands,
//! enqueued on the battle, and drained once per tick before the
//! simulation phases run. Commands drain even while paused - pause gates
//! only the simulation phases - which keeps selection and orders live
//! during a pause.
//!
//! Invalid commands never raise: they are recorded as [`RejectedCommand`]
//! notices on the tick report so the UI can surface a transient message.

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::math::Vec2Fixed;
use crate::unit::UnitId;

/// A command issued to the battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleCommand {
    /// Replace the selection with exactly these units.
    Select {
        /// Units to select.
        ids: Vec<UnitId>,
    },
    /// Select every living player unit.
    SelectAll,
    /// Clear the selection.
    DeselectAll,
    /// Order units to a destination.
    MoveTo {
        /// Units to move.
        ids: Vec<UnitId>,
        /// Destination in battlefield coordinates.
        target: Vec2Fixed,
    },
    /// Assign a focus target to units.
    SetFocus {
        /// Attacking units.
        ids: Vec<UnitId>,
        /// The enemy to prioritize.
        target: UnitId,
    },
    /// Place a new unit during deployment.
    PlaceUnit {
        /// Archetype to place.
        archetype: Archetype,
        /// Placement point.
        position: Vec2Fixed,
    },
    /// Move an already-placed unit during deployment.
    RepositionUnit {
        /// The unit being repositioned.
        id: UnitId,
        /// Requested drop point.
        position: Vec2Fixed,
    },
    /// Switch the archetype used for subsequent placements.
    SelectPlacementArchetype(Archetype),
    /// Suspend or resume simulation ticking.
    TogglePause,
}

/// Why a command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The command is not valid in the current phase.
    WrongPhase,
    /// Placement point outside the friendly half of the battlefield.
    OutOfZone,
    /// Placement point within the minimum spacing of another friendly unit.
    TooClose,
    /// No units of the requested archetype remain to place.
    NoneRemaining,
    /// The referenced unit does not exist or is dead.
    InvalidUnit,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            RejectReason::WrongPhase => "not available in this phase",
            RejectReason::OutOfZone => "outside your deployment zone",
            RejectReason::TooClose => "too close to another unit",
            RejectReason::NoneRemaining => "no more units of that type",
            RejectReason::InvalidUnit => "that unit is gone",
        };
        f.write_str(message)
    }
}

/// A command that was rejected, with the reason to surface to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCommand {
    /// The offending command.
    pub command: BattleCommand,
    /// Why it was refused.
    pub reason: RejectReason,
}
