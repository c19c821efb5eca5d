//! Error types for the battle simulation.
//!
//! Gameplay commands never error: invalid commands are rejected as
//! notices on the tick report. These errors cover the programmer-facing
//! surface only - explicit phase transitions and data-file parsing.

use thiserror::Error;

use crate::battle::Phase;
use crate::unit::UnitId;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for battle simulation API misuse.
#[derive(Debug, Error)]
pub enum BattleError {
    /// Unit identifier does not resolve.
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    /// An operation was invoked in the wrong phase.
    #[error("operation requires the {expected:?} phase (current phase: {actual:?})")]
    PhaseMismatch {
        /// Phase the operation is valid in.
        expected: Phase,
        /// Phase the battle is actually in.
        actual: Phase,
    },

    /// Battle start requested with no units in the army.
    #[error("cannot start a battle with an empty army")]
    EmptyArmy,

    /// Combat start requested before all units were placed.
    #[error("deployment incomplete: {remaining} units left to place")]
    DeploymentIncomplete {
        /// Units still waiting for placement.
        remaining: u32,
    },

    /// Data file parsing error.
    #[error("failed to parse archetype data: {message}")]
    DataParseError {
        /// Parser error message.
        message: String,
    },
}
