//! # Battle Core
//!
//! Deterministic skirmish battle simulation core.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness (enemy spawn jitter flows through a seeded PRNG)
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless batch runs and CI verification
//! - Single-session reproducibility from a battle seed
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`battle`] - Orchestrator and phase state machine
//! - [`unit`] - Combatant state and intrinsic operations
//! - [`movement`] - Movement integration and collision resolution
//! - [`combat`] - Attack resolution and kill bookkeeping
//! - [`ai`] - Tactical controller for the enemy roster
//! - [`input`] - Pointer/keyboard to command translation
//! - [`command`] - The closed command set and rejection notices
//! - [`roster`] - Army composition and deployment bookkeeping
//! - [`archetype`] - Data-driven combatant stat tables
//! - [`math`] - Fixed-point math utilities
//!
//! ## Control flow
//!
//! The host calls [`battle::Battle::tick`] once per rendered frame.
//! Each tick drains queued commands, then runs movement + collision,
//! combat resolution, the throttled AI pass and the victory check, in
//! that order. Input events are translated to commands between frames
//! by [`input::InputTranslator`] and never touch simulation state
//! directly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod archetype;
pub mod battle;
pub mod battlefield;
pub mod combat;
pub mod command;
pub mod error;
pub mod input;
pub mod math;
pub mod movement;
pub mod roster;
pub mod rng;
pub mod snapshot;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::archetype::{Archetype, ArchetypeStats, ArchetypeTable, Shape};
    pub use crate::battle::{Battle, BattleConfig, Outcome, Phase, TickReport, TICK_RATE};
    pub use crate::battlefield::Battlefield;
    pub use crate::combat::{DeathEvent, HitEvent};
    pub use crate::command::{BattleCommand, RejectReason, RejectedCommand};
    pub use crate::error::{BattleError, Result};
    pub use crate::input::{InputTranslator, KeyAction, PointerButton};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::roster::{ArmySelection, DeploymentQueue};
    pub use crate::snapshot::{BattleView, UnitView};
    pub use crate::unit::{Team, Unit, UnitId};
}
