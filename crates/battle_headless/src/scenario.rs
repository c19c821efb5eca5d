//! Scenario loading and configuration.
//!
//! Scenarios define a headless battle: the army composition (mirrored
//! onto the enemy side by the core), the scripted player controller,
//! the seed and the tick budget.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use battle_core::prelude::*;

use crate::strategies::ScriptKind;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A complete headless battle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Battle seed (enemy spawn jitter).
    pub seed: u64,
    /// Infantry count in the player army.
    pub infantry: u32,
    /// Archer count in the player army.
    pub archers: u32,
    /// Cavalry count in the player army.
    pub cavalry: u32,
    /// Scripted player controller.
    pub script: ScriptKind,
    /// Maximum ticks before the run counts as a timeout.
    pub max_ticks: u64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError`] when the file is missing, unreadable
    /// or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ParseError`] on malformed RON.
    pub fn from_ron_str(ron: &str) -> std::result::Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// The standard mixed-composition skirmish.
    #[must_use]
    pub fn skirmish() -> Self {
        Self {
            name: "Standard Skirmish".to_string(),
            description: "Mixed line with an advancing player script".to_string(),
            seed: 0,
            infantry: 6,
            archers: 4,
            cavalry: 4,
            script: ScriptKind::Advance,
            max_ticks: 36_000, // 10 minutes at 60 tps
        }
    }

    /// A small all-infantry brawl that resolves quickly.
    #[must_use]
    pub fn brawl() -> Self {
        Self {
            name: "Infantry Brawl".to_string(),
            description: "Small symmetric infantry fight".to_string(),
            seed: 0,
            infantry: 5,
            archers: 0,
            cavalry: 0,
            script: ScriptKind::Advance,
            max_ticks: 18_000,
        }
    }

    /// The composition as per-archetype counts.
    #[must_use]
    pub fn composition(&self) -> [(Archetype, u32); 3] {
        [
            (Archetype::Infantry, self.infantry),
            (Archetype::Archers, self.archers),
            (Archetype::Cavalry, self.cavalry),
        ]
    }

    /// Total units in the player army.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.infantry + self.archers + self.cavalry
    }
}
