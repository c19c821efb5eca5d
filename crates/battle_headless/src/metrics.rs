//! Per-battle metrics for balance analysis.

use serde::{Deserialize, Serialize};

use battle_core::prelude::*;

/// Complete metrics for a single battle run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Battle seed used.
    pub seed: u64,
    /// Combat ticks elapsed.
    pub duration_ticks: u64,
    /// Outcome from the player's perspective (None = timeout).
    pub outcome: Option<String>,
    /// How the run ended.
    pub end_condition: String,
    /// Final score.
    pub score: u32,
    /// Enemy units killed.
    pub enemy_kills: u32,
    /// Player units lost.
    pub player_losses: u32,
    /// Living player units at the end.
    pub player_survivors: u32,
    /// Living enemy units at the end.
    pub enemy_survivors: u32,
    /// Attacks that landed over the whole run.
    pub total_hits: u64,
    /// Final simulation state hash (for determinism validation).
    pub final_state_hash: u64,
}

impl BattleMetrics {
    /// Collect final metrics from a finished (or timed-out) battle.
    #[must_use]
    pub fn collect(scenario: &str, seed: u64, battle: &Battle, total_hits: u64) -> Self {
        let outcome = battle.outcome().map(|o| outcome_label(o).to_string());
        let end_condition = if battle.outcome().is_some() {
            "elimination".to_string()
        } else {
            "timeout".to_string()
        };

        Self {
            scenario: scenario.to_string(),
            seed,
            duration_ticks: battle.combat_ticks(),
            outcome,
            end_condition,
            score: battle.score(),
            enemy_kills: battle.enemy_kills(),
            player_losses: battle.player_losses(),
            player_survivors: battle.living_count(Team::Player) as u32,
            enemy_survivors: battle.living_count(Team::Enemy) as u32,
            total_hits,
            final_state_hash: battle.state_hash(),
        }
    }
}

/// Stable string label for an outcome.
#[must_use]
pub fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Victory => "victory",
        Outcome::Defeat => "defeat",
        Outcome::Draw => "draw",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_test_utils::fixtures::deployed_skirmish;

    #[test]
    fn test_collect_from_a_live_battle_is_a_timeout() {
        let battle = deployed_skirmish(2, 4);
        let metrics = BattleMetrics::collect("test", 4, &battle, 0);

        assert_eq!(metrics.outcome, None);
        assert_eq!(metrics.end_condition, "timeout");
        assert_eq!(metrics.player_survivors, 2);
        assert_eq!(metrics.enemy_survivors, 2);
    }

    #[test]
    fn test_metrics_serialize_to_json() {
        let battle = deployed_skirmish(2, 4);
        let metrics = BattleMetrics::collect("test", 4, &battle, 12);
        let json = serde_json::to_string(&metrics).unwrap();
        let restored: BattleMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, 4);
        assert_eq!(restored.total_hits, 12);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(Outcome::Victory), "victory");
        assert_eq!(outcome_label(Outcome::Defeat), "defeat");
        assert_eq!(outcome_label(Outcome::Draw), "draw");
    }
}
