//! Army composition and deployment bookkeeping.
//!
//! Two independent lifecycles share the per-archetype counts: the
//! pre-battle budget-constrained [`ArmySelection`] (mutable during
//! army-building, frozen at battle start) and the [`DeploymentQueue`]
//! of remaining-to-place counts (decremented as units are placed,
//! never increasing).

use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, ArchetypeTable};
use crate::battlefield::Battlefield;
use crate::math::{Fixed, Vec2Fixed};
use crate::rng::SeededRng;

/// Default army-building budget.
pub const DEFAULT_BUDGET: u32 = 1000;

/// Budget-constrained army composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmySelection {
    budget: u32,
    counts: [u32; 3],
}

impl ArmySelection {
    /// Start an empty selection with the given budget.
    #[must_use]
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            counts: [0; 3],
        }
    }

    /// Budget left to spend.
    #[must_use]
    pub fn budget_remaining(&self) -> u32 {
        self.budget
    }

    /// Selected count for one archetype.
    #[must_use]
    pub fn count(&self, archetype: Archetype) -> u32 {
        self.counts[archetype.index()]
    }

    /// Total units selected.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Whether nothing has been selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Add one unit if the budget allows. Returns whether it was added.
    pub fn add(&mut self, archetype: Archetype, table: &ArchetypeTable) -> bool {
        let cost = table.cost(archetype);
        if self.budget < cost {
            return false;
        }
        self.budget -= cost;
        self.counts[archetype.index()] += 1;
        true
    }

    /// Remove one unit, refunding its cost. Returns whether one was removed.
    pub fn remove(&mut self, archetype: Archetype, table: &ArchetypeTable) -> bool {
        if self.counts[archetype.index()] == 0 {
            return false;
        }
        self.counts[archetype.index()] -= 1;
        self.budget += table.cost(archetype);
        true
    }

    /// Per-archetype counts in stable order.
    #[must_use]
    pub fn composition(&self) -> [(Archetype, u32); 3] {
        [
            (Archetype::Infantry, self.counts[0]),
            (Archetype::Archers, self.counts[1]),
            (Archetype::Cavalry, self.counts[2]),
        ]
    }
}

impl Default for ArmySelection {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

/// Remaining-to-place counts during deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentQueue {
    remaining: [u32; 3],
    active: Option<Archetype>,
}

impl DeploymentQueue {
    /// Freeze an army selection into a deployment queue, auto-selecting
    /// the first archetype with units to place.
    #[must_use]
    pub fn new(selection: &ArmySelection) -> Self {
        let mut queue = Self {
            remaining: [
                selection.count(Archetype::Infantry),
                selection.count(Archetype::Archers),
                selection.count(Archetype::Cavalry),
            ],
            active: None,
        };
        queue.auto_advance();
        queue
    }

    /// Units of one archetype still waiting for placement.
    #[must_use]
    pub fn remaining(&self, archetype: Archetype) -> u32 {
        self.remaining[archetype.index()]
    }

    /// Total units still waiting for placement.
    #[must_use]
    pub fn total_remaining(&self) -> u32 {
        self.remaining.iter().sum()
    }

    /// Whether every unit has been placed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_remaining() == 0
    }

    /// The archetype placement clicks currently produce.
    #[must_use]
    pub fn active(&self) -> Option<Archetype> {
        self.active
    }

    /// Switch the active archetype. Only archetypes with units remaining
    /// can be selected.
    pub fn select(&mut self, archetype: Archetype) -> bool {
        if self.remaining(archetype) == 0 {
            return false;
        }
        self.active = Some(archetype);
        true
    }

    /// Consume one unit of an archetype for placement.
    ///
    /// When the active archetype runs out, the selection auto-advances
    /// to the next archetype with units remaining (or clears).
    pub fn take(&mut self, archetype: Archetype) -> bool {
        if self.remaining(archetype) == 0 {
            return false;
        }
        self.remaining[archetype.index()] -= 1;

        if self.remaining(archetype) == 0 && self.active == Some(archetype) {
            self.auto_advance();
        }
        true
    }

    fn auto_advance(&mut self) {
        self.active = Archetype::ALL
            .into_iter()
            .find(|a| self.remaining(*a) > 0);
    }
}

/// Row-filling spawn layout for the enemy roster.
///
/// Units fill a column at the enemy spawn edge top to bottom with fixed
/// spacing and seeded horizontal jitter, wrapping to a fresh column
/// further right once the side fills.
#[must_use]
pub fn enemy_spawn_layout(
    selection: &ArmySelection,
    field: &Battlefield,
    rng: &mut SeededRng,
) -> Vec<(Archetype, Vec2Fixed)> {
    let spacing = Fixed::from_num(60);
    let margin = Fixed::from_num(100);

    let mut column_x = field.enemy_spawn_x();
    let mut y = margin;
    let mut layout = Vec::with_capacity(selection.total() as usize);

    for (archetype, count) in selection.composition() {
        for _ in 0..count {
            let x = column_x + Fixed::from_num(rng.jitter(100));
            layout.push((archetype, Vec2Fixed::new(x, y)));

            y += spacing;
            if y > field.height - margin {
                y = margin;
                column_x += Fixed::from_num(50);
            }
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_decrements_and_refunds() {
        let table = ArchetypeTable::standard();
        let mut army = ArmySelection::default();

        assert!(army.add(Archetype::Cavalry, &table));
        assert_eq!(army.budget_remaining(), 900);

        assert!(army.remove(Archetype::Cavalry, &table));
        assert_eq!(army.budget_remaining(), 1000);

        // Nothing left to remove: no refund
        assert!(!army.remove(Archetype::Cavalry, &table));
        assert_eq!(army.budget_remaining(), 1000);
    }

    #[test]
    fn test_budget_never_goes_negative() {
        let table = ArchetypeTable::standard();
        let mut army = ArmySelection::new(120);

        assert!(army.add(Archetype::Cavalry, &table)); // 20 left
        assert!(!army.add(Archetype::Infantry, &table)); // costs 50
        assert_eq!(army.budget_remaining(), 20);
        assert_eq!(army.total(), 1);
    }

    #[test]
    fn test_deployment_takes_exactly_the_selected_count() {
        let table = ArchetypeTable::standard();
        let mut army = ArmySelection::default();
        army.add(Archetype::Infantry, &table);
        army.add(Archetype::Infantry, &table);
        army.add(Archetype::Infantry, &table);

        let mut queue = DeploymentQueue::new(&army);
        assert_eq!(queue.remaining(Archetype::Infantry), 3);

        for _ in 0..3 {
            assert!(queue.take(Archetype::Infantry));
        }
        assert!(!queue.take(Archetype::Infantry));
        assert!(queue.is_complete());
    }

    #[test]
    fn test_auto_advance_to_next_available_archetype() {
        let table = ArchetypeTable::standard();
        let mut army = ArmySelection::default();
        army.add(Archetype::Infantry, &table);
        army.add(Archetype::Cavalry, &table);

        let mut queue = DeploymentQueue::new(&army);
        assert_eq!(queue.active(), Some(Archetype::Infantry));

        assert!(queue.take(Archetype::Infantry));
        assert_eq!(queue.active(), Some(Archetype::Cavalry));

        assert!(queue.take(Archetype::Cavalry));
        assert_eq!(queue.active(), None);
    }

    #[test]
    fn test_cannot_select_an_exhausted_archetype() {
        let table = ArchetypeTable::standard();
        let mut army = ArmySelection::default();
        army.add(Archetype::Archers, &table);

        let mut queue = DeploymentQueue::new(&army);
        assert!(!queue.select(Archetype::Infantry));
        assert!(queue.select(Archetype::Archers));
    }

    #[test]
    fn test_enemy_layout_mirrors_composition() {
        let table = ArchetypeTable::standard();
        let field = Battlefield::standard();
        let mut army = ArmySelection::default();
        army.add(Archetype::Infantry, &table);
        army.add(Archetype::Infantry, &table);
        army.add(Archetype::Archers, &table);

        let mut rng = SeededRng::new(9);
        let layout = enemy_spawn_layout(&army, &field, &mut rng);

        assert_eq!(layout.len(), 3);
        let infantry = layout
            .iter()
            .filter(|(a, _)| *a == Archetype::Infantry)
            .count();
        assert_eq!(infantry, 2);

        // Everything spawns on the enemy side of the field
        for (_, pos) in &layout {
            assert!(pos.x > field.center_x());
        }
    }

    #[test]
    fn test_enemy_layout_is_seed_deterministic() {
        let table = ArchetypeTable::standard();
        let field = Battlefield::standard();
        let mut army = ArmySelection::default();
        for _ in 0..5 {
            army.add(Archetype::Infantry, &table);
        }

        let layout_a = enemy_spawn_layout(&army, &field, &mut SeededRng::new(3));
        let layout_b = enemy_spawn_layout(&army, &field, &mut SeededRng::new(3));
        assert_eq!(layout_a, layout_b);
    }

    #[test]
    fn test_enemy_layout_wraps_to_a_new_column() {
        let table = ArchetypeTable::standard();
        let field = Battlefield::standard();
        let mut army = ArmySelection::new(10_000);
        // 700-tall field holds 9 rows between the margins; force a wrap
        for _ in 0..12 {
            army.add(Archetype::Infantry, &table);
        }

        let mut rng = SeededRng::new(1);
        let layout = enemy_spawn_layout(&army, &field, &mut rng);

        let first_row_y = layout[0].1.y;
        let wrapped = layout.iter().skip(1).any(|(_, p)| p.y == first_row_y);
        assert!(wrapped, "expected the layout to wrap back to the top row");
    }
}
