//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A battle must be fully reproducible from its seed within a session.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different
//!   results. The core uses fixed-point arithmetic throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core stores units in a `Vec` and iterates in arena order.
//!
//! - **System randomness**: Spawn jitter flows through the seeded PRNG;
//!   nothing else is random.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual phase determinism (movement, combat, AI)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full battle scenarios are reproducible
//! 4. **Parallel tests**: Running N battles in parallel all match

use std::thread;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute a state hash
///
/// # Example
///
/// ```
/// use battle_test_utils::determinism::verify_determinism;
/// use battle_test_utils::fixtures::deployed_skirmish;
///
/// let result = verify_determinism(
///     3,
///     100,
///     || deployed_skirmish(2, 7),
///     |battle| {
///         battle.tick();
///     },
///     |battle| battle.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Simplified determinism verification for [`battle_core::battle::Battle`].
///
/// Runs the battle twice with identical setup and verifies the final
/// state hashes match exactly.
pub fn verify_battle_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> battle_core::battle::Battle,
{
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |battle| {
            battle.tick();
        },
        battle_core::battle::Battle::state_hash,
    );
    result.is_deterministic
}

/// Compare two battle runs tick-by-tick, finding the first divergence.
///
/// Useful for debugging non-determinism by finding exactly when the
/// runs start to differ.
///
/// # Returns
///
/// `None` if the runs are identical, `Some(tick)` if they diverge at
/// that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> battle_core::battle::Battle,
{
    let mut battle1 = setup_fn();
    let mut battle2 = setup_fn();

    if battle1.state_hash() != battle2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        battle1.tick();
        battle2.tick();

        if battle1.state_hash() != battle2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Final state hash from each battle.
    pub hashes: Vec<u64>,
    /// Number of ticks each battle ran.
    pub ticks: u64,
    /// Number of battles run.
    pub num_runs: usize,
}

impl ParallelRunResult {
    /// Check if all runs produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all runs matched.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_runs,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run N battles in parallel on scoped threads and collect final hashes.
///
/// This catches non-determinism that only manifests under thread
/// scheduling variations or memory layout differences.
pub fn run_parallel_battles<F>(setup_fn: F, num_runs: usize, num_ticks: u64) -> ParallelRunResult
where
    F: Fn() -> battle_core::battle::Battle + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| {
                s.spawn(|| {
                    let mut battle = setup_fn();
                    for _ in 0..num_ticks {
                        battle.tick();
                    }
                    battle.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelRunResult {
        hashes,
        ticks: num_ticks,
        num_runs,
    }
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of simulation determinism.
pub mod strategies {
    use proptest::prelude::*;

    use battle_core::prelude::*;

    /// Generate a battlefield position on the friendly half.
    pub fn arb_friendly_position() -> impl Strategy<Value = Vec2Fixed> {
        (30i32..570, 30i32..670)
            .prop_map(|(x, y)| Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)))
    }

    /// Generate any battlefield position.
    pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
        (0i32..1200, 0i32..700)
            .prop_map(|(x, y)| Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)))
    }

    /// Generate an archetype.
    pub fn arb_archetype() -> impl Strategy<Value = Archetype> {
        prop_oneof![
            Just(Archetype::Infantry),
            Just(Archetype::Archers),
            Just(Archetype::Cavalry),
        ]
    }

    /// Generate a small army composition (1..=count_max units per archetype).
    pub fn arb_composition(count_max: u32) -> impl Strategy<Value = Vec<Archetype>> {
        proptest::collection::vec(arb_archetype(), 1..=(count_max as usize))
    }

    /// Generate a combat-phase command against arbitrary unit ids.
    pub fn arb_combat_command(max_units: u32) -> impl Strategy<Value = BattleCommand> {
        let ids = proptest::collection::vec(0..max_units, 0..4);
        prop_oneof![
            Just(BattleCommand::SelectAll),
            Just(BattleCommand::DeselectAll),
            (ids.clone(), arb_position())
                .prop_map(|(ids, target)| BattleCommand::MoveTo { ids, target }),
            (ids, 0..max_units)
                .prop_map(|(ids, target)| BattleCommand::SetFocus { ids, target }),
        ]
    }
}
