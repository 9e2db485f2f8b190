//! Determinism testing harness.
//!
//! The simulation promises: same config + same command stream = same
//! world, bit for bit. Sources of non-determinism this harness exists to
//! catch:
//!
//! - **Floating-point math**: different CPUs round differently. The core
//!   uses fixed-point throughout; a stray float would show up here.
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Systems must always iterate in sorted entity-id order.
//! - **Wall-clock time**: deferred effects must be tick-counted, never
//!   timer-driven.
//!
//! The checks run a scenario several times (and in parallel threads) and
//! compare [`Simulation::state_hash`] at the end — one unique hash or the
//! test fails.

use std::thread;

use skirmish_core::prelude::*;

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
    /// All unique hashes (should be exactly 1).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert determinism with a detailed failure message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                self.unique_hashes().len(),
                self.hashes
            );
        }
    }
}

/// Run a scenario `runs` times for `ticks` ticks each and compare state
/// hashes.
pub fn verify_determinism<F>(runs: usize, ticks: u64, setup: F) -> DeterminismResult
where
    F: Fn() -> Simulation,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut sim = setup();
        for _ in 0..ticks {
            sim.tick();
        }
        hashes.push(sim.state_hash());
    }

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks,
    }
}

/// Run `num_sims` copies of a scenario on parallel threads.
///
/// Catches non-determinism that only shows under different thread
/// scheduling or memory layout (a randomized hasher, most commonly).
pub fn verify_parallel_determinism<F>(
    setup: F,
    num_sims: usize,
    ticks: u64,
) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup();
                    for _ in 0..ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect::<Vec<u64>>()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks,
    }
}

/// Compare two runs tick-by-tick and report the first tick where they
/// diverge, or `None` if they never do.
pub fn find_first_divergence<F>(setup: F, ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup();
    let mut sim2 = setup();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=ticks {
        sim1.tick();
        sim2.tick();
        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify a serialize/deserialize round trip preserves the state hash.
pub fn verify_serialization_roundtrip<F>(setup: F, ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut sim = setup();
    for _ in 0..ticks {
        sim.tick();
    }

    let hash_before = sim.state_hash();
    let Ok(bytes) = sim.serialize() else {
        return false;
    };
    let Ok(restored) = Simulation::deserialize(&bytes) else {
        return false;
    };
    restored.state_hash() == hash_before
}

/// Proptest strategies for randomized but reproducible inputs.
pub mod strategies {
    use proptest::prelude::*;

    use skirmish_core::prelude::*;

    /// A point inside the default 800x600 battlefield.
    pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
        (0i32..800, 0i32..600)
            .prop_map(|(x, y)| Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)))
    }

    /// Any trainable unit kind.
    pub fn arb_unit_kind() -> impl Strategy<Value = EntityKind> {
        prop_oneof![Just(EntityKind::Worker), Just(EntityKind::Attacker)]
    }

    /// Any placeable building kind.
    pub fn arb_building_kind() -> impl Strategy<Value = EntityKind> {
        prop_oneof![
            Just(EntityKind::Barracks),
            Just(EntityKind::House),
            Just(EntityKind::Generator),
        ]
    }

    /// An arbitrary command. Entity ids are drawn from a small range so
    /// some orders hit real units and some are rejected — both paths must
    /// be deterministic.
    pub fn arb_command() -> impl Strategy<Value = Command> {
        prop_oneof![
            (proptest::collection::vec(1u64..20, 1..4), arb_position())
                .prop_map(|(units, destination)| Command::Move { units, destination }),
            (proptest::collection::vec(1u64..20, 1..4), 1u64..20)
                .prop_map(|(units, target)| Command::Attack { units, target }),
            arb_unit_kind().prop_map(|kind| Command::Train { kind }),
            (arb_building_kind(), arb_position())
                .prop_map(|(kind, position)| Command::PlaceBuilding { kind, position }),
            arb_unit_kind().prop_map(|kind| Command::CancelTrain { kind }),
        ]
    }

    /// A sequence of commands to feed a world.
    pub fn arb_command_sequence(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
        proptest::collection::vec(arb_command(), 0..max_len)
    }
}
