//! Simulation benchmarks for skirmish_core.
//!
//! Run with: `cargo bench -p skirmish_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish_core::prelude::*;

/// A populated world: two bases, a generator under construction, and two
/// packs of units marching at each other.
fn populated_world() -> Simulation {
    let mut sim = Simulation::new(SimConfig::default());

    for i in 0..20i32 {
        let x = Fixed::from_num(150 + i * 20);
        let player_unit = sim.spawn_entity(
            EntityKind::Attacker,
            Faction::Player,
            Vec2Fixed::new(x, Fixed::from_num(120)),
        );
        let enemy_unit = sim.spawn_entity(
            EntityKind::Worker,
            Faction::Enemy,
            Vec2Fixed::new(x, Fixed::from_num(380)),
        );
        sim.submit_command(
            Faction::Player,
            Command::Attack {
                units: vec![player_unit],
                target: enemy_unit,
            },
        );
    }

    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::Generator,
            position: Vec2Fixed::new(Fixed::from_num(160), Fixed::from_num(200)),
        },
    );

    sim
}

pub fn simulation_benchmark(c: &mut Criterion) {
    c.bench_function("tick_populated_world", |b| {
        b.iter_batched(
            populated_world,
            |mut sim| {
                for _ in 0..50 {
                    black_box(sim.tick());
                }
                sim
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("state_hash", |b| {
        let mut sim = populated_world();
        sim.tick();
        b.iter(|| black_box(sim.state_hash()))
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
