//! Test fixtures and helpers.
//!
//! Pre-built worlds and fixed-point conveniences for consistent testing
//! across crates.

use fixed::types::I32F32;

use skirmish_core::prelude::*;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Shorthand for a world point.
#[must_use]
pub fn at(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(y))
}

/// A config with 100ms ticks and short build times, so scenarios resolve
/// in tens of ticks instead of thousands.
#[must_use]
pub fn fast_config() -> SimConfig {
    SimConfig {
        tick_interval_ms: 100,
        economy_interval_ms: 500,
        unit_build_time_ms: 200,
        barracks_build_time_ms: 1000,
        house_build_time_ms: 700,
        generator_build_time_ms: 500,
        ..SimConfig::default()
    }
}

/// A battle in progress: three player attackers ordered onto two enemy
/// workers near the enemy base.
#[must_use]
pub fn battle_scenario() -> Simulation {
    let mut sim = Simulation::new(fast_config());

    let targets = [
        sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(600, 380)),
        sim.spawn_entity(EntityKind::Worker, Faction::Enemy, at(640, 420)),
    ];
    for (i, &target) in targets.iter().chain(targets.first()).enumerate() {
        let hunter =
            sim.spawn_entity(EntityKind::Attacker, Faction::Player, at(150, 100 + i as i32 * 20));
        sim.submit_command(
            Faction::Player,
            Command::Attack {
                units: vec![hunter],
                target,
            },
        );
    }

    sim
}

/// An economy in motion: a generator and a house under construction plus
/// a queued worker train.
#[must_use]
pub fn economy_scenario() -> Simulation {
    let mut sim = Simulation::new(fast_config());
    sim.submit_command(
        Faction::Player,
        Command::PlaceBuilding {
            kind: EntityKind::Generator,
            position: at(160, 120),
        },
    );
    sim.submit_command(
        Faction::Player,
        Command::Train {
            kind: EntityKind::Worker,
        },
    );
    sim
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_scenario_shape() {
        let sim = battle_scenario();
        assert_eq!(sim.entities().ids_by_kind(EntityKind::Attacker).len(), 3);
        assert_eq!(sim.entities().ids_by_faction(Faction::Enemy).len(), 3); // base + 2 workers
    }

    #[test]
    fn test_fixed_helpers_agree() {
        assert_eq!(fixed(3), fixed_f(3.0));
    }
}
