//! Simulation configuration.
//!
//! [`SimConfig`] is a pure pass-through value bag: unit speeds, costs,
//! build times, production rate, cap values, tick cadence, and world
//! layout. It is supplied once at world construction and never mutated
//! afterwards; no logic lives here beyond per-kind lookups.
//!
//! The struct is serde-derived so drivers can load overrides from RON:
//!
//! ```ron
//! SimConfig(
//!     tick_interval_ms: 16,
//!     economy_interval_ms: 1000,
//!     starting_energy: 50,
//!     worker_cost: 10,
//!     attacker_cost: 20,
//!     // ... remaining fields as in Default
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Immutable world configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Simulated milliseconds per tick.
    pub tick_interval_ms: u32,
    /// Simulated milliseconds between economy ticks. The clock converts
    /// this into a tick ratio with integer division.
    pub economy_interval_ms: u32,
    /// Energy credited per completed generator per economy tick.
    pub generator_production: i32,
    /// Energy each faction starts with.
    pub starting_energy: i32,

    /// Cost of a worker.
    pub worker_cost: i32,
    /// Cost of an attacker.
    pub attacker_cost: i32,
    /// Time from a valid Train command to the unit spawning.
    pub unit_build_time_ms: u32,

    /// Cost of a barracks.
    pub barracks_cost: i32,
    /// Barracks construction time.
    pub barracks_build_time_ms: u32,
    /// Cost of a house.
    pub house_cost: i32,
    /// House construction time.
    pub house_build_time_ms: u32,
    /// Cost of a generator.
    pub generator_cost: i32,
    /// Generator construction time.
    pub generator_build_time_ms: u32,

    /// Unit cap each faction starts with.
    pub initial_unit_cap: u32,
    /// Cap increase per completed house.
    pub house_cap_increase: u32,

    /// Damage dealt per combat arrival.
    pub attack_damage: u32,
    /// Starting health of units.
    pub unit_health: u32,
    /// Starting health of buildings.
    pub building_health: u32,
    /// Starting health of bases.
    pub base_health: u32,

    /// Worker movement speed (distance per tick).
    #[serde(with = "fixed_serde")]
    pub worker_speed: Fixed,
    /// Attacker movement speed (distance per tick).
    #[serde(with = "fixed_serde")]
    pub attacker_speed: Fixed,

    /// Worker diameter.
    #[serde(with = "fixed_serde")]
    pub worker_extent: Fixed,
    /// Attacker diameter.
    #[serde(with = "fixed_serde")]
    pub attacker_extent: Fixed,
    /// Building diameter.
    #[serde(with = "fixed_serde")]
    pub building_extent: Fixed,
    /// Base diameter.
    #[serde(with = "fixed_serde")]
    pub base_extent: Fixed,

    /// Gap between a base's edge and a freshly trained unit.
    #[serde(with = "fixed_serde")]
    pub spawn_offset: Fixed,

    /// Player base position.
    pub player_base_position: Vec2Fixed,
    /// Enemy base position.
    pub enemy_base_position: Vec2Fixed,
}

impl SimConfig {
    /// Training/placement cost of a kind; `None` for kinds that are never
    /// bought (bases).
    #[must_use]
    pub fn cost(&self, kind: EntityKind) -> Option<i32> {
        match kind {
            EntityKind::Worker => Some(self.worker_cost),
            EntityKind::Attacker => Some(self.attacker_cost),
            EntityKind::Barracks => Some(self.barracks_cost),
            EntityKind::House => Some(self.house_cost),
            EntityKind::Generator => Some(self.generator_cost),
            EntityKind::Base => None,
        }
    }

    /// Construction time for a building kind; `None` otherwise.
    #[must_use]
    pub fn build_time_ms(&self, kind: EntityKind) -> Option<u32> {
        match kind {
            EntityKind::Barracks => Some(self.barracks_build_time_ms),
            EntityKind::House => Some(self.house_build_time_ms),
            EntityKind::Generator => Some(self.generator_build_time_ms),
            _ => None,
        }
    }

    /// Movement speed for a kind; zero for stationary kinds.
    #[must_use]
    pub fn speed(&self, kind: EntityKind) -> Fixed {
        match kind {
            EntityKind::Worker => self.worker_speed,
            EntityKind::Attacker => self.attacker_speed,
            _ => Fixed::ZERO,
        }
    }

    /// Diameter for a kind.
    #[must_use]
    pub fn extent(&self, kind: EntityKind) -> Fixed {
        match kind {
            EntityKind::Worker => self.worker_extent,
            EntityKind::Attacker => self.attacker_extent,
            EntityKind::Base => self.base_extent,
            _ => self.building_extent,
        }
    }

    /// Starting health for a kind.
    #[must_use]
    pub fn max_health(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Worker | EntityKind::Attacker => self.unit_health,
            EntityKind::Base => self.base_health,
            _ => self.building_health,
        }
    }

    /// How many simulation ticks make up one economy tick.
    ///
    /// Integer division; at least 1 so a degenerate config cannot stall
    /// the economy forever.
    #[must_use]
    pub fn ticks_per_economy_tick(&self) -> u64 {
        u64::from((self.economy_interval_ms / self.tick_interval_ms).max(1))
    }

    /// How many simulation ticks a pending train takes to mature.
    #[must_use]
    pub fn unit_build_ticks(&self) -> u64 {
        u64::from((self.unit_build_time_ms / self.tick_interval_ms).max(1))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        // Unit speeds derive from a base rate of 2/tick: workers run at
        // 0.8x, attackers at 1.2x. Expressed as integer ratios to stay off
        // the float path.
        let base_speed = Fixed::from_num(2);
        Self {
            tick_interval_ms: 16,
            economy_interval_ms: 1000,
            generator_production: 1,
            starting_energy: 50,

            worker_cost: 10,
            attacker_cost: 20,
            unit_build_time_ms: 5000,

            barracks_cost: 50,
            barracks_build_time_ms: 10_000,
            house_cost: 30,
            house_build_time_ms: 7000,
            generator_cost: 40,
            generator_build_time_ms: 8000,

            initial_unit_cap: 5,
            house_cap_increase: 3,

            attack_damage: 5,
            unit_health: 10,
            building_health: 50,
            base_health: 100,

            worker_speed: base_speed * Fixed::from_num(4) / Fixed::from_num(5),
            attacker_speed: base_speed * Fixed::from_num(6) / Fixed::from_num(5),

            worker_extent: Fixed::from_num(10),
            attacker_extent: Fixed::from_num(12),
            building_extent: Fixed::from_num(20),
            base_extent: Fixed::from_num(30),

            spawn_offset: Fixed::from_num(10),

            player_base_position: Vec2Fixed::new(Fixed::from_num(100), Fixed::from_num(100)),
            enemy_base_position: Vec2Fixed::new(Fixed::from_num(700), Fixed::from_num(400)),
        }
    }
}
