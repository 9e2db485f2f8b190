//! Per-faction energy balance and unit-cap bookkeeping.
//!
//! All amounts are plain integers: the rules only ever add or spend whole
//! energy units, and integer math is deterministic by construction.
//!
//! [`FactionEconomy::try_spend`] is the single gate for every cost in the
//! game. No other code path may decrement energy; this is what makes the
//! "energy never goes negative" invariant a local property instead of a
//! whole-program audit.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::entity::Faction;
use crate::error::RejectReason;
use crate::store::EntityStore;

/// One faction's energy balance, production rate, and unit-cap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionEconomy {
    /// Current energy stockpile. Never negative.
    pub energy: i32,
    /// Energy credited per economy tick while the faction owns at least
    /// one completed generator.
    pub production_per_tick: i32,
    /// Maximum live units; raised by completed houses.
    pub unit_cap: u32,
    /// Count of live (spawned, not destroyed) units.
    pub live_units: u32,
    /// Cap slots held by trains that have been paid for but have not
    /// matured yet. Counted against the cap so a maturing train can never
    /// push `live_units` past it.
    pub reserved_trains: u32,
}

impl FactionEconomy {
    /// Starting economy from configuration.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            energy: config.starting_energy,
            production_per_tick: config.generator_production,
            unit_cap: config.initial_unit_cap,
            live_units: 0,
            reserved_trains: 0,
        }
    }

    /// Check affordability without spending.
    #[must_use]
    pub const fn can_afford(&self, amount: i32) -> bool {
        self.energy >= amount
    }

    /// Atomically spend `amount` if the balance covers it.
    ///
    /// Returns `true` and decrements on success; returns `false` and
    /// leaves the balance untouched otherwise.
    pub fn try_spend(&mut self, amount: i32) -> bool {
        if self.energy >= amount {
            self.energy -= amount;
            true
        } else {
            false
        }
    }

    /// Credit energy (income or a cancellation refund).
    pub fn credit(&mut self, amount: i32) {
        self.energy += amount;
    }

    /// Check if another unit fits under the cap, counting both live units
    /// and unmatured train reservations.
    #[must_use]
    pub const fn can_add_unit(&self) -> bool {
        self.live_units + self.reserved_trains < self.unit_cap
    }

    /// Hold a cap slot for a scheduled train.
    pub fn reserve_train_slot(&mut self) {
        self.reserved_trains += 1;
    }

    /// Release a held slot without spawning (train cancelled).
    pub fn release_train_slot(&mut self) {
        self.reserved_trains = self.reserved_trains.saturating_sub(1);
    }

    /// A train matured: its reservation becomes a live unit.
    pub fn on_unit_spawned(&mut self) {
        self.reserved_trains = self.reserved_trains.saturating_sub(1);
        self.live_units += 1;
    }

    /// A unit was destroyed.
    pub fn on_unit_lost(&mut self) {
        self.live_units = self.live_units.saturating_sub(1);
    }

    /// A house finished construction: raise the cap.
    ///
    /// The construction manager calls this exactly once per house; the
    /// one-shot guarantee lives there, not here.
    pub fn on_house_completed(&mut self, cap_increase: u32) {
        self.unit_cap += cap_increase;
    }
}

/// The two faction economies. Neutral entities have no economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economies {
    /// Player-side economy.
    pub player: FactionEconomy,
    /// Enemy-side economy.
    pub enemy: FactionEconomy,
}

impl Economies {
    /// Fresh economies for both factions.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            player: FactionEconomy::new(config),
            enemy: FactionEconomy::new(config),
        }
    }

    /// Economy of a faction; `None` for neutral.
    #[must_use]
    pub fn get(&self, faction: Faction) -> Option<&FactionEconomy> {
        match faction {
            Faction::Player => Some(&self.player),
            Faction::Enemy => Some(&self.enemy),
            Faction::Neutral => None,
        }
    }

    /// Mutable economy of a faction; `None` for neutral.
    pub fn get_mut(&mut self, faction: Faction) -> Option<&mut FactionEconomy> {
        match faction {
            Faction::Player => Some(&mut self.player),
            Faction::Enemy => Some(&mut self.enemy),
            Faction::Neutral => None,
        }
    }

    /// Validate and charge a cost for a faction.
    ///
    /// Convenience wrapper producing the structured rejection the order
    /// resolver reports.
    pub fn charge(&mut self, faction: Faction, amount: i32) -> Result<(), RejectReason> {
        let Some(economy) = self.get_mut(faction) else {
            return Err(RejectReason::InvalidTarget);
        };
        let available = economy.energy;
        if economy.try_spend(amount) {
            Ok(())
        } else {
            Err(RejectReason::InsufficientEnergy {
                required: amount,
                available,
            })
        }
    }
}

/// Run one economy tick: credit production to every faction owning at
/// least one completed generator.
///
/// Called by the simulation clock on its slower economy cadence, not every
/// simulation tick.
pub fn run_economy_tick(store: &EntityStore, economies: &mut Economies) {
    for faction in [Faction::Player, Faction::Enemy] {
        if store.built_producer_count(faction) == 0 {
            continue;
        }
        if let Some(economy) = economies.get_mut(faction) {
            economy.credit(economy.production_per_tick);
        }
    }
}
