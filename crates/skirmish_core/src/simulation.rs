//! The simulation clock: the only orchestrator.
//!
//! One [`Simulation`] owns the whole mutable world — store, economies,
//! pending trains, command inbox — and advances it in fixed-size ticks.
//! Commands submitted from outside are queued and drained only at the
//! start of a tick, so every tick operates on a consistent set of intents.
//!
//! # System order
//!
//! Each [`tick`](Simulation::tick) runs, in this order:
//!
//! 1. Drain and resolve queued commands (rejections become events)
//! 2. Construction progression
//! 3. Movement (arrival detection)
//! 4. Combat / interaction resolution for this tick's arrivals
//! 5. Pending-train maturation
//! 6. Resource economy, on its slower cadence
//!
//! and finishes by emitting [`TickEvents`] with a [`WorldSnapshot`].
//!
//! # Determinism
//!
//! Same config + same command stream = same world, bit for bit: all math
//! is fixed-point, iteration is in sorted-id order, and deferred effects
//! are tick-counted — there are no wall-clock timers. [`state_hash`]
//! (Simulation::state_hash) exists so tests and drivers can assert it.
//!
//! # Example
//!
//! ```
//! use skirmish_core::prelude::*;
//!
//! let mut sim = Simulation::new(SimConfig::default());
//! sim.submit_command(Faction::Player, Command::Train { kind: EntityKind::Worker });
//!
//! let events = sim.tick();
//! assert!(events.rejections.is_empty());
//! assert_eq!(events.snapshot.faction(Faction::Player).unwrap().energy, 40);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::combat::{run_combat_resolution, DamageEvent, EntityDestroyed};
use crate::config::SimConfig;
use crate::construction::{run_construction_system, BuildingCompleted};
use crate::economy::{run_economy_tick, Economies};
use crate::entity::{Entity, EntityId, EntityKind, Faction, Target};
use crate::error::{Result, SimError};
use crate::math::Vec2Fixed;
use crate::movement::run_movement_system;
use crate::orders::{
    create_entity, resolve_command, resolve_point_target, spawn_position, Command, OrderRejection,
    PendingTrain,
};
use crate::snapshot::WorldSnapshot;
use crate::store::EntityStore;

/// A pending train matured into a live unit this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpawned {
    /// The new unit.
    pub id: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Its owner.
    pub faction: Faction,
}

/// Everything that happened during one tick, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Commands that were refused, with structured reasons.
    pub rejections: Vec<OrderRejection>,
    /// Buildings that finished construction.
    pub completed_buildings: Vec<BuildingCompleted>,
    /// Hits landed by combat.
    pub damage: Vec<DamageEvent>,
    /// Entities destroyed and removed.
    pub destroyed: Vec<EntityDestroyed>,
    /// Units that matured from pending trains.
    pub spawned: Vec<UnitSpawned>,
    /// Read-only world state as of the end of this tick.
    pub snapshot: WorldSnapshot,
}

/// The deterministic simulation world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    tick: u64,
    config: SimConfig,
    store: EntityStore,
    economies: Economies,
    pending_trains: Vec<PendingTrain>,
    inbox: VecDeque<(Faction, Command)>,
}

impl Simulation {
    /// Create a world with the two bases at their configured sites.
    ///
    /// Bases are the only entities created at initialization; they are
    /// never constructed and, in this ruleset, never destroyed.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let mut store = EntityStore::new();
        store.insert(create_entity(
            EntityKind::Base,
            Faction::Player,
            config.player_base_position,
            &config,
        ));
        store.insert(create_entity(
            EntityKind::Base,
            Faction::Enemy,
            config.enemy_base_position,
            &config,
        ));

        let economies = Economies::new(&config);
        Self {
            tick: 0,
            config,
            store,
            economies,
            pending_trains: Vec::new(),
            inbox: VecDeque::new(),
        }
    }

    /// Current tick number. Starts at 0 and increments once per
    /// [`tick`](Self::tick).
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// The immutable configuration this world was built with.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read access to the entity store.
    #[must_use]
    pub const fn entities(&self) -> &EntityStore {
        &self.store
    }

    /// Read access to the faction economies.
    #[must_use]
    pub const fn economies(&self) -> &Economies {
        &self.economies
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    /// Pending trains, oldest first.
    #[must_use]
    pub fn pending_trains(&self) -> &[PendingTrain] {
        &self.pending_trains
    }

    /// Enqueue a command for the next tick.
    ///
    /// Never blocks and never fails: validation happens when the tick
    /// drains the queue, and rejections are reported through
    /// [`TickEvents::rejections`].
    pub fn submit_command(&mut self, faction: Faction, command: Command) {
        self.inbox.push_back((faction, command));
    }

    /// Translate a world point into the target an order at that point
    /// should take, using the documented hostile-unit > building > base >
    /// location precedence.
    #[must_use]
    pub fn point_target(&self, faction: Faction, point: Vec2Fixed) -> Target {
        resolve_point_target(&self.store, faction, point)
    }

    /// Seed an entity directly, outside the command flow.
    ///
    /// This is a world-setup hook for drivers and tests (scripted
    /// scenarios, benchmarks). It keeps the unit ledger consistent but
    /// performs no cap or cost validation — gameplay spawning must go
    /// through [`Command::Train`] / [`Command::PlaceBuilding`].
    pub fn spawn_entity(
        &mut self,
        kind: EntityKind,
        faction: Faction,
        position: Vec2Fixed,
    ) -> EntityId {
        let id = self.store.insert(create_entity(kind, faction, position, &self.config));
        if kind.is_unit() {
            if let Some(economy) = self.economies.get_mut(faction) {
                economy.live_units += 1;
            }
        }
        id
    }

    /// Advance the world by one tick.
    pub fn tick(&mut self) -> TickEvents {
        let rejections = self.drain_commands();

        let completed_buildings =
            run_construction_system(&mut self.store, &mut self.economies, &self.config);

        let arrivals = run_movement_system(&mut self.store);
        let combat = run_combat_resolution(
            &mut self.store,
            &mut self.economies,
            &self.config,
            &arrivals,
        );

        let spawned = self.mature_pending_trains();

        self.tick += 1;

        if self.tick % self.config.ticks_per_economy_tick() == 0 {
            run_economy_tick(&self.store, &mut self.economies);
        }

        let snapshot = WorldSnapshot::capture(self.tick, &self.store, &self.economies);

        #[cfg(debug_assertions)]
        tracing::debug!(tick = self.tick, state_hash = self.state_hash(), "tick");

        TickEvents {
            rejections,
            completed_buildings,
            damage: combat.damage,
            destroyed: combat.destroyed,
            spawned,
            snapshot,
        }
    }

    /// Drain the inbox and resolve every queued command.
    fn drain_commands(&mut self) -> Vec<OrderRejection> {
        let mut rejections = Vec::new();

        while let Some((faction, command)) = self.inbox.pop_front() {
            let outcome = resolve_command(
                &mut self.store,
                &mut self.economies,
                &mut self.pending_trains,
                &self.config,
                self.tick,
                faction,
                &command,
            );
            if let Err(reason) = outcome {
                tracing::debug!(?faction, %reason, "command rejected");
                rejections.push(OrderRejection {
                    faction,
                    command,
                    reason,
                });
            }
        }

        rejections
    }

    /// Spawn units whose pending trains have counted down.
    fn mature_pending_trains(&mut self) -> Vec<UnitSpawned> {
        let due: Vec<PendingTrain> = {
            let tick = self.tick;
            let (ready, waiting) = self
                .pending_trains
                .drain(..)
                .partition(|t| t.ready_at_tick <= tick);
            self.pending_trains = waiting;
            ready
        };

        let mut spawned = Vec::new();
        for train in due {
            let position = spawn_position(&self.store, train.faction, &self.config);
            let id = self
                .store
                .insert(create_entity(train.kind, train.faction, position, &self.config));
            if let Some(economy) = self.economies.get_mut(train.faction) {
                economy.on_unit_spawned();
            }
            tracing::debug!(id, kind = train.kind.name(), "unit trained");
            spawned.push(UnitSpawned {
                id,
                kind: train.kind,
                faction: train.faction,
            });
        }
        spawned
    }

    /// Hash of the complete simulation state.
    ///
    /// Two worlds built from the same config and fed the same command
    /// stream hash identically at every tick; regression and determinism
    /// tests lean on this.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);

        let ids = self.store.sorted_ids();
        ids.len().hash(&mut hasher);
        for id in ids {
            if let Some(entity) = self.store.get(id) {
                id.hash(&mut hasher);
                entity.kind.hash(&mut hasher);
                entity.faction.hash(&mut hasher);
                entity.position.x.to_bits().hash(&mut hasher);
                entity.position.y.to_bits().hash(&mut hasher);
                entity.health.hash(&mut hasher);
                match entity.target {
                    Some(Target::Entity(target)) => {
                        1u8.hash(&mut hasher);
                        target.hash(&mut hasher);
                    }
                    Some(Target::Location(point)) => {
                        2u8.hash(&mut hasher);
                        point.x.to_bits().hash(&mut hasher);
                        point.y.to_bits().hash(&mut hasher);
                    }
                    None => 0u8.hash(&mut hasher),
                }
                if let Some(c) = entity.construction {
                    c.progress_ms.hash(&mut hasher);
                    c.is_built.hash(&mut hasher);
                }
            }
        }

        for economy in [&self.economies.player, &self.economies.enemy] {
            economy.energy.hash(&mut hasher);
            economy.unit_cap.hash(&mut hasher);
            economy.live_units.hash(&mut hasher);
            economy.reserved_trains.hash(&mut hasher);
        }

        self.pending_trains.len().hash(&mut hasher);
        for train in &self.pending_trains {
            train.kind.hash(&mut hasher);
            train.faction.hash(&mut hasher);
            train.ready_at_tick.hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize the full world for replay or desync verification.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Restore a world serialized with [`serialize`](Self::serialize).
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| SimError::Serialization(e.to_string()))
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
