//! # Skirmish Core
//!
//! Deterministic simulation core for a small two-base RTS.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! The world consumes abstract [`Command`]s and emits a read-only
//! [`WorldSnapshot`] every tick; any renderer, script, or test drives it
//! the same way. The separation enables headless runs, replay
//! verification, and byte-exact determinism testing.
//!
//! ## Crate Structure
//!
//! - [`entity`] / [`store`] - the entity record and its storage
//! - [`economy`] - per-faction energy and unit-cap bookkeeping
//! - [`construction`] - build progression for placed buildings
//! - [`movement`] - target chasing and arrival detection
//! - [`orders`] - command resolution and target precedence
//! - [`combat`] - arrival-triggered damage and removal
//! - [`simulation`] - the tick orchestrator
//! - [`snapshot`] - per-tick world export
//! - [`math`] - fixed-point math utilities
//!
//! [`Command`]: orders::Command
//! [`WorldSnapshot`]: snapshot::WorldSnapshot

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod config;
pub mod construction;
pub mod economy;
pub mod entity;
pub mod error;
pub mod math;
pub mod movement;
pub mod orders;
pub mod simulation;
pub mod snapshot;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{DamageEvent, EntityDestroyed};
    pub use crate::config::SimConfig;
    pub use crate::construction::BuildingCompleted;
    pub use crate::economy::{Economies, FactionEconomy};
    pub use crate::entity::{Construction, Entity, EntityId, EntityKind, Faction, Target};
    pub use crate::error::{RejectReason, Result, SimError};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::orders::{Command, OrderRejection, PendingTrain};
    pub use crate::simulation::{Simulation, TickEvents, UnitSpawned};
    pub use crate::snapshot::{EntityView, FactionView, WorldSnapshot};
    pub use crate::store::EntityStore;
}
