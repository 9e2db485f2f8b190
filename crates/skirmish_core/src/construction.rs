//! Construction progression for placed buildings.
//!
//! Placement already paid the cost atomically, so construction can never
//! fail; the only state machine is `Building -> Built`, driven here one
//! tick at a time. Completion effects (the house cap increase) are applied
//! on the same tick the transition happens, exactly once — the `is_built`
//! guard inside [`Construction::advance`] makes re-entry a no-op.
//!
//! [`Construction::advance`]: crate::entity::Construction::advance

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::economy::Economies;
use crate::entity::{EntityId, EntityKind, Faction};
use crate::store::EntityStore;

/// A building finished construction this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingCompleted {
    /// The completed building.
    pub id: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Its owner.
    pub faction: Faction,
}

/// Advance every in-progress building by one tick of simulated time.
///
/// Iterates in ascending-id order for reproducibility and returns the
/// completions that happened this tick.
pub fn run_construction_system(
    store: &mut EntityStore,
    economies: &mut Economies,
    config: &SimConfig,
) -> Vec<BuildingCompleted> {
    let mut completed = Vec::new();

    for id in store.sorted_ids() {
        let Some(entity) = store.get_mut(id) else {
            continue;
        };
        let Some(construction) = entity.construction.as_mut() else {
            continue;
        };

        if construction.advance(config.tick_interval_ms) {
            completed.push(BuildingCompleted {
                id,
                kind: entity.kind,
                faction: entity.faction,
            });
        }
    }

    for done in &completed {
        tracing::debug!(id = done.id, kind = done.kind.name(), "building completed");
        if done.kind == EntityKind::House {
            if let Some(economy) = economies.get_mut(done.faction) {
                economy.on_house_completed(config.house_cap_increase);
            }
        }
    }

    completed
}
