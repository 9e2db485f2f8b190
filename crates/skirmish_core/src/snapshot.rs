//! Read-only world export for the presentation layer.
//!
//! A [`WorldSnapshot`] is a full copy, not a view into live state: a
//! renderer (or a parallel consumer) holding one can never observe a
//! half-applied tick. Entities appear in ascending-id order so diffing
//! two consecutive snapshots is stable.

use serde::{Deserialize, Serialize};

use crate::economy::Economies;
use crate::entity::{EntityId, EntityKind, Faction};
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::store::EntityStore;

/// Construction state of a building as shown to the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProgressView {
    /// Progress percentage (0-100).
    pub percent: u32,
    /// Whether construction has completed.
    pub is_built: bool,
}

/// One entity as shown to the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    /// Entity id.
    pub id: EntityId,
    /// Kind tag.
    pub kind: EntityKind,
    /// Owner.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    /// Diameter.
    #[serde(with = "fixed_serde")]
    pub extent: Fixed,
    /// Current health.
    pub health: u32,
    /// Present only for placed buildings.
    pub build_progress: Option<BuildProgressView>,
}

/// One faction's public numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionView {
    /// The faction.
    pub faction: Faction,
    /// Energy balance.
    pub energy: i32,
    /// Current unit cap.
    pub unit_cap: u32,
    /// Live unit count.
    pub live_units: u32,
}

/// Complete per-tick export of the simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick this snapshot was taken after.
    pub tick: u64,
    /// Every live entity, ascending id.
    pub entities: Vec<EntityView>,
    /// Player then enemy faction state.
    pub factions: Vec<FactionView>,
}

impl WorldSnapshot {
    /// Capture the world as of the end of `tick`.
    #[must_use]
    pub fn capture(tick: u64, store: &EntityStore, economies: &Economies) -> Self {
        let entities = store
            .sorted_ids()
            .into_iter()
            .filter_map(|id| store.get(id))
            .map(|e| EntityView {
                id: e.id,
                kind: e.kind,
                faction: e.faction,
                position: e.position,
                extent: e.extent,
                health: e.health,
                build_progress: e.construction.map(|c| BuildProgressView {
                    percent: c.percentage(),
                    is_built: c.is_built,
                }),
            })
            .collect();

        let factions = [Faction::Player, Faction::Enemy]
            .into_iter()
            .filter_map(|faction| {
                economies.get(faction).map(|economy| FactionView {
                    faction,
                    energy: economy.energy,
                    unit_cap: economy.unit_cap,
                    live_units: economy.live_units,
                })
            })
            .collect();

        Self {
            tick,
            entities,
            factions,
        }
    }

    /// Look up a faction's view.
    #[must_use]
    pub fn faction(&self, faction: Faction) -> Option<&FactionView> {
        self.factions.iter().find(|f| f.faction == faction)
    }

    /// Look up an entity's view by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&EntityView> {
        self.entities.iter().find(|e| e.id == id)
    }
}
