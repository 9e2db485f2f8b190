//! Entity storage: CRUD and lookup, nothing else.
//!
//! Lookups are O(1) by id via `HashMap`. Iteration for systems and
//! queries always goes through [`EntityStore::sorted_ids`]: ids are
//! assigned monotonically and never reused, so ascending-id order is
//! insertion order, and sorting sidesteps the randomized `HashMap`
//! iteration order that would desync replays.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityKind, Faction};

/// Storage for all live entities in the simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl EntityStore {
    /// Create empty storage. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert an entity, assigning and returning its id.
    ///
    /// Whatever id the caller put on the entity is overwritten; the store
    /// is the only id authority.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity by id.
    ///
    /// Removing a missing id is a no-op returning `None` — cleanup paths
    /// may race with combat removal and must stay idempotent.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All ids in ascending (= insertion) order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of all entities of a faction, in insertion order.
    #[must_use]
    pub fn ids_by_faction(&self, faction: Faction) -> Vec<EntityId> {
        self.sorted_ids()
            .into_iter()
            .filter(|id| self.entities.get(id).is_some_and(|e| e.faction == faction))
            .collect()
    }

    /// Ids of all entities of a kind, in insertion order.
    #[must_use]
    pub fn ids_by_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.sorted_ids()
            .into_iter()
            .filter(|id| self.entities.get(id).is_some_and(|e| e.kind == kind))
            .collect()
    }

    /// Count completed producers (generators) owned by a faction.
    #[must_use]
    pub fn built_producer_count(&self, faction: Faction) -> usize {
        self.entities
            .values()
            .filter(|e| e.faction == faction && e.kind.is_producer() && e.is_built())
            .count()
    }

    /// Iterate over all entities (arbitrary order — never use for
    /// simulation logic, only for order-insensitive aggregation).
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Entity)> {
        self.entities.iter()
    }
}
