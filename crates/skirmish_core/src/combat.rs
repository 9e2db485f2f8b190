//! Combat resolution at the moment of arrival.
//!
//! There are no ranged attacks or cooldowns in this ruleset: damage
//! happens exactly when a combat-capable unit arrives at an entity
//! target. Workers arriving anywhere do nothing — the worker/attacker
//! asymmetry is deliberate. Each arrival produces at most one hit, and the
//! arriving entity's target is cleared unconditionally afterwards, so a
//! sustained assault is a cycle of re-target and re-arrive.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::economy::Economies;
use crate::entity::{EntityId, EntityKind, Faction, Target};
use crate::movement::Arrival;
use crate::store::EntityStore;

/// A hit landed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Entity that dealt the hit.
    pub attacker: EntityId,
    /// Entity that took it.
    pub target: EntityId,
    /// Damage applied.
    pub damage: u32,
    /// Target health after the hit.
    pub remaining_health: u32,
}

/// An entity was destroyed and removed from the store this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDestroyed {
    /// The removed entity.
    pub id: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Its former owner.
    pub faction: Faction,
}

/// Events produced by one tick of combat resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvents {
    /// Hits landed.
    pub damage: Vec<DamageEvent>,
    /// Entities removed.
    pub destroyed: Vec<EntityDestroyed>,
}

/// Run the interaction for each arrival, in arrival order, then clear the
/// arriving entity's target unconditionally.
///
/// Order matters: an earlier arrival can destroy a later arrival's
/// attacker or target, so both ends are re-checked against the store
/// before each interaction.
pub fn run_combat_resolution(
    store: &mut EntityStore,
    economies: &mut Economies,
    config: &SimConfig,
    arrivals: &[Arrival],
) -> CombatEvents {
    let mut events = CombatEvents::default();

    for arrival in arrivals {
        resolve_arrival(store, economies, config, arrival, &mut events);

        // Exactly one interaction per arrival, then the target resets to
        // absent — even if the handler did nothing.
        if let Some(entity) = store.get_mut(arrival.entity) {
            entity.target = None;
        }
    }

    events
}

/// Apply a single arrival interaction.
///
/// No-ops unless the arriver still exists, can fight, and reached an
/// entity target that still exists. Location arrivals never fight.
fn resolve_arrival(
    store: &mut EntityStore,
    economies: &mut Economies,
    config: &SimConfig,
    arrival: &Arrival,
    events: &mut CombatEvents,
) {
    let Target::Entity(target_id) = arrival.target else {
        return;
    };

    let can_fight = store
        .get(arrival.entity)
        .is_some_and(|attacker| attacker.kind.can_fight());
    if !can_fight {
        return;
    }

    let Some(target) = store.get_mut(target_id) else {
        return;
    };

    let died = target.apply_damage(config.attack_damage);
    events.damage.push(DamageEvent {
        attacker: arrival.entity,
        target: target_id,
        damage: config.attack_damage,
        remaining_health: target.health,
    });
    tracing::debug!(
        attacker = arrival.entity,
        target = target_id,
        remaining = target.health,
        "hit"
    );

    if died {
        remove_destroyed(store, economies, target_id, events);
    }
}

/// Remove a dead entity: store removal, unit-count bookkeeping, and
/// clearing every other entity's now-dangling target reference.
fn remove_destroyed(
    store: &mut EntityStore,
    economies: &mut Economies,
    id: EntityId,
    events: &mut CombatEvents,
) {
    let Some(removed) = store.remove(id) else {
        return;
    };

    if removed.kind.is_unit() {
        if let Some(economy) = economies.get_mut(removed.faction) {
            economy.on_unit_lost();
        }
    }

    // The movement system would also catch these as stale, but clearing
    // now keeps the "no target points at a destroyed entity" invariant
    // true at every tick boundary.
    for other_id in store.sorted_ids() {
        if let Some(other) = store.get_mut(other_id) {
            if other.target == Some(Target::Entity(id)) {
                other.target = None;
            }
        }
    }

    events.destroyed.push(EntityDestroyed {
        id,
        kind: removed.kind,
        faction: removed.faction,
    });
}
