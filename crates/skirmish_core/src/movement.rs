//! Movement toward targets and arrival detection.
//!
//! Entity targets are chased by *live* position: the destination is read
//! from the store every tick, so a moving target is tracked and a removed
//! one is noticed. A target that no longer exists is cleared silently
//! without running any interaction — stale-target cleanup is a rule of
//! this system, not an error.
//!
//! Arrival itself only *detects*; the interaction (combat or nothing) and
//! the unconditional target clear happen in the clock, after this system
//! returns, so that exactly one interaction runs per arrival.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Target};
use crate::math::{Fixed, Vec2Fixed};
use crate::store::EntityStore;

/// An entity came within interaction range of its target this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    /// The moving entity.
    pub entity: EntityId,
    /// The target it reached, as resolved this tick.
    pub target: Target,
}

/// Advance every targeted entity one step and report arrivals.
///
/// Steps are clamped to the remaining distance so an entity lands on its
/// destination instead of oscillating across it. Entities with zero speed
/// still run the arrival check: a stationary entity whose target walks
/// into range "arrives" without moving.
pub fn run_movement_system(store: &mut EntityStore) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else {
            continue;
        };
        let Some(target) = entity.target else {
            continue;
        };

        let position = entity.position;
        let speed = entity.speed;
        let own_radius = entity.interaction_radius();

        // Resolve the live destination and the combined interaction radius.
        let (destination, radius) = match target {
            Target::Entity(target_id) => match store.get(target_id) {
                Some(target_entity) => (
                    target_entity.position,
                    own_radius + target_entity.interaction_radius(),
                ),
                None => {
                    // Target destroyed mid-flight: clear and move on, no
                    // interaction.
                    if let Some(entity) = store.get_mut(id) {
                        entity.target = None;
                    }
                    tracing::trace!(id, "stale target cleared");
                    continue;
                }
            },
            Target::Location(point) => (point, own_radius),
        };

        let radius_sq = radius * radius;
        let mut new_position = position;

        if position.distance_squared(destination) > radius_sq && speed > Fixed::ZERO {
            new_position = step_toward(position, destination, speed);
        }

        let arrived = new_position.distance_squared(destination) <= radius_sq;

        if let Some(entity) = store.get_mut(id) {
            entity.position = new_position;
        }
        if arrived {
            arrivals.push(Arrival { entity: id, target });
        }
    }

    arrivals
}

/// One movement step of length `speed` from `from` toward `to`, clamped so
/// the step never passes `to`.
#[must_use]
pub fn step_toward(from: Vec2Fixed, to: Vec2Fixed, speed: Fixed) -> Vec2Fixed {
    let diff = to - from;
    if diff.distance_squared(Vec2Fixed::ZERO) <= speed * speed {
        return to;
    }
    from + diff.normalized().scaled(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, EntityKind, Faction};

    fn unit(position: Vec2Fixed, speed: i32) -> Entity {
        Entity {
            id: 0,
            kind: EntityKind::Attacker,
            faction: Faction::Player,
            position,
            extent: Fixed::from_num(12),
            speed: Fixed::from_num(speed),
            health: 10,
            target: None,
            construction: None,
        }
    }

    fn at(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    #[test]
    fn test_moves_toward_location() {
        let mut store = EntityStore::new();
        let id = store.insert(unit(at(0, 0), 2));
        store.get_mut(id).unwrap().target = Some(Target::Location(at(100, 0)));

        run_movement_system(&mut store);
        let pos = store.get(id).unwrap().position;
        // One step of ~speed along +x; sqrt precision makes it
        // approximate, direction makes y exactly zero.
        let epsilon = Fixed::from_num(1) / Fixed::from_num(1000);
        assert!((pos.x - Fixed::from_num(2)).abs() < epsilon, "stepped {:?}", pos.x);
        assert_eq!(pos.y, Fixed::ZERO);
    }

    #[test]
    fn test_arrival_within_radius() {
        let mut store = EntityStore::new();
        let id = store.insert(unit(at(0, 0), 2));
        // Radius is extent/2 = 6; destination 7 away needs one step.
        store.get_mut(id).unwrap().target = Some(Target::Location(at(7, 0)));

        let arrivals = run_movement_system(&mut store);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].entity, id);
    }

    #[test]
    fn test_step_clamps_to_destination() {
        let stepped = step_toward(at(0, 0), at(1, 0), Fixed::from_num(5));
        assert_eq!(stepped, at(1, 0));
    }

    #[test]
    fn test_chases_live_position() {
        let mut store = EntityStore::new();
        let chaser = store.insert(unit(at(0, 0), 2));
        let quarry = store.insert(unit(at(100, 0), 2));
        store.get_mut(chaser).unwrap().target = Some(Target::Entity(quarry));

        run_movement_system(&mut store);
        let first = store.get(chaser).unwrap().position;

        // Quarry relocates; the chaser must bend toward the new position,
        // not a cached one.
        store.get_mut(quarry).unwrap().position = at(0, 100);
        run_movement_system(&mut store);
        let second = store.get(chaser).unwrap().position;

        assert!(first.x > Fixed::ZERO);
        assert!(second.y > first.y);
    }

    #[test]
    fn test_stale_entity_target_cleared_without_arrival() {
        let mut store = EntityStore::new();
        let chaser = store.insert(unit(at(0, 0), 2));
        let quarry = store.insert(unit(at(50, 0), 0));
        store.get_mut(chaser).unwrap().target = Some(Target::Entity(quarry));
        store.remove(quarry);

        let arrivals = run_movement_system(&mut store);
        assert!(arrivals.is_empty());
        assert!(store.get(chaser).unwrap().target.is_none());
        // And the chaser did not move toward a ghost.
        assert_eq!(store.get(chaser).unwrap().position, at(0, 0));
    }

    #[test]
    fn test_zero_speed_still_detects_arrival() {
        let mut store = EntityStore::new();
        let sentinel = store.insert(unit(at(0, 0), 0));
        let walker = store.insert(unit(at(3, 0), 0));
        store.get_mut(sentinel).unwrap().target = Some(Target::Entity(walker));

        // Combined radius 6 + 6 = 12; the walker is already inside it.
        let arrivals = run_movement_system(&mut store);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].entity, sentinel);
        assert_eq!(store.get(sentinel).unwrap().position, at(0, 0));
    }

    #[test]
    fn test_no_target_no_motion() {
        let mut store = EntityStore::new();
        let id = store.insert(unit(at(5, 5), 2));
        let arrivals = run_movement_system(&mut store);
        assert!(arrivals.is_empty());
        assert_eq!(store.get(id).unwrap().position, at(5, 5));
    }
}
