//! Command resolution: turning player intent into store mutations.
//!
//! Commands arrive from the outside world (clicks, scripts, tests) with
//! explicit unit-id lists — which units are "selected" is a presentation
//! concern this crate does not track. Resolution validates against the
//! rules and either mutates the world or produces a structured
//! [`RejectReason`]; it never throws and never leaves partial state.
//!
//! Training is deferred: a valid `Train` pays up front and schedules a
//! [`PendingTrain`] countdown that the clock matures into a live unit.
//! There are no wall-clock timers anywhere — time is ticks.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::economy::Economies;
use crate::entity::{Construction, Entity, EntityId, EntityKind, Faction, Target};
use crate::error::RejectReason;
use crate::math::Vec2Fixed;
use crate::store::EntityStore;

/// External input to the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Send units to a point. A location target never triggers combat.
    Move {
        /// Units to order around.
        units: Vec<EntityId>,
        /// Where to go.
        destination: Vec2Fixed,
    },
    /// Send units after an entity.
    Attack {
        /// Units to order around.
        units: Vec<EntityId>,
        /// The entity to pursue.
        target: EntityId,
    },
    /// Pay for a unit now, receive it next to the base after the build
    /// time elapses.
    Train {
        /// Unit kind to train.
        kind: EntityKind,
    },
    /// Pay for a building and start constructing it at a position.
    PlaceBuilding {
        /// Building kind to place.
        kind: EntityKind,
        /// Where to put it.
        position: Vec2Fixed,
    },
    /// Cancel the most recently scheduled pending train of a kind,
    /// refunding its cost.
    CancelTrain {
        /// Unit kind whose pending train to cancel.
        kind: EntityKind,
    },
}

/// A validated command that the rules refused, reported in tick events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejection {
    /// Who issued the command.
    pub faction: Faction,
    /// The command as submitted.
    pub command: Command,
    /// Why it was refused.
    pub reason: RejectReason,
}

/// A scheduled future unit creation — paid for, counted against the cap,
/// but not yet a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTrain {
    /// Faction that will receive the unit.
    pub faction: Faction,
    /// Unit kind being trained.
    pub kind: EntityKind,
    /// Tick at which the unit spawns.
    pub ready_at_tick: u64,
}

/// Build an entity record of `kind` for `faction` at `position`, with
/// stats drawn from configuration. Buildings start unconstructed.
#[must_use]
pub fn create_entity(
    kind: EntityKind,
    faction: Faction,
    position: Vec2Fixed,
    config: &SimConfig,
) -> Entity {
    Entity {
        id: 0,
        kind,
        faction,
        position,
        extent: config.extent(kind),
        speed: config.speed(kind),
        health: config.max_health(kind),
        target: None,
        construction: config.build_time_ms(kind).map(Construction::new),
    }
}

/// Where a freshly trained unit appears: just clear of the right edge of
/// the faction's base.
#[must_use]
pub fn spawn_position(store: &EntityStore, faction: Faction, config: &SimConfig) -> Vec2Fixed {
    let base = store
        .ids_by_kind(EntityKind::Base)
        .into_iter()
        .filter_map(|id| store.get(id))
        .find(|e| e.faction == faction);

    match base {
        Some(base) => Vec2Fixed::new(base.position.x + base.extent + config.spawn_offset, base.position.y),
        // Bases are never destroyed in this ruleset; fall back to the
        // configured site if one was somehow never created.
        None => match faction {
            Faction::Enemy => config.enemy_base_position,
            _ => config.player_base_position,
        },
    }
}

/// Resolve one command against the world.
///
/// On success the world has been mutated (targets set, energy spent,
/// entities or pending trains created). On rejection nothing changed.
pub fn resolve_command(
    store: &mut EntityStore,
    economies: &mut Economies,
    pending: &mut Vec<PendingTrain>,
    config: &SimConfig,
    current_tick: u64,
    faction: Faction,
    command: &Command,
) -> Result<(), RejectReason> {
    match command {
        Command::Move { units, destination } => {
            assign_targets(store, faction, units, Target::Location(*destination))
        }
        Command::Attack { units, target } => {
            validate_attack_target(store, faction, *target)?;
            assign_targets(store, faction, units, Target::Entity(*target))
        }
        Command::Train { kind } => {
            resolve_train(economies, pending, config, current_tick, faction, *kind)
        }
        Command::PlaceBuilding { kind, position } => {
            resolve_place_building(store, economies, config, faction, *kind, *position)
        }
        Command::CancelTrain { kind } => {
            resolve_cancel_train(economies, pending, config, faction, *kind)
        }
    }
}

/// Set `target` on every listed unit that passes validation.
///
/// Per-unit failures (missing entity, wrong owner, not a mobile unit) are
/// skipped; last writer wins on each unit's target. An order that applied
/// to nothing is a rejection, not a silent success.
fn assign_targets(
    store: &mut EntityStore,
    faction: Faction,
    units: &[EntityId],
    target: Target,
) -> Result<(), RejectReason> {
    let mut applied = 0usize;

    for &unit_id in units {
        if Target::Entity(unit_id) == target {
            // A unit cannot pursue itself.
            continue;
        }
        let Some(entity) = store.get_mut(unit_id) else {
            continue;
        };
        if entity.faction != faction || !entity.kind.is_unit() {
            continue;
        }
        entity.target = Some(target);
        applied += 1;
    }

    if applied == 0 {
        Err(RejectReason::InvalidTarget)
    } else {
        Ok(())
    }
}

/// An attack order's target must exist and must not be one of the
/// issuer's own structures. Own *units* remain targetable — friendly
/// fire is legal.
fn validate_attack_target(
    store: &EntityStore,
    faction: Faction,
    target: EntityId,
) -> Result<(), RejectReason> {
    let Some(entity) = store.get(target) else {
        return Err(RejectReason::InvalidTarget);
    };
    let own_structure =
        entity.faction == faction && (entity.kind.is_building() || entity.kind == EntityKind::Base);
    if own_structure {
        return Err(RejectReason::InvalidTarget);
    }
    Ok(())
}

fn resolve_train(
    economies: &mut Economies,
    pending: &mut Vec<PendingTrain>,
    config: &SimConfig,
    current_tick: u64,
    faction: Faction,
    kind: EntityKind,
) -> Result<(), RejectReason> {
    if !kind.is_unit() {
        return Err(RejectReason::InvalidTarget);
    }
    let Some(cost) = config.cost(kind) else {
        return Err(RejectReason::InvalidTarget);
    };

    // Cap first: a cap rejection must not burn energy.
    {
        let Some(economy) = economies.get(faction) else {
            return Err(RejectReason::InvalidTarget);
        };
        if !economy.can_add_unit() {
            return Err(RejectReason::UnitCapReached {
                cap: economy.unit_cap,
            });
        }
    }

    economies.charge(faction, cost)?;
    if let Some(economy) = economies.get_mut(faction) {
        economy.reserve_train_slot();
    }

    pending.push(PendingTrain {
        faction,
        kind,
        ready_at_tick: current_tick + config.unit_build_ticks(),
    });
    tracing::debug!(?faction, kind = kind.name(), "train scheduled");
    Ok(())
}

fn resolve_place_building(
    store: &mut EntityStore,
    economies: &mut Economies,
    config: &SimConfig,
    faction: Faction,
    kind: EntityKind,
    position: Vec2Fixed,
) -> Result<(), RejectReason> {
    if !kind.is_building() {
        return Err(RejectReason::InvalidTarget);
    }
    let Some(cost) = config.cost(kind) else {
        return Err(RejectReason::InvalidTarget);
    };

    economies.charge(faction, cost)?;
    let id = store.insert(create_entity(kind, faction, position, config));
    tracing::debug!(id, kind = kind.name(), "building placed");
    Ok(())
}

/// Cancel searches from the back so the *most recently* scheduled train
/// of the kind is the one withdrawn, and refunds its full cost.
fn resolve_cancel_train(
    economies: &mut Economies,
    pending: &mut Vec<PendingTrain>,
    config: &SimConfig,
    faction: Faction,
    kind: EntityKind,
) -> Result<(), RejectReason> {
    let Some(index) = pending
        .iter()
        .rposition(|t| t.faction == faction && t.kind == kind)
    else {
        return Err(RejectReason::InvalidTarget);
    };

    pending.remove(index);
    if let Some(economy) = economies.get_mut(faction) {
        economy.release_train_slot();
        economy.credit(config.cost(kind).unwrap_or(0));
    }
    Ok(())
}

/// Translate a world point into the order target a click there should
/// produce, using the documented precedence:
///
/// 1. hostile **unit** whose circle contains the point
/// 2. hostile or neutral **building**
/// 3. the enemy **base**
/// 4. the bare **location**
///
/// First match wins. Candidates within a tier are checked in insertion
/// order, so resolution is reproducible. This is the API an input adapter
/// calls; the core itself never sees a mouse.
#[must_use]
pub fn resolve_point_target(store: &EntityStore, faction: Faction, point: Vec2Fixed) -> Target {
    let ids = store.sorted_ids();

    let find = |matches: fn(&Entity) -> bool| {
        ids.iter()
            .filter_map(|&id| store.get(id))
            .find(|e| matches(e) && e.faction.is_hostile_to(faction) && e.contains_point(point))
            .map(|e| Target::Entity(e.id))
    };

    find(|e| e.kind.is_unit())
        .or_else(|| find(|e| e.kind.is_building()))
        .or_else(|| find(|e| e.kind == EntityKind::Base))
        .unwrap_or(Target::Location(point))
}
