//! The entity record and its kind/faction/target vocabulary.
//!
//! There is no type hierarchy here: every live object in the world — a
//! worker, an attack unit, a barracks, a base — is the same [`Entity`]
//! record, and behavior differences hang off the [`EntityKind`]
//! discriminant. Systems ask the kind what an entity can do
//! ([`EntityKind::can_fight`], [`EntityKind::is_building`], ...) instead of
//! downcasting.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier for entities.
///
/// Assigned monotonically by the store, starting at 1, never reused.
pub type EntityId = u64;

/// Ownership grouping governing economy, unit cap, and targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The human-controlled side.
    Player,
    /// The opposing side (passive in this scope).
    Enemy,
    /// Unowned world objects.
    Neutral,
}

impl Faction {
    /// Whether entities of this faction are legal combat targets for `other`.
    ///
    /// Neutral entities are targetable by both sides; nothing is hostile
    /// to itself.
    #[must_use]
    pub const fn is_hostile_to(self, other: Self) -> bool {
        !matches!(
            (self, other),
            (Self::Player, Self::Player) | (Self::Enemy, Self::Enemy)
        )
    }
}

/// Variant tag selecting an entity's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Mobile non-combat unit.
    Worker,
    /// Mobile combat unit.
    Attacker,
    /// Production building.
    Barracks,
    /// Building that raises the owner's unit cap on completion.
    House,
    /// Building that produces energy once built.
    Generator,
    /// Faction headquarters; created at world init, never constructed.
    Base,
}

impl EntityKind {
    /// All kinds, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Worker,
        Self::Attacker,
        Self::Barracks,
        Self::House,
        Self::Generator,
        Self::Base,
    ];

    /// Check if this kind is a mobile unit.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        matches!(self, Self::Worker | Self::Attacker)
    }

    /// Check if this kind is a constructed building.
    ///
    /// Bases are stationary but are not placed or constructed, so they are
    /// deliberately not "buildings" for placement and construction rules.
    #[must_use]
    pub const fn is_building(self) -> bool {
        matches!(self, Self::Barracks | Self::House | Self::Generator)
    }

    /// Check if arriving at a hostile entity deals damage.
    ///
    /// Only attackers fight. A worker reaching a hostile target does
    /// nothing; the asymmetry is a rule, not an omission.
    #[must_use]
    pub const fn can_fight(self) -> bool {
        matches!(self, Self::Attacker)
    }

    /// Check if a completed entity of this kind produces energy.
    #[must_use]
    pub const fn is_producer(self) -> bool {
        matches!(self, Self::Generator)
    }

    /// Stable lowercase name for logs and snapshots.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Worker => "worker",
            Self::Attacker => "attacker",
            Self::Barracks => "barracks",
            Self::House => "house",
            Self::Generator => "generator",
            Self::Base => "base",
        }
    }
}

/// What an entity is moving toward.
///
/// At most one target is active per entity; issuing a new order replaces
/// the old target (last writer wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Another entity, tracked by id so the chaser follows its live
    /// position and notices its removal.
    Entity(EntityId),
    /// A bare point in the world. Location targets never trigger combat.
    Location(Vec2Fixed),
}

/// Construction progress for a placed building.
///
/// The state machine is `Building -> Built`, one-shot. `progress_ms` only
/// advances while `is_built` is false; after the transition the record is
/// frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construction {
    /// Accumulated build time in simulated milliseconds.
    pub progress_ms: u32,
    /// Total build time required, in simulated milliseconds.
    pub total_ms: u32,
    /// Whether the one-shot transition to Built has happened.
    pub is_built: bool,
}

impl Construction {
    /// Start construction from zero progress.
    #[must_use]
    pub const fn new(total_ms: u32) -> Self {
        Self {
            progress_ms: 0,
            total_ms,
            is_built: false,
        }
    }

    /// Advance construction by `elapsed_ms` of simulated time.
    ///
    /// Returns `true` exactly once, on the tick the building completes.
    /// Calling again after completion is a no-op.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.is_built {
            return false;
        }
        self.progress_ms = self.progress_ms.saturating_add(elapsed_ms);
        if self.progress_ms >= self.total_ms {
            self.is_built = true;
            return true;
        }
        false
    }

    /// Progress as a percentage (0-100).
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.is_built || self.total_ms == 0 {
            100
        } else {
            (self.progress_ms.min(self.total_ms) * 100) / self.total_ms
        }
    }
}

/// A live object in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique id, assigned by the store at insertion.
    pub id: EntityId,
    /// Behavior discriminant.
    pub kind: EntityKind,
    /// Owning faction.
    pub faction: Faction,
    /// World position.
    pub position: Vec2Fixed,
    /// Diameter used for both the interaction radius and hit-testing.
    #[serde(with = "fixed_serde")]
    pub extent: Fixed,
    /// Movement rate in distance per tick; zero for stationary kinds.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Hit points; an entity leaves the store exactly when this reaches 0.
    pub health: u32,
    /// Active movement/attack target, if any.
    pub target: Option<Target>,
    /// Construction state; `Some` only for placed buildings.
    pub construction: Option<Construction>,
}

impl Entity {
    /// Whether this entity is active per its kind's rules.
    ///
    /// Units and bases are born built; a placed building becomes active
    /// when its construction completes.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.construction.map_or(true, |c| c.is_built)
    }

    /// Radius within which this entity interacts with a target point.
    #[must_use]
    pub fn interaction_radius(&self) -> Fixed {
        self.extent / Fixed::from_num(2)
    }

    /// Check if a world point falls inside this entity's circle.
    ///
    /// This is the hit-test used by point-target resolution.
    #[must_use]
    pub fn contains_point(&self, point: Vec2Fixed) -> bool {
        let radius = self.interaction_radius();
        self.position.distance_squared(point) <= radius * radius
    }

    /// Apply damage by saturating subtraction; returns `true` if this blow
    /// dropped the entity to zero health.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(EntityKind::Worker.is_unit());
        assert!(!EntityKind::Worker.can_fight());
        assert!(EntityKind::Attacker.can_fight());
        assert!(EntityKind::House.is_building());
        assert!(!EntityKind::Base.is_building());
        assert!(EntityKind::Generator.is_producer());
        assert!(!EntityKind::Barracks.is_producer());
    }

    #[test]
    fn test_hostility() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(Faction::Enemy.is_hostile_to(Faction::Player));
        assert!(!Faction::Player.is_hostile_to(Faction::Player));
        // Neutral is fair game for both sides.
        assert!(Faction::Neutral.is_hostile_to(Faction::Player));
        assert!(Faction::Player.is_hostile_to(Faction::Neutral));
    }

    #[test]
    fn test_construction_completes_exactly_once() {
        let mut c = Construction::new(500);
        assert!(!c.advance(499));
        assert!(!c.is_built);
        assert!(c.advance(1));
        assert!(c.is_built);
        // Re-entering the check after completion must be a no-op.
        assert!(!c.advance(1000));
        assert_eq!(c.percentage(), 100);
    }

    #[test]
    fn test_construction_progress_is_frozen_after_built() {
        let mut c = Construction::new(100);
        assert!(c.advance(150));
        let frozen = c.progress_ms;
        c.advance(50);
        assert_eq!(c.progress_ms, frozen);
    }

    #[test]
    fn test_apply_damage_saturates() {
        let mut e = Entity {
            id: 1,
            kind: EntityKind::Worker,
            faction: Faction::Player,
            position: Vec2Fixed::ZERO,
            extent: Fixed::from_num(10),
            speed: Fixed::ZERO,
            health: 3,
            target: None,
            construction: None,
        };
        assert!(e.apply_damage(5));
        assert_eq!(e.health, 0);
        // A second blow on a dead entity reports no new death.
        assert!(!e.apply_damage(5));
    }
}
