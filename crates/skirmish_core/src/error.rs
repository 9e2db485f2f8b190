//! Error types for the simulation core.
//!
//! Two distinct families live here and must not be conflated:
//!
//! - [`SimError`] is for programmer-facing misuse of the API (referencing
//!   an entity that does not exist, serialization failure). These surface
//!   as `Result` errors.
//! - [`RejectReason`] is the user-facing outcome of a validated command
//!   that the rules refused (not enough energy, unit cap hit). Rejections
//!   are ordinary game events reported in the tick's event log; the world
//!   stays valid and the caller decides what to show the player.

use thiserror::Error;

use crate::entity::EntityId;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for simulation API misuse.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid entity reference.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),

    /// State snapshot (de)serialization failure.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Why a command was rejected.
///
/// Every rejection leaves the simulation exactly as it was: no energy is
/// spent, no entity is created, no target is changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum RejectReason {
    /// The faction cannot afford the cost.
    #[error("Insufficient energy: need {required}, have {available}")]
    InsufficientEnergy {
        /// Energy the command needed.
        required: i32,
        /// Energy the faction actually had.
        available: i32,
    },

    /// Training would exceed the faction's unit cap.
    ///
    /// Checked before any energy is spent, so a cap rejection never
    /// touches the balance.
    #[error("Unit cap reached: {cap}")]
    UnitCapReached {
        /// The cap that was hit.
        cap: u32,
    },

    /// The order referenced a missing, self, or otherwise illegal target.
    #[error("Invalid target")]
    InvalidTarget,
}
