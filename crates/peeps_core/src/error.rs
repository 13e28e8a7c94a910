//! Error types for simulation operations.
//!
//! Every variant is local and recoverable: the turn scheduler logs it and
//! moves on to the next entity.

use peeps_data::{EntityId, Location};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("location {0} is outside the world")]
    OutOfBounds(Location),

    #[error("location {location} is taken by {occupant}")]
    CellOccupied {
        location: Location,
        occupant: EntityId,
    },

    #[error("entity {0} is not on the grid")]
    EntityNotFound(EntityId),

    #[error("entity {0} is dead and cannot move")]
    DeadEntityImmobile(EntityId),

    #[error("movement is disabled by configuration")]
    MovementDisabled,

    #[error("population cap of {0} reached")]
    PopulationCapReached(usize),

    #[error("spawn origin {0} is occupied")]
    SpawnOriginOccupied(Location),

    #[error("entities {0} and {1} have incompatible genders")]
    IncompatibleGenders(EntityId, EntityId),

    #[error("entity {0} is not of spawn age")]
    NotOfSpawnAge(EntityId),

    #[error("entity {0} spawned too recently")]
    SpawnCooldownActive(EntityId),

    #[error("no empty cell next to {0:?}")]
    NoEmptyAdjacentCell(Vec<Location>),
}

/// Result type alias for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
