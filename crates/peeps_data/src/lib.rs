pub mod data;

pub use data::entity::{Age, Entity, EntityId, EntitySnapshot, Gender, Turn};
pub use data::location::{Displacement, Location, WorldSize};
pub use data::stats::{DeathCause, PopulationStats, TurnEvent};
