pub mod app;
pub mod model;
pub mod report;

pub use model::world::{TurnPhase, World};
