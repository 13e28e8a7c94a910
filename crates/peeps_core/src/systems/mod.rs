/// Action evaluation and arbitration
pub mod action;
/// Movement policy (where to step next)
pub mod movement;
/// Population statistics
pub mod stats;
