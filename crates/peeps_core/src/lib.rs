//! # Peeps Core
//!
//! Simulation logic for peeps, a turn-based population simulator on a
//! bounded grid. Nothing in this crate owns a world; it provides the pieces
//! the world is assembled from:
//! - A bidirectional spatial index and grid bounds checks
//! - Per-entity action arbitration (sequential, parallel or racing)
//! - Movement policy and lifecycle rules (aging, death, creation)
//! - Configuration, errors, metrics sinks and turn gates
//!
//! ## Example
//!
//! ```
//! use peeps_core::config::AppConfig;
//! use peeps_core::systems::action::{choose_action, ActionContext, ActionKind};
//! use peeps_data::{Entity, EntityId, Gender, Location};
//!
//! let config = AppConfig::default();
//! let entity = Entity::new(EntityId::from_u128(1), Gender::Blue, Location::origin(), 0);
//!
//! // An entity that has never looked around looks first.
//! let ctx = ActionContext { entity: &entity, turn: 1, config: &config };
//! assert_eq!(choose_action(&ctx), ActionKind::Look);
//! ```

/// Grid bounds checks
pub mod bounds;
/// Configuration management for simulation parameters
pub mod config;
/// Simulation error types
pub mod error;
/// Turn gates (pause / single step)
pub mod gate;
/// Entity lifecycle management (creation, aging, death)
pub mod lifecycle;
/// Metrics sinks and logging setup
pub mod metrics;
/// Entity table
pub mod population;
/// Entity ↔ location index
pub mod spatial_index;
/// Core simulation systems (Action, Movement, Stats)
pub mod systems;

pub use config::AppConfig;
pub use error::{SimError, SimResult};
pub use gate::{DebugGate, OpenGate, TurnGate};
pub use metrics::{init_logging, Metrics, MetricsSink, NoopSink};
pub use population::Population;
pub use spatial_index::SpatialIndex;
