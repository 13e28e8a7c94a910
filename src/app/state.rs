use anyhow::Result;
use peeps_core::gate::OpenGate;
use peeps_core::metrics::Metrics;
use peeps_data::TurnEvent;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::app::ShutdownManager;
use crate::model::config::AppConfig;
use crate::model::world::World;

/// How the runner drives the world.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many turns; `None` runs until Ctrl-C or extinction.
    pub turns: Option<u64>,
    /// Log a progress line every this many turns; 0 disables it.
    pub log_every: u64,
    /// Wait `turn_time_ms` between turns.
    pub paced: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            turns: None,
            log_every: 100,
            paced: true,
        }
    }
}

/// Running totals of turn events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventTally {
    pub births: u64,
    pub deaths: u64,
    pub meetings: u64,
}

impl EventTally {
    pub fn add(&mut self, events: &[TurnEvent]) {
        for event in events {
            match event {
                TurnEvent::Birth { .. } => self.births += 1,
                TurnEvent::Death { .. } => self.deaths += 1,
                TurnEvent::Meeting { .. } => self.meetings += 1,
            }
        }
    }
}

pub struct App {
    pub running: bool,
    pub world: World,
    pub metrics: Arc<Metrics>,
    pub options: RunOptions,
    pub shutdown: ShutdownManager,
    pub tally: EventTally,
}

impl App {
    pub fn new(config: AppConfig, options: RunOptions) -> Result<Self> {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let metrics = Arc::new(Metrics::new());
        let world = World::with_parts(config, rng, metrics.clone(), Arc::new(OpenGate))?;

        Ok(Self {
            running: true,
            world,
            metrics,
            options,
            shutdown: ShutdownManager::new(),
            tally: EventTally::default(),
        })
    }
}
