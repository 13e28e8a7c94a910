use crate::model::config::AppConfig;
use crate::model::world::{default_homebases, TurnPhase, World};
use peeps_core::gate::{OpenGate, TurnGate};
use peeps_core::metrics::{MetricsSink, NoopSink};
use peeps_core::population::Population;
use peeps_core::spatial_index::SpatialIndex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

impl World {
    /// Builds a world from `config`, seeding the RNG from `world.seed` or
    /// from entropy, with no metrics and an always-open gate.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let rng = match config.world.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_parts(config, rng, Arc::new(NoopSink), Arc::new(OpenGate))
    }

    /// Builds a world with injected collaborators and places
    /// `world.initial_population` entities on random empty cells.
    pub fn with_parts(
        config: AppConfig,
        rng: ChaCha8Rng,
        metrics: Arc<dyn MetricsSink>,
        gate: Arc<dyn TurnGate>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let mut world = Self {
            turn: 0,
            homebases: default_homebases(&config.world.size),
            config,
            spatial: SpatialIndex::new(),
            population: Population::new(),
            neighbor_cache: RwLock::new(HashMap::new()),
            rng,
            metrics,
            gate,
            phase: TurnPhase::Idle,
            events: Vec::new(),
        };

        for _ in 0..world.config.world.initial_population {
            let location = world.find_any_empty_location().ok_or_else(|| {
                anyhow::anyhow!("no empty cell left for the initial population")
            })?;
            world.spawn_entity(None, location)?;
        }
        world.events.clear();

        tracing::info!(
            world = %world.config.world.name,
            population = world.population.len(),
            fingerprint = %world.config.fingerprint(),
            "World created"
        );
        Ok(world)
    }
}
