use peeps_core::config::ArbitrationMode;
use peeps_core::gate::{OpenGate, TurnGate};
use peeps_core::metrics::{MetricsSink, NoopSink};
use peeps_data::{Age, EntityId, Gender, Location, WorldSize};
use peeps_lib::model::config::AppConfig;
use peeps_lib::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Small, quiet world: 19x19 usable cells, no immigration, no random
/// death, no movement and no overcrowding unless a test turns them on.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.world.size = WorldSize::flat(-10, 10, -10, 10);
    config.world.initial_population = 0;
    config.world.seed = Some(1);
    config.population.max_age = 10;
    config.population.max_peeps = 20;
    config.population.spawn_age = 5;
    config.population.spawn_probability = 1.0;
    config.population.new_peep = 0.0;
    config.population.new_peep_max = 0;
    config.population.random_death = 0.0;
    config.population.max_genders = 4;
    config.perception.view_distance = 2;
    config.actions.arbitration = ArbitrationMode::Sequential;
    config.movement.allow_moves = false;
    config.overcrowding.kill_if_surrounded_by_other = false;
    config.overcrowding.kill_if_surrounded_by_same = false;
    config.overcrowding.kill_if_surrounded = false;
    config
}

#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    entities: Vec<(Gender, Location, Age)>,
    gate: Arc<dyn TurnGate>,
    metrics: Arc<dyn MetricsSink>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            entities: Vec::new(),
            gate: Arc::new(OpenGate),
            metrics: Arc::new(NoopSink),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_entity(mut self, gender: Gender, at: Location, age: Age) -> Self {
        self.entities.push((gender, at, age));
        self
    }

    pub fn with_gate(mut self, gate: Arc<dyn TurnGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Builds the world and spawns the requested entities, returning their
    /// ids in the order they were added.
    pub fn build(self) -> (World, Vec<EntityId>) {
        let rng = ChaCha8Rng::seed_from_u64(self.config.world.seed.unwrap_or(0));
        let mut world = World::with_parts(self.config, rng, self.metrics, self.gate)
            .expect("Failed to create world in test builder");

        let mut ids = Vec::with_capacity(self.entities.len());
        for (gender, at, age) in self.entities {
            let id = world
                .spawn_entity(Some(gender), at)
                .expect("Failed to spawn entity in test builder");
            world.entity_mut(&id).unwrap().grow_to(age);
            ids.push(id);
        }
        world.drain_events();
        (world, ids)
    }
}

/// Location of `id`, panicking if it is not on the grid.
#[allow(dead_code)]
pub fn loc(world: &World, id: &EntityId) -> Location {
    world.location_of(id).expect("entity is not on the grid")
}
