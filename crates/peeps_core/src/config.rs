//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto `config.toml`. Every section has
//! defaults, so a file only needs to name the values it changes.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! turn_time_ms = 100
//!
//! [world]
//! name = "Alpha1"
//! initial_population = 20
//! seed = 42
//!
//! [world.size]
//! min_x = -10
//! max_x = 10
//! min_y = -10
//! max_y = 10
//! min_z = 0
//! max_z = 0
//!
//! [population]
//! max_age = 400
//! spawn_age = 20
//! spawn_probability = 0.3
//!
//! [actions]
//! candidates = ["look", "move", "idle"]
//! arbitration = "sequential"
//! ```

use peeps_data::{Age, Turn, WorldSize};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub name: String,
    /// Extents; one row/column on each X and Y edge is border.
    pub size: WorldSize,
    pub initial_population: usize,
    pub seed: Option<u64>,
    /// Reseed the RNG from `seed + turn` at the start of every turn.
    pub deterministic: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "Alpha1".to_string(),
            size: WorldSize::default(),
            initial_population: 20,
            seed: None,
            deterministic: false,
        }
    }
}

/// Birth, death and spawning parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    /// Nobody lives beyond this age.
    pub max_age: Age,
    /// Absolute cap on living entities.
    pub max_peeps: usize,
    /// Base chance per turn that an immigrant appears at a homebase.
    pub new_peep: f64,
    /// The lower this number, the faster immigration dries up as the
    /// population grows. Zero or less disables the decay.
    pub new_peep_modifier: f64,
    /// No immigrants once this many entities are alive.
    pub new_peep_max: usize,
    /// Chance of a random death per turn, before the age term.
    pub random_death: f64,
    /// Minimum age to spawn.
    pub spawn_age: Age,
    /// Chance that two compatible entities meeting produce a new one.
    pub spawn_probability: f64,
    /// Turns to wait after a spawn before spawning again.
    pub spawn_interval: Turn,
    /// Number of genders in play, 1-4.
    pub max_genders: usize,
    /// Dead entities are removed from the grid and forgotten after this
    /// many turns. `None` keeps them until their cell is taken.
    pub forget_dead_after: Option<Turn>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_age: 400,
            max_peeps: 400,
            new_peep: 0.1,
            new_peep_modifier: 1000.0,
            new_peep_max: 40,
            random_death: 0.0001,
            spawn_age: 20,
            spawn_probability: 0.3,
            spawn_interval: 15,
            max_genders: 4,
            forget_dead_after: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PerceptionConfig {
    /// How far an entity sees when it looks around (square radius).
    pub view_distance: i32,
    /// How many turns an entity remembers what it saw.
    pub remember_turns: Turn,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            view_distance: 2,
            remember_turns: 4,
        }
    }
}

/// Action kinds an entity may be offered each turn.
///
/// Names that are not recognised deserialize to `Unknown`, which is
/// evaluated as idle with priority zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CandidateAction {
    Look,
    Move,
    #[serde(alias = "skip")]
    Idle,
    #[serde(other)]
    Unknown,
}

/// How the candidate evaluations of one entity are run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArbitrationMode {
    /// One after another; ties go to the earlier candidate.
    Sequential,
    /// On the rayon pool, collected in candidate order; ties go to the
    /// earlier candidate.
    #[default]
    Parallel,
    /// On the rayon pool, consumed in completion order; ties go to whichever
    /// finished first. Not reproducible across runs.
    Racing,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ActionsConfig {
    pub candidates: Vec<CandidateAction>,
    pub move_priority: i32,
    pub arbitration: ArbitrationMode,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                CandidateAction::Look,
                CandidateAction::Move,
                CandidateAction::Idle,
            ],
            move_priority: 5,
            arbitration: ArbitrationMode::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MovementConfig {
    /// Global switch, mostly for tests.
    pub allow_moves: bool,
    /// Walk back toward the homebase when nothing interesting is in view.
    pub seek_homebase: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            allow_moves: true,
            seek_homebase: false,
        }
    }
}

/// Death by overcrowding. Each toggle is checked independently.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct OvercrowdingConfig {
    /// Die when every neighboring cell holds a different gender.
    pub kill_if_surrounded_by_other: bool,
    /// Die when every neighboring cell holds the same gender.
    pub kill_if_surrounded_by_same: bool,
    /// Die when every neighboring cell is occupied.
    pub kill_if_surrounded: bool,
}

/// Hints for renderers; the simulation itself ignores these.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Up to this age entities are highlighted.
    pub young_highlight_age: Age,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            young_highlight_age: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub perception: PerceptionConfig,
    pub actions: ActionsConfig,
    pub movement: MovementConfig,
    pub overcrowding: OvercrowdingConfig,
    pub display: DisplayConfig,
    /// Wall-clock pacing between turns for the interactive runner.
    pub turn_time_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            perception: PerceptionConfig::default(),
            actions: ActionsConfig::default(),
            movement: MovementConfig::default(),
            overcrowding: OvercrowdingConfig {
                kill_if_surrounded_by_other: true,
                kill_if_surrounded_by_same: false,
                kill_if_surrounded: false,
            },
            display: DisplayConfig::default(),
            turn_time_ms: 100,
        }
    }
}

/// Upper limit for `perception.view_distance`.
pub const MAX_VIEW_DISTANCE: i32 = 64;

fn probability(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Err` describing the first invalid value.
    pub fn validate(&self) -> anyhow::Result<()> {
        let size = &self.world.size;
        anyhow::ensure!(
            size.max_x - size.min_x > 2,
            "World X extent must leave room inside the border"
        );
        anyhow::ensure!(
            size.max_y - size.min_y > 2,
            "World Y extent must leave room inside the border"
        );
        anyhow::ensure!(size.min_z <= size.max_z, "World min_z must not exceed max_z");
        anyhow::ensure!(
            self.world.initial_population <= size.usable_cells(),
            "Initial population does not fit in the world"
        );
        anyhow::ensure!(
            self.world.initial_population <= self.population.max_peeps,
            "Initial population exceeds max_peeps"
        );

        let pop = &self.population;
        anyhow::ensure!(pop.max_age > 0, "Max age must be positive");
        anyhow::ensure!(
            (1..=4).contains(&pop.max_genders),
            "Max genders must be in [1, 4]"
        );
        anyhow::ensure!(probability(pop.new_peep), "New peep chance must be in [0.0, 1.0]");
        anyhow::ensure!(
            probability(pop.random_death),
            "Random death chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            probability(pop.spawn_probability),
            "Spawn probability must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.perception.view_distance >= 1,
            "View distance must be at least 1"
        );
        anyhow::ensure!(
            self.perception.view_distance <= MAX_VIEW_DISTANCE,
            "View distance too large (max {MAX_VIEW_DISTANCE})"
        );
        anyhow::ensure!(
            !self.actions.candidates.is_empty(),
            "At least one candidate action is required"
        );
        anyhow::ensure!(
            self.actions.move_priority >= 0,
            "Move priority must be non-negative"
        );
        anyhow::ensure!(
            self.turn_time_ms <= 60_000,
            "Turn time too long (max 60000 ms)"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .map_err(|e| e.context(format!("invalid config {}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "config not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("cannot read config {}", path.display()))),
        }
    }

    #[must_use]
    pub fn world_size(&self) -> WorldSize {
        self.world.size
    }

    /// Hash over everything that changes simulation behavior.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world.size).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hasher.update(format!("{:?}", self.perception).as_bytes());
        hasher.update(format!("{:?}", self.actions).as_bytes());
        hasher.update(format!("{:?}", self.movement).as_bytes());
        hasher.update(format!("{:?}", self.overcrowding).as_bytes());
        hex::encode(hasher.finalize())
    }
}
