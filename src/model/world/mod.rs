use crate::model::config::AppConfig;
use peeps_core::bounds;
use peeps_core::gate::TurnGate;
use peeps_core::metrics::MetricsSink;
use peeps_core::population::Population;
use peeps_core::spatial_index::SpatialIndex;
use peeps_core::systems::stats;
use peeps_data::{
    Entity, EntityId, EntitySnapshot, Gender, Location, PopulationStats, Turn, TurnEvent,
    WorldSize,
};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

pub mod finalize;
pub mod init;
pub mod movement;
pub mod update;

/// Where the world is inside [`World::tick`]. Outside a tick it is `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    Arbitrating,
    Applying,
    Aging,
}

type NeighborCache = RwLock<HashMap<(Location, i32), Arc<[Location]>>>;

/// The simulated world: grid, population and the turn loop.
///
/// An entity's position lives only in the spatial index; the entity table
/// holds everything else. Both are mutated solely through `&mut self`.
pub struct World {
    turn: Turn,
    config: AppConfig,
    spatial: SpatialIndex,
    population: Population,
    homebases: BTreeMap<Gender, Location>,
    neighbor_cache: NeighborCache,
    rng: ChaCha8Rng,
    metrics: Arc<dyn MetricsSink>,
    gate: Arc<dyn TurnGate>,
    phase: TurnPhase,
    events: Vec<TurnEvent>,
}

/// Centers of the four quadrants, one per gender.
fn default_homebases(size: &WorldSize) -> BTreeMap<Gender, Location> {
    let left = size.min_x / 2;
    let right = size.max_x / 2;
    let low = size.min_y / 2;
    let high = size.max_y / 2;
    let z = size.min_z;
    Gender::ALL
        .iter()
        .zip([
            Location::new(left, low, z),
            Location::new(right, low, z),
            Location::new(left, high, z),
            Location::new(right, high, z),
        ])
        .map(|(g, l)| (*g, l))
        .collect()
}

impl World {
    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn settings(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn size(&self) -> &WorldSize {
        &self.config.world.size
    }

    #[must_use]
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.population.get(id)
    }

    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.population.get_mut(id)
    }

    #[must_use]
    pub fn location_of(&self, id: &EntityId) -> Option<Location> {
        self.spatial.location_of(id)
    }

    /// The entity bound to `location`, dead or alive.
    #[must_use]
    pub fn entity_at(&self, location: &Location) -> Option<&Entity> {
        self.spatial
            .entity_at(location)
            .and_then(|id| self.population.get(&id))
    }

    /// True if a living entity holds `location`.
    #[must_use]
    pub fn is_occupied(&self, location: &Location) -> bool {
        self.entity_at(location).is_some_and(Entity::is_alive)
    }

    #[must_use]
    pub fn homebase(&self, gender: Gender) -> Location {
        self.homebases
            .get(&gender)
            .copied()
            .unwrap_or_else(Location::origin)
    }

    /// Moves a gender's homebase. Entities keep the homebase they were born
    /// with.
    pub fn set_homebase(&mut self, gender: Gender, location: Location) -> peeps_core::SimResult<()> {
        bounds::check(&location, &self.config.world.size)?;
        self.homebases.insert(gender, location);
        Ok(())
    }

    /// In-bounds cells within `distance` (square radius) of `location`,
    /// excluding `location` itself, in location order.
    pub fn location_neighbors(&self, location: &Location, distance: i32) -> Arc<[Location]> {
        let key = (*location, distance);
        if let Some(hit) = self
            .neighbor_cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Arc::clone(hit);
        }

        let size = self.config.world.size;
        let xs = (location.x - distance).max(size.min_x + 1)
            ..=(location.x + distance).min(size.max_x - 1);
        let ys = (location.y - distance).max(size.min_y + 1)
            ..=(location.y + distance).min(size.max_y - 1);
        let zs = (location.z - distance).max(size.min_z)..=(location.z + distance).min(size.max_z);

        let mut cells = Vec::new();
        for x in xs {
            for y in ys.clone() {
                for z in zs.clone() {
                    let cell = Location::new(x, y, z);
                    if cell != *location {
                        cells.push(cell);
                    }
                }
            }
        }
        let cells: Arc<[Location]> = cells.into();

        self.neighbor_cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Arc::clone(&cells));
        cells
    }

    /// Read-only view of every bound cell, in location order.
    #[must_use]
    pub fn occupied_locations(&self) -> Vec<(Location, EntitySnapshot)> {
        self.spatial
            .entries()
            .into_iter()
            .filter_map(|(loc, id)| self.population.get(&id).map(|e| (loc, e.snapshot())))
            .collect()
    }

    #[must_use]
    pub fn population_stats(&self) -> PopulationStats {
        stats::population_stats(self.population.iter())
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.population.alive_count()
    }

    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.population.dead_count()
    }

    /// Events buffered since the last tick returned.
    #[must_use]
    pub fn pending_events(&self) -> &[TurnEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_homebases_are_quadrant_centers() {
        let bases = default_homebases(&WorldSize::flat(-10, 10, -10, 10));
        assert_eq!(bases[&Gender::Blue], Location::new(-5, -5, 0));
        assert_eq!(bases[&Gender::Red], Location::new(5, -5, 0));
        assert_eq!(bases[&Gender::Green], Location::new(-5, 5, 0));
        assert_eq!(bases[&Gender::Yellow], Location::new(5, 5, 0));
    }

    #[test]
    fn test_location_neighbors_clip_to_border() {
        let config = AppConfig {
            world: crate::model::config::WorldConfig {
                size: WorldSize::flat(-10, 10, -10, 10),
                initial_population: 0,
                seed: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let world = World::new(config).unwrap();

        assert_eq!(world.location_neighbors(&Location::origin(), 1).len(), 8);
        assert_eq!(world.location_neighbors(&Location::origin(), 2).len(), 24);

        let corner = world.location_neighbors(&Location::new(9, 9, 0), 1);
        assert_eq!(
            corner.as_ref(),
            &[
                Location::new(8, 8, 0),
                Location::new(8, 9, 0),
                Location::new(9, 8, 0)
            ]
        );
        let again = world.location_neighbors(&Location::new(9, 9, 0), 1);
        assert!(Arc::ptr_eq(&corner, &again));
    }
}
