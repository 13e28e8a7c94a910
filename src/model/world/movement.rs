use crate::model::world::World;
use peeps_core::bounds;
use peeps_core::error::{SimError, SimResult};
use peeps_core::lifecycle::{self, is_of_spawn_age};
use peeps_core::systems::movement::{self as policy, MovementContext};
use peeps_data::{Displacement, EntityId, Gender, Location, TurnEvent};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

impl World {
    /// One step from `src` toward `dst`, sidestepping live occupants and the
    /// border.
    pub fn step_toward(&mut self, src: &Location, dst: &Location) -> Displacement {
        let ctx = MovementContext {
            spatial: &self.spatial,
            population: &self.population,
            config: &self.config,
            turn: self.turn,
        };
        policy::step_toward(&ctx, src, dst, &mut self.rng)
    }

    /// Where `id` would step this turn.
    pub fn best_move(&mut self, id: &EntityId) -> SimResult<Displacement> {
        let entity = self
            .population
            .get(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        let from = self
            .spatial
            .location_of(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        let ctx = MovementContext {
            spatial: &self.spatial,
            population: &self.population,
            config: &self.config,
            turn: self.turn,
        };
        Ok(policy::best_move(&ctx, entity, &from, &mut self.rng))
    }

    /// Refreshes what `id` sees around it and stamps the look turn.
    pub fn look_around(&mut self, id: &EntityId) -> SimResult<()> {
        let here = self
            .spatial
            .location_of(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        let view = self.location_neighbors(&here, self.config.perception.view_distance);
        let seen: BTreeMap<Location, EntityId> = view
            .iter()
            .filter_map(|loc| self.spatial.entity_at(loc).map(|other| (*loc, other)))
            .collect();

        let turn = self.turn;
        let entity = self
            .population
            .get_mut(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        entity.neighbors = seen;
        entity.look_turn = Some(turn);
        Ok(())
    }

    /// Picks the best move for `id` and applies it.
    pub fn move_entity(&mut self, id: &EntityId) -> SimResult<()> {
        let d = self.best_move(id)?;
        self.apply_movement(id, d)
    }

    /// Moves `id` by `d`.
    ///
    /// Nothing moves on error. Bumping into a live entity still counts as a
    /// meeting.
    pub fn apply_movement(&mut self, id: &EntityId, d: Displacement) -> SimResult<()> {
        if !self.config.movement.allow_moves {
            return Err(SimError::MovementDisabled);
        }
        let entity = self
            .population
            .get(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        if !entity.is_alive() {
            return Err(SimError::DeadEntityImmobile(*id));
        }
        let src = self
            .spatial
            .location_of(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        let dst = src.offset(d);
        bounds::check(&dst, &self.config.world.size)?;
        self.update_grid(id, src, dst)
    }

    /// Rebinds `id` from `src` to `dst`.
    ///
    /// A live occupant of `dst` is met instead and `CellOccupied` returned.
    /// A dead occupant is pushed off the grid.
    pub fn update_grid(&mut self, id: &EntityId, src: Location, dst: Location) -> SimResult<()> {
        if src == dst {
            self.spatial.set(*id, src);
            return Ok(());
        }
        bounds::check(&dst, &self.config.world.size)?;

        if let Some(occupant) = self.spatial.entity_at(&dst).filter(|o| o != id) {
            let alive = self
                .population
                .get(&occupant)
                .is_some_and(|e| e.is_alive());
            if alive {
                if let Err(e) = self.meet(id, &occupant) {
                    tracing::debug!(a = %id, b = %occupant, error = %e, "No spawn from meeting");
                }
                return Err(SimError::CellOccupied {
                    location: dst,
                    occupant,
                });
            }
        }

        if let Some(displaced) = self.spatial.set(*id, dst) {
            tracing::debug!(entity = %displaced, location = %dst, "Dead entity left the grid");
        }
        Ok(())
    }

    /// Records the first meeting of `a` and `b` and, if they are compatible,
    /// may spawn a child next to them.
    ///
    /// Meeting again is a no-op returning `Ok(None)`. A failed spawn attempt
    /// still counts as the meeting.
    pub fn meet(&mut self, a: &EntityId, b: &EntityId) -> SimResult<Option<EntityId>> {
        let ea = self.population.get(a).ok_or(SimError::EntityNotFound(*a))?;
        let eb = self.population.get(b).ok_or(SimError::EntityNotFound(*b))?;
        if ea.has_met(b) || eb.has_met(a) {
            return Ok(None);
        }

        let outcome = self.spawn_from_meeting(a, b);

        let turn = self.turn;
        if let Some((ea, eb)) = self.population.get_pair_mut(a, b) {
            ea.record_meeting(*b, turn);
            eb.record_meeting(*a, turn);
        }
        self.events.push(TurnEvent::Meeting {
            a: *a,
            b: *b,
            turn,
        });
        outcome
    }

    fn spawn_from_meeting(&mut self, a: &EntityId, b: &EntityId) -> SimResult<Option<EntityId>> {
        let pop = &self.config.population;
        let ea = self.population.get(a).ok_or(SimError::EntityNotFound(*a))?;
        let eb = self.population.get(b).ok_or(SimError::EntityNotFound(*b))?;

        if ea.gender != eb.gender {
            return Err(SimError::IncompatibleGenders(*a, *b));
        }
        for e in [ea, eb] {
            if !is_of_spawn_age(e, pop.spawn_age) {
                return Err(SimError::NotOfSpawnAge(e.id));
            }
        }
        for e in [ea, eb] {
            if !e.spawn_cooldown_elapsed(self.turn, pop.spawn_interval) {
                return Err(SimError::SpawnCooldownActive(e.id));
            }
        }
        let gender = ea.gender;
        let spawn_probability = pop.spawn_probability;

        let la = self
            .spatial
            .location_of(a)
            .ok_or(SimError::EntityNotFound(*a))?;
        let lb = self
            .spatial
            .location_of(b)
            .ok_or(SimError::EntityNotFound(*b))?;
        let cell = self
            .find_empty_location(&la)
            .or_else(|| self.find_empty_location(&lb))
            .ok_or_else(|| SimError::NoEmptyAdjacentCell(vec![la, lb]))?;

        if self.rng.gen::<f64>() >= spawn_probability {
            return Ok(None);
        }

        let child = self.spawn_child(gender, cell, Some((*a, *b)))?;
        let turn = self.turn;
        for parent in [a, b] {
            if let Some(p) = self.population.get_mut(parent) {
                p.spawn_turn = Some(turn);
            }
        }
        tracing::debug!(child = %child, a = %a, b = %b, location = %cell, "Spawned from meeting");
        Ok(Some(child))
    }

    /// First cell next to `around` that no living entity holds.
    #[must_use]
    pub fn find_empty_location(&self, around: &Location) -> Option<Location> {
        self.location_neighbors(around, 1)
            .iter()
            .find(|l| !self.is_occupied(l))
            .copied()
    }

    /// A random cell anywhere in the world that no living entity holds.
    pub fn find_any_empty_location(&mut self) -> Option<Location> {
        let size = self.config.world.size;
        for _ in 0..32 {
            let candidate = Location::new(
                self.rng.gen_range(size.min_x + 1..size.max_x),
                self.rng.gen_range(size.min_y + 1..size.max_y),
                self.rng.gen_range(size.min_z..=size.max_z),
            );
            if !self.is_occupied(&candidate) {
                return Some(candidate);
            }
        }
        let free: Vec<Location> = size
            .usable_locations()
            .filter(|l| !self.is_occupied(l))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    /// Creates an entity at `location`; `None` picks a random gender.
    pub fn spawn_entity(&mut self, gender: Option<Gender>, location: Location) -> SimResult<EntityId> {
        let gender = match gender {
            Some(g) => g,
            None => lifecycle::random_gender(self.config.population.max_genders, &mut self.rng),
        };
        self.spawn_child(gender, location, None)
    }

    pub(crate) fn spawn_child(
        &mut self,
        gender: Gender,
        location: Location,
        parents: Option<(EntityId, EntityId)>,
    ) -> SimResult<EntityId> {
        let cap = self.config.population.max_peeps;
        if self.population.alive_count() >= cap {
            return Err(SimError::PopulationCapReached(cap));
        }
        bounds::check(&location, &self.config.world.size)?;
        if let Some(occupant) = self.entity_at(&location).filter(|e| e.is_alive()) {
            return Err(SimError::CellOccupied {
                location,
                occupant: occupant.id,
            });
        }

        let homebase = self.homebase(gender);
        let mut entity =
            lifecycle::create_entity_with_rng(gender, homebase, self.turn, &mut self.rng);
        entity.parents = parents;
        let id = entity.id;
        self.population.insert(entity);
        if let Some(displaced) = self.spatial.set(id, location) {
            tracing::debug!(entity = %displaced, location = %location, "Dead entity left the grid");
        }

        self.events.push(TurnEvent::Birth {
            id,
            gender,
            location,
            parents,
            turn: self.turn,
        });
        Ok(id)
    }
}
