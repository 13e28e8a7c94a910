use crate::model::world::World;
use peeps_core::error::{SimError, SimResult};
use peeps_core::lifecycle;
use peeps_data::{DeathCause, EntityId, Gender, Location, TurnEvent};
use rand::Rng;
use std::collections::HashMap;

impl World {
    pub(crate) fn finalize_turn(&mut self) {
        match self.immigrate() {
            Ok(Some(id)) => tracing::debug!(entity = %id, turn = self.turn, "Immigrant arrived"),
            Ok(None) => {}
            Err(e) => tracing::trace!(error = %e, "No immigrant"),
        }
        self.age_population();
        self.kill_overcrowded();
        self.forget_dead();
    }

    /// Maybe spawns a random-gender entity at that gender's homebase.
    ///
    /// The chance is `new_peep - alive / new_peep_modifier`, so it dries up
    /// as the population grows. No immigrants once `new_peep_max` are alive.
    pub fn immigrate(&mut self) -> SimResult<Option<EntityId>> {
        let pop = &self.config.population;
        let alive = self.population.alive_count();
        if alive >= pop.new_peep_max {
            return Err(SimError::PopulationCapReached(pop.new_peep_max));
        }
        let chance = if pop.new_peep_modifier > 0.0 {
            pop.new_peep - alive as f64 / pop.new_peep_modifier
        } else {
            pop.new_peep
        };
        let max_genders = pop.max_genders;
        if self.rng.gen::<f64>() >= chance {
            return Ok(None);
        }

        let gender = lifecycle::random_gender(max_genders, &mut self.rng);
        let origin = self.homebase(gender);
        if self.is_occupied(&origin) {
            return Err(SimError::SpawnOriginOccupied(origin));
        }
        self.spawn_child(gender, origin, None).map(Some)
    }

    /// Ages every living entity by one turn, or kills it.
    fn age_population(&mut self) {
        let turn = self.turn;
        for id in self.population.alive_ids() {
            let Some(entity) = self.population.get_mut(&id) else {
                continue;
            };
            let cause = lifecycle::age_or_die(entity, turn, &self.config.population, &mut self.rng);
            let age = entity.age();
            self.metrics.record("peeps.age", age as f64);
            if let Some(cause) = cause {
                tracing::debug!(entity = %id, age, ?cause, "Entity died");
                self.events.push(TurnEvent::Death {
                    id,
                    age,
                    cause,
                    turn,
                });
            }
        }
    }

    /// Kills entities fully surrounded according to the overcrowding
    /// toggles. All checks look at the grid as it was before any of these
    /// deaths.
    fn kill_overcrowded(&mut self) {
        let rules = self.config.overcrowding.clone();
        if !(rules.kill_if_surrounded_by_other
            || rules.kill_if_surrounded_by_same
            || rules.kill_if_surrounded)
        {
            return;
        }

        let living: HashMap<Location, (EntityId, Gender)> = self
            .spatial
            .entries()
            .into_iter()
            .filter_map(|(loc, id)| {
                self.population
                    .get(&id)
                    .filter(|e| e.is_alive())
                    .map(|e| (loc, (id, e.gender)))
            })
            .collect();

        let mut doomed: Vec<(EntityId, Location)> = Vec::new();
        let mut cells: Vec<_> = living.iter().collect();
        cells.sort_unstable_by_key(|(loc, _)| **loc);
        for (loc, (id, gender)) in cells {
            let around = self.location_neighbors(loc, 1);
            if around.is_empty() {
                continue;
            }
            let occupants: Vec<Option<Gender>> = around
                .iter()
                .map(|l| living.get(l).map(|(_, g)| *g))
                .collect();
            let full = occupants.iter().all(Option::is_some);
            let by_other = occupants
                .iter()
                .all(|g| matches!(g, Some(other) if other != gender));
            let by_same = occupants.iter().all(|g| *g == Some(*gender));

            if (rules.kill_if_surrounded && full)
                || (rules.kill_if_surrounded_by_other && by_other)
                || (rules.kill_if_surrounded_by_same && by_same)
            {
                doomed.push((*id, *loc));
            }
        }

        let turn = self.turn;
        for (id, loc) in doomed {
            let Some(entity) = self.population.get_mut(&id) else {
                continue;
            };
            if entity.die(turn) {
                let age = entity.age();
                tracing::debug!(entity = %id, location = %loc, "Entity died of overcrowding");
                self.events.push(TurnEvent::Death {
                    id,
                    age,
                    cause: DeathCause::Overcrowding,
                    turn,
                });
            }
        }
    }

    /// Drops entities that have been dead for `forget_dead_after` turns.
    fn forget_dead(&mut self) {
        let Some(after) = self.config.population.forget_dead_after else {
            return;
        };
        let turn = self.turn;
        let stale: Vec<EntityId> = self
            .population
            .iter()
            .filter(|e| {
                e.dead_at_turn()
                    .is_some_and(|dead| turn.saturating_sub(dead) >= after)
            })
            .map(|e| e.id)
            .collect();
        for id in &stale {
            self.spatial.remove_by_entity(id);
        }
        let forgotten = self.population.forget(&stale);
        if forgotten > 0 {
            tracing::debug!(forgotten, turn, "Forgot dead entities");
        }
    }
}
