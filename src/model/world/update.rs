use crate::model::world::{TurnPhase, World};
use peeps_core::error::{SimError, SimResult};
use peeps_core::systems::action::{self, ActionContext, ActionKind};
use peeps_data::{EntityId, TurnEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

impl World {
    /// Advances the simulation by one turn.
    ///
    /// Every occupied cell (as of the start of the turn) gets one action,
    /// applied immediately. Then immigration, aging, overcrowding and
    /// forgetting the dead run over the whole population.
    ///
    /// Failures of single actions or spawns are logged and skipped. A closed
    /// turn gate makes this a no-op returning no events.
    ///
    /// # Returns
    /// Births, deaths and meetings that happened during the turn.
    pub fn tick(&mut self) -> anyhow::Result<Vec<TurnEvent>> {
        if !self.gate.is_open() {
            return Ok(Vec::new());
        }

        self.turn += 1;
        if self.config.world.deterministic {
            let seed = self.config.world.seed.unwrap_or(0).wrapping_add(self.turn);
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        self.metrics
            .record("peeps.alive", self.population.alive_count() as f64);
        self.metrics
            .record("peeps.dead", self.population.dead_count() as f64);

        self.pass_actions();

        self.phase = TurnPhase::Aging;
        self.finalize_turn();
        self.phase = TurnPhase::Idle;

        anyhow::ensure!(
            self.spatial.is_consistent(),
            "spatial index lost its bijection at turn {}",
            self.turn
        );

        self.metrics.turn_completed(self.turn);
        Ok(std::mem::take(&mut self.events))
    }

    /// One action for each occupant of the cells occupied at turn start.
    ///
    /// An entity is handled at most once even if it moves into a cell that
    /// is visited later.
    fn pass_actions(&mut self) {
        let locations = self.spatial.occupied_locations();
        let mut handled: HashSet<EntityId> = HashSet::with_capacity(locations.len());

        for location in locations {
            let Some(id) = self.spatial.entity_at(&location) else {
                continue;
            };
            if !handled.insert(id) {
                continue;
            }
            if let Err(e) = self.act(&id) {
                tracing::debug!(entity = %id, turn = self.turn, error = %e, "Action rejected");
            }
        }
    }

    /// Arbitrates and executes one action for `id`.
    fn act(&mut self, id: &EntityId) -> SimResult<ActionKind> {
        self.phase = TurnPhase::Arbitrating;
        let entity = self
            .population
            .get(id)
            .ok_or(SimError::EntityNotFound(*id))?;
        let chosen = action::choose_action(&ActionContext {
            entity,
            turn: self.turn,
            config: &self.config,
        });

        self.phase = TurnPhase::Applying;
        match chosen {
            ActionKind::Look => self.look_around(id)?,
            ActionKind::Move => self.move_entity(id)?,
            ActionKind::Idle => {}
        }
        Ok(chosen)
    }
}
