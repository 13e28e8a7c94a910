pub mod shutdown;
pub mod state;

pub use shutdown::ShutdownManager;
pub use state::{App, EventTally, RunOptions};

use anyhow::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

impl App {
    /// Runs turns until the turn limit, extinction or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        self.shutdown.listen();

        let turn_time = Duration::from_millis(self.world.settings().turn_time_ms.max(1));
        let mut interval = tokio::time::interval(turn_time);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            world = %self.world.settings().world.name,
            paced = self.options.paced,
            turn_ms = turn_time.as_millis() as u64,
            "Starting world..."
        );

        while self.running && !self.shutdown.is_shutdown_requested() {
            if self.options.paced {
                interval.tick().await;
            } else {
                tokio::task::yield_now().await;
            }
            self.step()?;
        }

        tracing::info!(
            turn = self.world.turn(),
            births = self.tally.births,
            deaths = self.tally.deaths,
            meetings = self.tally.meetings,
            "Simulation stopped"
        );
        Ok(())
    }

    /// Advances one turn and updates the runner's bookkeeping.
    pub fn step(&mut self) -> Result<()> {
        let events = self.world.tick()?;
        self.tally.add(&events);
        let turn = self.world.turn();

        if self.options.log_every > 0 && turn % self.options.log_every == 0 {
            let stats = self.world.population_stats();
            tracing::info!(
                turn,
                alive = stats.alive_count,
                dead = stats.dead_count,
                max_age = stats.max_age,
                births = self.tally.births,
                deaths = self.tally.deaths,
                "Progress"
            );
        }

        if self.options.turns.is_some_and(|limit| turn >= limit) {
            self.running = false;
        }
        if self.world.alive_count() == 0 && self.world.settings().population.new_peep <= 0.0 {
            tracing::info!(turn, "Population extinct and no immigration, stopping");
            self.running = false;
        }
        Ok(())
    }
}
