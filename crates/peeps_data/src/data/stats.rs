use super::entity::{Age, EntityId, Gender, Turn};
use super::location::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Population summary over the whole entity table.
///
/// Age figures only cover living entities and are zero when nobody is alive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub alive_count: usize,
    pub dead_count: usize,
    pub min_age: Age,
    pub max_age: Age,
    pub avg_age: Age,
    pub gender_counts: BTreeMap<Gender, usize>,
}

impl fmt::Display for PopulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alive/dead: {}/{} age max/avg/min: {}/{}/{} genders:",
            self.alive_count, self.dead_count, self.max_age, self.avg_age, self.min_age
        )?;
        for (gender, count) in &self.gender_counts {
            write!(f, " {gender}={count}")?;
        }
        Ok(())
    }
}

/// Things that happened during one turn, returned by `World::tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnEvent {
    Birth {
        id: EntityId,
        gender: Gender,
        location: Location,
        parents: Option<(EntityId, EntityId)>,
        turn: Turn,
    },
    Death {
        id: EntityId,
        age: Age,
        cause: DeathCause,
        turn: Turn,
    },
    Meeting {
        a: EntityId,
        b: EntityId,
        turn: Turn,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    OldAge,
    Random,
    Overcrowding,
}
