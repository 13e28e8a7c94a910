use super::location::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Turn counter value.
pub type Turn = u64;
/// Age in turns survived.
pub type Age = u64;

/// Stable identity of an entity for its whole lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(pub Uuid);

impl EntityId {
    #[must_use]
    pub fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Blue,
    Red,
    Green,
    Yellow,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Blue, Gender::Red, Gender::Green, Gender::Yellow];

    /// The first `max_genders` genders, clamped to `1..=4`.
    #[must_use]
    pub fn pool(max_genders: usize) -> &'static [Gender] {
        &Self::ALL[..max_genders.clamp(1, Self::ALL.len())]
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Gender::Blue => "blue",
            Gender::Red => "red",
            Gender::Green => "green",
            Gender::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An agent occupying one grid cell.
///
/// `age`, `alive` and `dead_at_turn` are private so they can only move
/// forward: age never decreases and death is permanent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub gender: Gender,
    pub homebase: Location,
    pub born_turn: Turn,
    pub parents: Option<(EntityId, EntityId)>,
    age: Age,
    alive: bool,
    dead_at_turn: Option<Turn>,
    pub look_turn: Option<Turn>,
    pub spawn_turn: Option<Turn>,
    met: BTreeMap<EntityId, Turn>,
    /// What this entity saw on its last look, keyed by cell.
    pub neighbors: BTreeMap<Location, EntityId>,
}

impl Entity {
    #[must_use]
    pub fn new(id: EntityId, gender: Gender, homebase: Location, born_turn: Turn) -> Self {
        Self {
            id,
            gender,
            homebase,
            born_turn,
            parents: None,
            age: 0,
            alive: true,
            dead_at_turn: None,
            look_turn: None,
            spawn_turn: None,
            met: BTreeMap::new(),
            neighbors: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn age(&self) -> Age {
        self.age
    }

    pub fn add_age(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    /// Raises the age to `age`; lower values are ignored.
    pub fn grow_to(&mut self, age: Age) {
        self.age = self.age.max(age);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn dead_at_turn(&self) -> Option<Turn> {
        self.dead_at_turn
    }

    /// Kills the entity. Returns `false` if it was already dead.
    pub fn die(&mut self, turn: Turn) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.dead_at_turn = Some(turn);
        true
    }

    #[must_use]
    pub fn has_met(&self, other: &EntityId) -> bool {
        self.met.contains_key(other)
    }

    #[must_use]
    pub fn met_at(&self, other: &EntityId) -> Option<Turn> {
        self.met.get(other).copied()
    }

    #[must_use]
    pub fn met(&self) -> &BTreeMap<EntityId, Turn> {
        &self.met
    }

    /// Records the first meeting with `other`. Later calls keep the original turn.
    pub fn record_meeting(&mut self, other: EntityId, turn: Turn) -> bool {
        if self.met.contains_key(&other) {
            return false;
        }
        self.met.insert(other, turn);
        true
    }

    /// Neighbor data is fresh if the last look happened less than
    /// `remember_turns` turns ago.
    #[must_use]
    pub fn has_fresh_view(&self, turn: Turn, remember_turns: Turn) -> bool {
        self.look_turn
            .is_some_and(|t| turn.saturating_sub(t) < remember_turns)
    }

    /// True once `interval` turns have passed since the last spawn.
    #[must_use]
    pub fn spawn_cooldown_elapsed(&self, turn: Turn, interval: Turn) -> bool {
        self.spawn_turn
            .is_none_or(|t| turn.saturating_sub(t) >= interval)
    }

    #[must_use]
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            gender: self.gender,
            age: self.age,
            alive: self.alive,
            dead_at_turn: self.dead_at_turn,
            homebase: self.homebase,
            born_turn: self.born_turn,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} age:{} gender:{}", self.id, self.age, self.gender)
    }
}

/// Read-only copy handed to renderers and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub gender: Gender,
    pub age: Age,
    pub alive: bool,
    pub dead_at_turn: Option<Turn>,
    pub homebase: Location,
    pub born_turn: Turn,
}
