use crate::config::PopulationConfig;
use peeps_data::{Age, DeathCause, Entity, EntityId, Gender, Location, Turn};
use rand::seq::SliceRandom;
use rand::Rng;

/// New entity with an id drawn from `rng`, so seeded worlds give stable ids.
pub fn create_entity_with_rng<R: Rng>(
    gender: Gender,
    homebase: Location,
    turn: Turn,
    rng: &mut R,
) -> Entity {
    let id = EntityId::from_u128(rng.gen::<u128>());
    Entity::new(id, gender, homebase, turn)
}

/// Uniform pick from the active gender pool.
pub fn random_gender<R: Rng>(max_genders: usize, rng: &mut R) -> Gender {
    Gender::pool(max_genders)
        .choose(rng)
        .copied()
        .unwrap_or(Gender::Blue)
}

#[must_use]
pub fn is_of_spawn_age(entity: &Entity, spawn_age: Age) -> bool {
    entity.age() >= spawn_age
}

/// Chance of dying this turn for an entity that has not reached `max_age`.
#[must_use]
pub fn death_chance(age: Age, config: &PopulationConfig) -> f64 {
    if config.max_age == 0 {
        return 1.0;
    }
    let age_term = if age == 0 {
        0.0
    } else {
        (age as f64).log10() / config.max_age as f64
    };
    config.random_death + age_term
}

/// Ages a live entity by one turn or kills it.
///
/// Returns the cause when the entity died. Dead entities are left alone.
pub fn age_or_die<R: Rng>(
    entity: &mut Entity,
    turn: Turn,
    config: &PopulationConfig,
    rng: &mut R,
) -> Option<DeathCause> {
    if !entity.is_alive() {
        return None;
    }
    if entity.age() >= config.max_age {
        entity.die(turn);
        return Some(DeathCause::OldAge);
    }
    if rng.gen::<f64>() < death_chance(entity.age(), config) {
        entity.die(turn);
        return Some(DeathCause::Random);
    }
    entity.add_age();
    None
}
