//! Movement policy: which one-cell step an entity should try next.
//!
//! Everything here reads state and returns a [`Displacement`]; applying it
//! (and resolving whatever it bumps into) is done by the world.

use crate::bounds;
use crate::config::AppConfig;
use crate::lifecycle::is_of_spawn_age;
use crate::population::Population;
use crate::spatial_index::SpatialIndex;
use peeps_data::{Displacement, Entity, Location, Turn};
use rand::Rng;

pub struct MovementContext<'a> {
    pub spatial: &'a SpatialIndex,
    pub population: &'a Population,
    pub config: &'a AppConfig,
    pub turn: Turn,
}

impl MovementContext<'_> {
    /// Out of bounds or held by a living entity. Dead occupants can be
    /// walked over.
    #[must_use]
    pub fn is_blocked(&self, location: &Location) -> bool {
        if bounds::check(location, &self.config.world.size).is_err() {
            return true;
        }
        self.spatial
            .entity_at(location)
            .and_then(|id| self.population.get(&id))
            .is_some_and(Entity::is_alive)
    }
}

/// x and y uniform in {-1, 0, 1}; z is always 0.
pub fn random_step<R: Rng>(rng: &mut R) -> Displacement {
    Displacement::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1), 0)
}

/// One step from `src` toward `dst`.
///
/// When the direct cell is blocked, the step is retried with X, then Y,
/// then Z zeroed. If none of those is free the step is random.
pub fn step_toward<R: Rng>(
    ctx: &MovementContext,
    src: &Location,
    dst: &Location,
    rng: &mut R,
) -> Displacement {
    let direct = Displacement::toward(src, dst);
    let options = [
        direct,
        Displacement::new(0, direct.dy, direct.dz),
        Displacement::new(direct.dx, 0, direct.dz),
        Displacement::new(direct.dx, direct.dy, 0),
    ];
    options
        .into_iter()
        .filter(|d| !d.is_zero())
        .find(|d| !ctx.is_blocked(&src.offset(*d)))
        .unwrap_or_else(|| random_step(rng))
}

/// Whether `other` would be a welcome partner for `entity`.
fn is_mate(ctx: &MovementContext, entity: &Entity, other: &Entity) -> bool {
    let pop = &ctx.config.population;
    other.gender == entity.gender
        && !entity.has_met(&other.id)
        && is_of_spawn_age(other, pop.spawn_age)
        && other.spawn_cooldown_elapsed(ctx.turn, pop.spawn_interval)
}

/// Cell of the most interesting neighbor `entity` remembers seeing.
///
/// Targets are the cells recorded at the last look, not where those
/// entities are now. Prefers the nearest unmet same-gender neighbor that can
/// spawn, then the nearest neighbor of another gender. Equal distances go to
/// the lower location.
#[must_use]
pub fn pick_target(ctx: &MovementContext, entity: &Entity, from: &Location) -> Option<Location> {
    let mut mates: Vec<(f64, Location)> = Vec::new();
    let mut others: Vec<(f64, Location)> = Vec::new();

    for (location, id) in &entity.neighbors {
        if *id == entity.id {
            continue;
        }
        let Some(other) = ctx.population.get(id) else {
            continue;
        };
        let entry = (from.distance(location), *location);
        if is_mate(ctx, entity, other) {
            mates.push(entry);
        } else if other.gender != entity.gender {
            others.push(entry);
        }
    }

    let nearest = |list: Vec<(f64, Location)>| {
        list.into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, l)| l)
    };
    nearest(mates).or_else(|| nearest(others))
}

/// Where `entity`, standing on `from`, should step this turn.
pub fn best_move<R: Rng>(
    ctx: &MovementContext,
    entity: &Entity,
    from: &Location,
    rng: &mut R,
) -> Displacement {
    let perception = &ctx.config.perception;
    if entity.has_fresh_view(ctx.turn, perception.remember_turns) {
        if let Some(target) = pick_target(ctx, entity, from) {
            return step_toward(ctx, from, &target, rng);
        }
    }

    if ctx.config.movement.seek_homebase
        && from.distance(&entity.homebase) > f64::from(perception.view_distance)
    {
        return step_toward(ctx, from, &entity.homebase, rng);
    }

    random_step(rng)
}
