use peeps_data::{Entity, PopulationStats};

/// Summarizes a set of entities.
///
/// Age figures cover only the living and are all zero when nobody is alive.
/// `avg_age` is the floored mean.
pub fn population_stats<'a, I>(entities: I) -> PopulationStats
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut stats = PopulationStats::default();
    let mut age_sum: u64 = 0;
    let mut min_age = None;

    for e in entities {
        if !e.is_alive() {
            stats.dead_count += 1;
            continue;
        }
        stats.alive_count += 1;
        *stats.gender_counts.entry(e.gender).or_insert(0) += 1;
        age_sum = age_sum.saturating_add(e.age());
        stats.max_age = stats.max_age.max(e.age());
        min_age = Some(min_age.map_or(e.age(), |m: u64| m.min(e.age())));
    }

    stats.min_age = min_age.unwrap_or(0);
    if stats.alive_count > 0 {
        stats.avg_age = age_sum / stats.alive_count as u64;
    }
    stats
}
