//! Plain-text views of a world: summary, settings and the living grid.

use crate::model::world::World;
use anyhow::Result;
use std::io::Write;

const RULE: usize = 80;

/// Name, turn, population counts, ages and genders.
pub fn show(world: &World, w: &mut impl Write) -> Result<()> {
    let settings = world.settings();
    let stats = world.population_stats();
    writeln!(w, "{}", "-".repeat(RULE))?;
    writeln!(w, "Name: {}", settings.world.name)?;
    writeln!(w, "Turn: {}", world.turn())?;
    writeln!(
        w,
        "Peeps Alive/Dead/MaxAlive: {}/{}/{}",
        stats.alive_count, stats.dead_count, settings.population.max_peeps
    )?;
    writeln!(
        w,
        "Peep Max/Avg/Min Age: {}/{}/{}",
        stats.max_age, stats.avg_age, stats.min_age
    )?;
    let genders: Vec<String> = stats
        .gender_counts
        .iter()
        .map(|(g, n)| format!("{g}:{n}"))
        .collect();
    writeln!(w, "Genders: [{}]", genders.join(" "))?;
    Ok(())
}

/// The active configuration as TOML.
pub fn show_settings(world: &World, w: &mut impl Write) -> Result<()> {
    writeln!(w, "--------")?;
    writeln!(w, "Settings")?;
    writeln!(w, "--------")?;
    write!(w, "{}", toml::to_string_pretty(world.settings())?)?;
    writeln!(w, "# fingerprint: {}", world.settings().fingerprint())?;
    Ok(())
}

/// One line per living entity, in location order. Young entities are
/// starred.
pub fn show_grid(world: &World, w: &mut impl Write) -> Result<()> {
    let young = world.settings().display.young_highlight_age;
    writeln!(w, "World GRID:")?;
    writeln!(w, "{}", "*".repeat(40))?;
    for (location, peep) in world.occupied_locations() {
        if !peep.alive {
            continue;
        }
        let mark = if peep.age <= young { "*" } else { " " };
        writeln!(
            w,
            "{mark} {location} {} age:{} gender:{}",
            peep.id, peep.age, peep.gender
        )?;
    }
    writeln!(w, "{}", "*".repeat(40))?;
    Ok(())
}
