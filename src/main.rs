use anyhow::{Context, Result};
use clap::Parser;
use peeps_lib::app::{App, RunOptions};
use peeps_lib::model::config::AppConfig;
use peeps_lib::report;
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Stop after this many turns (default: run until Ctrl-C)
    #[arg(short, long)]
    turns: Option<u64>,

    /// RNG seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Reseed every turn from seed + turn
    #[arg(long)]
    deterministic: bool,

    /// Initial population, overrides the config file
    #[arg(short, long)]
    population: Option<usize>,

    /// Run turns back to back instead of every `turn_time_ms`
    #[arg(long)]
    fast: bool,

    /// Which report to print when the run ends
    #[arg(short, long, value_enum, default_value = "summary")]
    report: Report,

    /// Print final population stats as JSON
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,

    /// Progress line every N turns (0 = never)
    #[arg(long, default_value_t = 100)]
    log_every: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Report {
    None,
    Summary,
    Settings,
    Grid,
    All,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if args.deterministic {
        config.world.deterministic = true;
    }
    if let Some(population) = args.population {
        config.world.initial_population = population;
    }
    config
        .validate()
        .with_context(|| format!("invalid settings after applying flags to {}", args.config))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    peeps_core::init_logging(&args.log);

    let config = load_config(&args)?;
    let options = RunOptions {
        turns: args.turns,
        log_every: args.log_every,
        paced: !args.fast && config.turn_time_ms > 0,
    };

    let mut app = App::new(config, options)?;
    app.run().await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if matches!(args.report, Report::Summary | Report::All) {
        report::show(&app.world, &mut out)?;
    }
    if matches!(args.report, Report::Settings | Report::All) {
        report::show_settings(&app.world, &mut out)?;
    }
    if matches!(args.report, Report::Grid | Report::All) {
        report::show_grid(&app.world, &mut out)?;
    }
    if args.json {
        let summary = serde_json::json!({
            "turn": app.world.turn(),
            "stats": app.world.population_stats(),
            "events": app.tally,
        });
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    }

    Ok(())
}
