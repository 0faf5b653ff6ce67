//! Headless simulation runner
//!
//! Generates a random population from a config file (or defaults), runs a
//! fixed number of ticks and reports population statistics.

use beings::core::error::Result;
use beings::simulation::{Environment, EnvironmentStats};
use beings::SimulationConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beings-sim")]
#[command(about = "Run a headless arena simulation and report population statistics")]
struct Args {
    /// TOML config file; defaults are used for missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Log stats every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Print the final stats as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut env = Environment::new(config)?;
    env.populate_random()?;
    tracing::info!(seed = env.seed(), ticks = args.ticks, dt = args.dt, "Starting simulation");

    env.resume();
    for tick in 1..=args.ticks {
        env.update(args.dt);

        if args.report_every > 0 && tick % args.report_every == 0 {
            report(env.stats());
        }
        if env.beings().is_empty() {
            tracing::warn!(tick, "Population went extinct");
            break;
        }
    }
    env.pause();

    if args.json {
        println!("{}", serde_json::to_string_pretty(env.stats())?);
    } else {
        print_summary(&env);
    }
    Ok(())
}

fn report(stats: &EnvironmentStats) {
    tracing::info!(
        tick = stats.tick,
        time_ms = stats.time_ms,
        population = stats.population,
        births = stats.births,
        deaths = stats.deaths,
        chasing = stats.targeting_being,
        "Tick stats"
    );
}

fn print_summary(env: &Environment) {
    let stats = env.stats();
    println!("\n=== BEINGS ===");
    println!("Ticks:       {}", env.tick_count());
    println!("Sim time:    {:.2}s", env.now().as_millis() as f64 / 1000.0);
    println!("Population:  {}", env.beings().len());
    println!("Chasing:     {}", stats.targeting_being);
    println!("Wandering:   {}", stats.targeting_location);

    println!("\nGroups:");
    for (group, count) in &stats.groups {
        println!("  {:<10} {}", group, count);
    }
    println!("\nSexes:");
    for (sex, count) in &stats.sexes {
        println!("  {:<10} {}", sex.to_string(), count);
    }

    if let Some(fittest) = env
        .beings()
        .iter()
        .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    {
        let genes = fittest.genes();
        println!(
            "\nFittest: {} ({}) fitness {:.1} | atk {:.1} def {:.1} spd {:.1} size {:.1} hp {:.1}",
            fittest.id(),
            fittest.group(),
            fittest.fitness(),
            genes.attack,
            genes.defense,
            genes.speed,
            genes.size,
            genes.max_health
        );
    }
}
