#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Skirmish battle.

mod report;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use skirmish_core::{Event, WELCOME_BANNER};
use skirmish_simulation::{advance, query, Simulation, SimulationTuning};
use skirmish_system_terrain_generation::{generate, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::report::{BattleTally, TeamSummary};

/// Runs a seeded two-team battle and reports how it unfolds.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version, about)]
struct Cli {
    /// Seed for terrain generation and commander decisions.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Cells along each side of the square board.
    #[arg(long, default_value_t = 40)]
    size: u32,
    /// Frame budget before the battle is called off.
    #[arg(long, default_value_t = 20_000)]
    frames: u64,
    /// TOML file overriding any subset of the tuning values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter directives, e.g. `info` or `skirmish_simulation=debug`.
    #[arg(long)]
    log: Option<String>,
    /// Log a roster summary every this many frames; zero disables it.
    #[arg(long, default_value_t = 600)]
    report_every: u64,
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;
    println!("{WELCOME_BANNER}");

    let tuning = load_tuning(cli.config.as_deref())?;
    let battlefield = generate(&Config::new(cli.size, cli.seed))
        .with_context(|| format!("failed to generate a {0}x{0} battlefield", cli.size))?;
    let mut simulation = Simulation::new(battlefield, tuning, cli.seed)
        .context("battlefield failed validation")?;

    let tally = run(&mut simulation, cli.frames, cli.report_every);

    for summary in TeamSummary::collect(&query::agents(&simulation)) {
        println!("{summary}");
    }
    println!("{tally}");
    match query::outcome(&simulation) {
        Some(outcome) => println!("{}", outcome.message()),
        None => println!("No winner after {} frames.", query::frame(&simulation)),
    }
    Ok(())
}

fn init_logging(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
    Ok(())
}

fn load_tuning(path: Option<&Path>) -> Result<SimulationTuning> {
    let Some(path) = path else {
        return Ok(SimulationTuning::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse tuning file {}", path.display()))
}

/// Advances until the battle is decided or the frame budget runs out.
fn run(simulation: &mut Simulation, frames: u64, report_every: u64) -> BattleTally {
    let mut tally = BattleTally::default();
    let mut events: Vec<Event> = Vec::new();

    for _ in 0..frames {
        advance(simulation, &mut events);
        tally.record(&events);
        events.clear();

        let frame = query::frame(simulation);
        if report_every > 0 && frame % report_every == 0 {
            for summary in TeamSummary::collect(&query::agents(simulation)) {
                info!(
                    frame,
                    team = summary.team.name(),
                    standing = summary.standing,
                    down = summary.down,
                    ammo = summary.ammo,
                    "roster"
                );
            }
        }
        if query::outcome(simulation).is_some() {
            break;
        }
    }
    tally
}
