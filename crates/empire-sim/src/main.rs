//! Empire Simulation
//!
//! Plays a seeded game in which every computer-controlled civilization is
//! driven by the AI engine, then writes a JSON summary.

use std::path::PathBuf;

use clap::Parser;
use empire_sim::{ScenarioConfig, Simulation};
use tracing_subscriber::{fmt, EnvFilter};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "empire_sim")]
#[command(about = "Plays a game between AI-controlled civilizations")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of turns to play (overrides the scenario)
    #[arg(long)]
    turns: Option<u32>,

    /// Scenario file (TOML); built-in defaults when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Where to write the JSON summary
    #[arg(long, default_value = "output/summary.json")]
    output: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    fmt().with_env_filter(filter).with_target(false).init();

    let scenario = match &args.scenario {
        Some(path) => match ScenarioConfig::from_file(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                eprintln!("Error: could not load scenario {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ScenarioConfig::default(),
    };
    let turns = args.turns.unwrap_or(scenario.game.turns);

    println!("Empire Simulation");
    println!("=================");
    println!("Seed: {}", args.seed);
    println!("Turns: {}", turns);
    println!(
        "Map: {}x{}, {} civilizations",
        scenario.map.width,
        scenario.map.height,
        scenario.civilizations.len()
    );
    println!();

    let mut sim = Simulation::new(&scenario, args.seed);

    for _ in 0..turns {
        let events = sim.step();
        let turn = sim.turn();
        if !events.is_empty() && turn % 10 == 0 {
            println!("[Turn {:>4}] {} events", turn, events.len());
        }
    }

    let summary = sim.summary();
    println!();
    println!("Game complete after {} turns.", summary.turns);
    for player in &summary.players {
        println!(
            "  {:<12} {:>3} cities {:>4} citizens {:>3} units {:>3} advances",
            player.tribe, player.cities, player.population, player.units, player.advances
        );
    }

    if let Some(dir) = args.output.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Warning: could not create {}: {}", dir.display(), e);
        }
    }
    match summary.write(&args.output) {
        Ok(()) => println!("Wrote {}", args.output.display()),
        Err(e) => {
            eprintln!("Error: could not write summary: {}", e);
            std::process::exit(1);
        }
    }
}
