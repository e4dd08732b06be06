//! Demo Scenario - run the built-in missions against the simulated fleet.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin demo_scenario -- --scenario with-conflict
//!   cargo run -p deconflict-cli --bin demo_scenario -- --run-all

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use deconflict_cli::{all_scenarios, init_tracing, scenario, Config, ConflictReport, Scenario};
use deconflict_core::DeconflictionEngine;

/// Built-in scenarios
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioType {
    /// Primary stays clear of the fleet
    ConflictFree,
    /// Primary crosses two fleet drones
    WithConflict,
    /// Conflicting ground track, flown above the fleet
    AltitudeSeparation,
}

impl ScenarioType {
    fn number(self) -> u8 {
        match self {
            ScenarioType::ConflictFree => 1,
            ScenarioType::WithConflict => 2,
            ScenarioType::AltitudeSeparation => 3,
        }
    }
}

/// Strategic deconfliction demo
#[derive(Parser, Debug)]
#[command(author, version, about = "Run built-in deconfliction scenarios")]
struct Args {
    /// Scenario to run
    #[arg(long, value_enum, default_value = "with-conflict")]
    scenario: ScenarioType,

    /// Run every scenario in order
    #[arg(long)]
    run_all: bool,

    /// Minimum safe separation in meters
    #[arg(long)]
    threshold: Option<f64>,

    /// Sampling subdivisions per overlapping window
    #[arg(long)]
    subdivisions: Option<u32>,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let config = Config::from_env().with_overrides(args.threshold, args.subdivisions);
    let engine = DeconflictionEngine::new(config.safety_rules())?;

    let scenarios = if args.run_all {
        all_scenarios()?
    } else {
        let number = args.scenario.number();
        let selected = scenario(number).with_context(|| format!("unknown scenario {number}"))??;
        vec![selected]
    };

    let epoch = Utc::now();
    for (index, scenario) in scenarios.iter().enumerate() {
        run(&engine, scenario, index + 1, epoch, args.json)?;
    }
    Ok(())
}

fn run(
    engine: &DeconflictionEngine,
    scenario: &Scenario,
    number: usize,
    epoch: chrono::DateTime<Utc>,
    json: bool,
) -> anyhow::Result<()> {
    tracing::info!(
        scenario = %scenario.name,
        traffic = scenario.others.len(),
        "Running scenario"
    );
    let result = engine.check_mission(&scenario.primary, &scenario.others)?;

    if json {
        let output = serde_json::json!({
            "scenario": scenario.name,
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("=== Scenario {number}: {} ===", scenario.name);
    println!("{}", scenario.description);
    println!(
        "Primary: {} waypoints, window {:.0}s - {:.0}s",
        scenario.primary.waypoints().len(),
        scenario.primary.start_time(),
        scenario.primary.end_time()
    );
    println!();
    print!("{}", ConflictReport::new(&result).with_epoch(Some(epoch)));
    println!();
    Ok(())
}
