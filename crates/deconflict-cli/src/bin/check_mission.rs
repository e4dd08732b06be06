//! Check a mission from a JSON scenario file.
//!
//! Exits 0 when the mission is clear and 2 when conflicts are found.
//!
//! Usage:
//!   cargo run -p deconflict-cli --bin check_mission -- mission.json --json

use clap::Parser;
use deconflict_cli::{init_tracing, Config, ConflictReport, ScenarioFile};
use deconflict_core::DeconflictionEngine;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_CONFLICTS: u8 = 2;

/// Strategic deconfliction check for a single mission
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scenario file with `primary` and `others` missions
    path: PathBuf,

    /// Minimum safe separation in meters (overrides the file's value)
    #[arg(long)]
    threshold: Option<f64>,

    /// Sampling subdivisions per overlapping window
    #[arg(long)]
    subdivisions: Option<u32>,

    /// Print the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing()?;
    let args = Args::parse();

    let file = ScenarioFile::load(&args.path)?;
    let config = file.apply_overrides(Config::from_env(), args.threshold, args.subdivisions);
    let engine = DeconflictionEngine::new(config.safety_rules())?;

    tracing::info!(
        scenario = file.name.as_deref().unwrap_or("unnamed"),
        primary = file.primary.drone_id(),
        traffic = file.others.len(),
        threshold_m = config.safety_threshold_m,
        "Checking mission"
    );
    let result = engine.check_mission(&file.primary, &file.others)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", ConflictReport::new(&result).with_epoch(file.epoch));
    }

    Ok(if result.is_clear() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_CONFLICTS)
    })
}
