//! Deconfliction CLI - scenario runner and mission checker.
//!
//! Binaries:
//! - demo_scenario: runs the built-in fleet scenarios
//! - check_mission: checks a mission loaded from a JSON file

pub mod config;
pub mod logging;
pub mod report;
pub mod scenario_file;
pub mod scenarios;

pub use config::Config;
pub use logging::init_tracing;
pub use report::ConflictReport;
pub use scenario_file::ScenarioFile;
pub use scenarios::{all_scenarios, scenario, simulated_fleet, Scenario};
