//! JSON scenario files for `check_mission`.

use anyhow::{Context, Result};
use crate::config::Config;
use chrono::{DateTime, Utc};
use deconflict_core::Mission;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A primary mission and its traffic, as loaded from disk.
///
/// Mission times are seconds since `epoch`; the epoch only affects how
/// conflict times are printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub epoch: Option<DateTime<Utc>>,
    /// Overrides the configured threshold for this scenario
    #[serde(default)]
    pub safety_threshold_m: Option<f64>,
    pub primary: Mission,
    #[serde(default)]
    pub others: Vec<Mission>,
}

impl ScenarioFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Layer this file's threshold over `config`, then the command-line flags.
    pub fn apply_overrides(
        &self,
        config: Config,
        threshold: Option<f64>,
        subdivisions: Option<u32>,
    ) -> Config {
        config
            .with_overrides(self.safety_threshold_m, None)
            .with_overrides(threshold, subdivisions)
    }
}
