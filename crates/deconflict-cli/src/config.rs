//! Runner configuration from environment.

use deconflict_core::SafetyRules;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub safety_threshold_m: f64,
    pub time_subdivisions: u32,
}

impl Default for Config {
    fn default() -> Self {
        let rules = SafetyRules::default();
        Self {
            safety_threshold_m: rules.safety_threshold_m,
            time_subdivisions: rules.time_subdivisions,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            safety_threshold_m: lookup("DECONFLICT_SAFETY_THRESHOLD_M")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.safety_threshold_m),
            time_subdivisions: lookup("DECONFLICT_TIME_SUBDIVISIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.time_subdivisions),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, threshold: Option<f64>, subdivisions: Option<u32>) -> Self {
        if let Some(threshold) = threshold {
            self.safety_threshold_m = threshold;
        }
        if let Some(subdivisions) = subdivisions {
            self.time_subdivisions = subdivisions;
        }
        self
    }

    pub fn safety_rules(&self) -> SafetyRules {
        SafetyRules::default()
            .with_threshold(self.safety_threshold_m)
            .with_time_subdivisions(self.time_subdivisions)
    }
}
