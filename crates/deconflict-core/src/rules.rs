//! Safety rules and thresholds for mission deconfliction.

use crate::error::{DeconflictionError, Result};
use crate::geometry::DEFAULT_TIME_SUBDIVISIONS;
use serde::{Deserialize, Serialize};

/// Default minimum separation between two drones, in meters.
pub const DEFAULT_SAFETY_THRESHOLD_M: f64 = 50.0;

/// Configuration for the deconfliction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyRules {
    /// Minimum allowed 3D separation in meters
    pub safety_threshold_m: f64,
    /// Subdivisions of each shared time window for sampled evaluation
    pub time_subdivisions: u32,
    /// Ignore other missions flown by the primary's own drone
    pub skip_same_drone: bool,
}

impl Default for SafetyRules {
    fn default() -> Self {
        Self {
            safety_threshold_m: DEFAULT_SAFETY_THRESHOLD_M,
            time_subdivisions: DEFAULT_TIME_SUBDIVISIONS,
            skip_same_drone: true,
        }
    }
}

impl SafetyRules {
    pub fn with_threshold(mut self, safety_threshold_m: f64) -> Self {
        self.safety_threshold_m = safety_threshold_m;
        self
    }

    pub fn with_time_subdivisions(mut self, time_subdivisions: u32) -> Self {
        self.time_subdivisions = time_subdivisions;
        self
    }

    /// Check the rules are usable.
    ///
    /// # Errors
    /// `Configuration` when the threshold is not a positive finite number or
    /// no time subdivisions are requested.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.safety_threshold_m)?;
        if self.time_subdivisions == 0 {
            return Err(DeconflictionError::Configuration(
                "time_subdivisions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_threshold(safety_threshold_m: f64) -> Result<()> {
    if !safety_threshold_m.is_finite() || safety_threshold_m <= 0.0 {
        return Err(DeconflictionError::Configuration(format!(
            "safety threshold must be positive and finite, got {safety_threshold_m}"
        )));
    }
    Ok(())
}
