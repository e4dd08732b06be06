//! Error types for mission validation and engine configuration.

/// Errors surfaced to callers of the deconfliction engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeconflictionError {
    /// Malformed mission: too few waypoints, bad time window, bad timestamps.
    #[error("Invalid mission {drone_id}: {reason}")]
    InvalidMission { drone_id: String, reason: String },

    /// Invalid engine or per-call configuration.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl DeconflictionError {
    pub(crate) fn invalid_mission(drone_id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidMission {
            drone_id: drone_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeconflictionError>;
