//! Core data models for mission deconfliction.

use crate::error::{DeconflictionError, Result};
use crate::geometry::midpoint;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point along a mission path, optionally time-stamped.
///
/// Coordinates are in meters in a local Cartesian frame; `time` is seconds
/// since the mission epoch shared by every mission in a check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
}

impl Waypoint {
    /// Create an untimed waypoint.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, time: None }
    }

    /// Create a waypoint with an explicit timestamp.
    pub fn timed(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self {
            x,
            y,
            z,
            time: Some(time),
        }
    }

    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another waypoint in meters.
    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        self.position().distance(other.position())
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One drone's planned flight.
///
/// Validated on construction and on deserialization; a `Mission` value is
/// never malformed. A mission is timed only when every waypoint carries a
/// timestamp; otherwise [`crate::timing::normalize_times`] assigns all of
/// them before any distance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MissionRepr", into = "MissionRepr")]
pub struct Mission {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    start_time: f64,
    end_time: f64,
}

#[derive(Serialize, Deserialize)]
struct MissionRepr {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    start_time: f64,
    end_time: f64,
}

impl TryFrom<MissionRepr> for Mission {
    type Error = DeconflictionError;

    fn try_from(repr: MissionRepr) -> Result<Self> {
        Mission::new(repr.drone_id, repr.waypoints, repr.start_time, repr.end_time)
    }
}

impl From<Mission> for MissionRepr {
    fn from(mission: Mission) -> Self {
        Self {
            drone_id: mission.drone_id,
            waypoints: mission.waypoints,
            start_time: mission.start_time,
            end_time: mission.end_time,
        }
    }
}

impl Mission {
    /// Create a mission, rejecting malformed input.
    ///
    /// # Errors
    /// `InvalidMission` when there are fewer than 2 waypoints, the window is
    /// empty or inverted, coordinates are not finite, or a fully timed
    /// mission has timestamps that decrease or leave the window.
    pub fn new(
        drone_id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: f64,
        end_time: f64,
    ) -> Result<Self> {
        let mission = Self {
            drone_id: drone_id.into(),
            waypoints,
            start_time,
            end_time,
        };
        mission.validate()?;
        Ok(mission)
    }

    fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(DeconflictionError::invalid_mission(&self.drone_id, reason));

        if self.waypoints.len() < 2 {
            return fail(format!(
                "mission must have at least 2 waypoints, got {}",
                self.waypoints.len()
            ));
        }
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return fail("time window bounds must be finite".to_string());
        }
        if self.start_time >= self.end_time {
            return fail(format!(
                "end time ({}) must be after start time ({})",
                self.end_time, self.start_time
            ));
        }
        if let Some(index) = self.waypoints.iter().position(|wp| !wp.is_finite()) {
            return fail(format!("waypoint {index} has non-finite coordinates"));
        }

        // Partially timed missions are re-timed by the normalizer.
        if !self.is_timed() {
            return Ok(());
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, wp) in self.waypoints.iter().enumerate() {
            let time = wp.time.unwrap_or_default();
            if !time.is_finite() {
                return fail(format!("waypoint {index} has a non-finite timestamp"));
            }
            if time < previous {
                return fail(format!(
                    "waypoint {index} timestamp {time} precedes previous timestamp {previous}"
                ));
            }
            previous = time;
        }

        let (first, last) = self.time_span().unwrap_or((self.start_time, self.end_time));
        if first < self.start_time || last > self.end_time {
            return fail(format!(
                "waypoint times [{first}, {last}] fall outside mission window [{}, {}]",
                self.start_time, self.end_time
            ));
        }

        Ok(())
    }

    pub fn drone_id(&self) -> &str {
        &self.drone_id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Whether every waypoint carries a timestamp.
    pub fn is_timed(&self) -> bool {
        self.waypoints.iter().all(|wp| wp.time.is_some())
    }

    /// Number of flight path segments (waypoints - 1).
    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Total 3D path length in meters.
    pub fn path_length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// First and last waypoint timestamps, if the mission is timed.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        if !self.is_timed() {
            return None;
        }
        let first = self.waypoints.first()?.time?;
        let last = self.waypoints.last()?.time?;
        Some((first, last))
    }
}

/// A single separation violation between the primary and another mission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRecord {
    primary_mission_id: String,
    other_mission_id: String,
    primary_segment: usize,
    other_segment: usize,
    /// Midpoint between the two drones at closest approach
    location: DVec3,
    primary_position: DVec3,
    other_position: DVec3,
    time: f64,
    distance: f64,
    safety_threshold: f64,
}

impl ConflictRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        primary_mission_id: &str,
        other_mission_id: &str,
        primary_segment: usize,
        other_segment: usize,
        primary_position: DVec3,
        other_position: DVec3,
        time: f64,
        distance: f64,
        safety_threshold: f64,
    ) -> Self {
        Self {
            primary_mission_id: primary_mission_id.to_string(),
            other_mission_id: other_mission_id.to_string(),
            primary_segment,
            other_segment,
            location: midpoint(primary_position, other_position),
            primary_position,
            other_position,
            time,
            distance,
            safety_threshold,
        }
    }

    pub fn primary_mission_id(&self) -> &str {
        &self.primary_mission_id
    }

    pub fn other_mission_id(&self) -> &str {
        &self.other_mission_id
    }

    /// Index of the primary mission's segment (starting waypoint index).
    pub fn primary_segment(&self) -> usize {
        self.primary_segment
    }

    /// Index of the other mission's segment (starting waypoint index).
    pub fn other_segment(&self) -> usize {
        self.other_segment
    }

    pub fn location(&self) -> DVec3 {
        self.location
    }

    pub fn primary_position(&self) -> DVec3 {
        self.primary_position
    }

    pub fn other_position(&self) -> DVec3 {
        self.other_position
    }

    /// Time of closest approach in seconds since the mission epoch.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Minimum separation in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn safety_threshold(&self) -> f64 {
        self.safety_threshold
    }
}

/// Outcome of a single mission check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictResult {
    is_clear: bool,
    conflicts: Vec<ConflictRecord>,
}

impl ConflictResult {
    pub(crate) fn from_records(conflicts: Vec<ConflictRecord>) -> Self {
        Self {
            is_clear: conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.is_clear
    }

    /// Records in evaluation order (primary segment, other mission, other segment).
    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }

    /// Distinct conflicting drone ids, in order of first appearance.
    pub fn conflicting_drones(&self) -> Vec<&str> {
        let mut drones: Vec<&str> = Vec::new();
        for record in &self.conflicts {
            if !drones.contains(&record.other_mission_id()) {
                drones.push(record.other_mission_id());
            }
        }
        drones
    }

    /// Record with the earliest time of closest approach.
    pub fn earliest_conflict(&self) -> Option<&ConflictRecord> {
        self.conflicts
            .iter()
            .min_by(|a, b| a.time.total_cmp(&b.time))
    }
}

impl fmt::Display for ConflictResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.conflicts.first() else {
            return write!(f, "Mission is clear to fly - no conflicts detected.");
        };
        write!(
            f,
            "CONFLICT DETECTED: {} conflict(s) with {} drone(s). First conflict at t={:.1}s with drone {}.",
            self.conflicts.len(),
            self.conflicting_drones().len(),
            first.time,
            first.other_mission_id
        )
    }
}
