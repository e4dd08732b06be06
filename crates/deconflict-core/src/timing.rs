//! Time normalization for missions declared without per-waypoint timestamps.

use crate::error::{DeconflictionError, Result};
use crate::models::{Mission, Waypoint};

/// Paths shorter than this are treated as stationary.
const MIN_PATH_LENGTH_M: f64 = 1e-9;

/// Assign a timestamp to every waypoint of `mission`.
///
/// Time is distributed across the mission window in proportion to the
/// cumulative path length, so the drone flies at constant speed. A path of
/// zero length (all waypoints coincide) is distributed evenly by index.
/// Already-timed missions are returned unchanged.
///
/// # Errors
/// `InvalidMission` when the window is empty or inverted, or fewer than 2
/// waypoints are given.
pub fn normalize_times(mission: &Mission) -> Result<Mission> {
    let waypoints = mission.waypoints();
    let (start, end) = (mission.start_time(), mission.end_time());

    if waypoints.len() < 2 {
        return Err(DeconflictionError::invalid_mission(
            mission.drone_id(),
            "cannot normalize times with fewer than 2 waypoints",
        ));
    }
    if end <= start {
        return Err(DeconflictionError::invalid_mission(
            mission.drone_id(),
            format!("cannot normalize times over empty window [{start}, {end}]"),
        ));
    }
    if mission.is_timed() {
        return Ok(mission.clone());
    }

    let fractions = progress_fractions(waypoints);
    let duration = end - start;
    let last = waypoints.len() - 1;

    let timed: Vec<Waypoint> = waypoints
        .iter()
        .zip(fractions)
        .enumerate()
        .map(|(index, (wp, fraction))| {
            // Pin the endpoints so rounding never pushes them outside the window.
            let time = match index {
                0 => start,
                i if i == last => end,
                _ => (start + fraction * duration).clamp(start, end),
            };
            Waypoint::timed(wp.x, wp.y, wp.z, time)
        })
        .collect();

    Mission::new(mission.drone_id(), timed, start, end)
}

/// Fraction of the mission completed at each waypoint, in `[0, 1]`.
fn progress_fractions(waypoints: &[Waypoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(waypoints.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for pair in waypoints.windows(2) {
        total += pair[0].distance_to(&pair[1]);
        cumulative.push(total);
    }

    if total < MIN_PATH_LENGTH_M {
        let intervals = (waypoints.len() - 1) as f64;
        return (0..waypoints.len()).map(|i| i as f64 / intervals).collect();
    }

    cumulative.into_iter().map(|d| (d / total).min(1.0)).collect()
}
