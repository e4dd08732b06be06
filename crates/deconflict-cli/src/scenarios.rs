//! Pre-defined mission scenarios against a simulated fleet.

use deconflict_core::{Mission, Result, Waypoint};

const MINUTE: f64 = 60.0;

/// A named check: one primary mission and the traffic it must clear.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub primary: Mission,
    pub others: Vec<Mission>,
}

/// Mission over `(x, y, z, minutes)` points, windowed by its first and last times.
fn mission(drone_id: &str, points: &[(f64, f64, f64, f64)]) -> Result<Mission> {
    let waypoints: Vec<Waypoint> = points
        .iter()
        .map(|&(x, y, z, minutes)| Waypoint::timed(x, y, z, minutes * MINUTE))
        .collect();
    let start = points.first().map(|p| p.3 * MINUTE).unwrap_or_default();
    let end = points.last().map(|p| p.3 * MINUTE).unwrap_or_default();
    Mission::new(drone_id, waypoints, start, end)
}

/// Four drones crossing a 400 m x 400 m block, all at `altitude_m`.
///
/// - drone1: horizontal at y=100, minutes 0-4
/// - drone2: diagonal from the origin, minutes 1-5
/// - drone3: vertical at x=300, minutes 2-6
/// - drone4: zig-zag around y=275, minutes 3-7
pub fn simulated_fleet(altitude_m: f64) -> Result<Vec<Mission>> {
    let z = altitude_m;
    Ok(vec![
        mission(
            "drone1",
            &[(0.0, 100.0, z, 0.0), (200.0, 100.0, z, 2.0), (400.0, 100.0, z, 4.0)],
        )?,
        mission(
            "drone2",
            &[(0.0, 0.0, z, 1.0), (200.0, 200.0, z, 3.0), (400.0, 400.0, z, 5.0)],
        )?,
        mission(
            "drone3",
            &[(300.0, 0.0, z, 2.0), (300.0, 200.0, z, 4.0), (300.0, 400.0, z, 6.0)],
        )?,
        mission(
            "drone4",
            &[
                (100.0, 300.0, z, 3.0),
                (150.0, 250.0, z, 4.0),
                (200.0, 300.0, z, 5.0),
                (250.0, 250.0, z, 6.0),
                (300.0, 300.0, z, 7.0),
            ],
        )?,
    ])
}

/// Primary stays north of the fleet the whole time.
pub fn conflict_free_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "conflict-free".to_string(),
        description: "Primary loops north of the fleet and never comes within range".to_string(),
        primary: mission(
            "primary",
            &[
                (100.0, 400.0, 0.0, 0.0),
                (200.0, 500.0, 0.0, 2.0),
                (300.0, 500.0, 0.0, 4.0),
                (400.0, 400.0, 0.0, 6.0),
            ],
        )?,
        others: simulated_fleet(0.0)?,
    })
}

/// Primary cuts through the fleet at the same altitude.
pub fn conflict_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "with-conflict".to_string(),
        description: "Primary crosses drone2 and drone3 at the same altitude".to_string(),
        primary: crossing_primary(0.0)?,
        others: simulated_fleet(0.0)?,
    })
}

/// Same ground track as [`conflict_scenario`], flown 150 m above the fleet.
pub fn altitude_separation_scenario() -> Result<Scenario> {
    Ok(Scenario {
        name: "altitude-separation".to_string(),
        description: "Primary flies the conflicting ground track at 150 m over a ground-level fleet"
            .to_string(),
        primary: crossing_primary(150.0)?,
        others: simulated_fleet(0.0)?,
    })
}

fn crossing_primary(altitude_m: f64) -> Result<Mission> {
    let z = altitude_m;
    mission(
        "primary",
        &[(0.0, 250.0, z, 1.0), (150.0, 150.0, z, 3.0), (350.0, 250.0, z, 5.0)],
    )
}

/// Scenario by its 1-based number.
pub fn scenario(number: u8) -> Option<Result<Scenario>> {
    match number {
        1 => Some(conflict_free_scenario()),
        2 => Some(conflict_scenario()),
        3 => Some(altitude_separation_scenario()),
        _ => None,
    }
}

pub fn all_scenarios() -> Result<Vec<Scenario>> {
    Ok(vec![
        conflict_free_scenario()?,
        conflict_scenario()?,
        altitude_separation_scenario()?,
    ])
}
