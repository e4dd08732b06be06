//! End-to-end deconfliction scenarios against the public API.

use deconflict_core::{
    DeconflictionEngine, Mission, SafetyRules, TimeWindow, TimedSegment, Waypoint,
    GeometryEvaluator, SampledGeometry,
};
use glam::DVec3;

fn timed(drone_id: &str, points: &[(f64, f64, f64, f64)], window: (f64, f64)) -> Mission {
    let waypoints = points
        .iter()
        .map(|&(x, y, z, t)| Waypoint::timed(x, y, z, t))
        .collect();
    Mission::new(drone_id, waypoints, window.0, window.1).unwrap()
}

fn engine() -> DeconflictionEngine {
    DeconflictionEngine::new(SafetyRules::default()).unwrap()
}

/// Fleet of four drones sharing a 400 m x 400 m block, times in seconds.
fn simulated_fleet(z: f64) -> Vec<Mission> {
    vec![
        timed(
            "drone1",
            &[(0.0, 100.0, z, 0.0), (200.0, 100.0, z, 120.0), (400.0, 100.0, z, 240.0)],
            (0.0, 240.0),
        ),
        timed(
            "drone2",
            &[(0.0, 0.0, z, 60.0), (200.0, 200.0, z, 180.0), (400.0, 400.0, z, 300.0)],
            (60.0, 300.0),
        ),
        timed(
            "drone3",
            &[(300.0, 0.0, z, 120.0), (300.0, 200.0, z, 240.0), (300.0, 400.0, z, 360.0)],
            (120.0, 360.0),
        ),
        timed(
            "drone4",
            &[
                (100.0, 300.0, z, 180.0),
                (150.0, 250.0, z, 240.0),
                (200.0, 300.0, z, 300.0),
                (250.0, 250.0, z, 360.0),
                (300.0, 300.0, z, 420.0),
            ],
            (180.0, 420.0),
        ),
    ]
}

#[test]
fn crossing_paths_report_single_conflict() {
    let primary = timed(
        "primary",
        &[(0.0, 0.0, 10.0, 0.0), (100.0, 0.0, 10.0, 100.0)],
        (0.0, 100.0),
    );
    let other = timed(
        "other",
        &[(50.0, -10.0, 10.0, 40.0), (50.0, 10.0, 10.0, 60.0)],
        (40.0, 60.0),
    );

    let result = engine().check_mission(&primary, &[other]).unwrap();
    assert!(!result.is_clear());
    assert_eq!(result.conflicts().len(), 1);
    assert!(result.conflicts()[0].distance() < 50.0);
}

#[test]
fn vertical_separation_keeps_mission_clear() {
    let primary = timed(
        "primary",
        &[(0.0, 0.0, 10.0, 0.0), (100.0, 0.0, 10.0, 100.0)],
        (0.0, 100.0),
    );
    let other = timed(
        "other",
        &[(50.0, -10.0, 100.0, 40.0), (50.0, 10.0, 100.0, 60.0)],
        (40.0, 60.0),
    );

    let result = engine().check_mission(&primary, &[other]).unwrap();
    assert!(result.is_clear());
}

#[test]
fn stacked_identical_tracks_above_threshold_are_clear() {
    let low = timed(
        "low",
        &[(0.0, 0.0, 0.0, 0.0), (300.0, 0.0, 0.0, 300.0)],
        (0.0, 300.0),
    );
    let high = timed(
        "high",
        &[(0.0, 0.0, 60.0, 0.0), (300.0, 0.0, 60.0, 300.0)],
        (0.0, 300.0),
    );
    assert!(engine().check_mission(&low, &[high]).unwrap().is_clear());
}

#[test]
fn disjoint_windows_never_conflict() {
    let first = timed(
        "first",
        &[(0.0, 0.0, 10.0, 0.0), (100.0, 0.0, 10.0, 10.0)],
        (0.0, 10.0),
    );
    let second = timed(
        "second",
        &[(0.0, 0.0, 10.0, 20.0), (100.0, 0.0, 10.0, 30.0)],
        (20.0, 30.0),
    );

    let result = engine().check_mission(&first, &[second]).unwrap();
    assert!(result.is_clear());
    assert!(result.conflicts().is_empty());
}

#[test]
fn one_unit_below_threshold_conflicts() {
    let primary = timed(
        "primary",
        &[(0.0, 0.0, 0.0, 0.0), (100.0, 0.0, 0.0, 100.0)],
        (0.0, 100.0),
    );
    let at_threshold = timed(
        "at",
        &[(0.0, 0.0, 50.0, 0.0), (100.0, 0.0, 50.0, 100.0)],
        (0.0, 100.0),
    );
    let below = timed(
        "below",
        &[(0.0, 0.0, 49.0, 0.0), (100.0, 0.0, 49.0, 100.0)],
        (0.0, 100.0),
    );

    let engine = engine();
    assert!(engine.check_mission(&primary, &[at_threshold]).unwrap().is_clear());
    let result = engine.check_mission(&primary, &[below]).unwrap();
    assert_eq!(result.conflicts().len(), 1);
    assert!((result.conflicts()[0].distance() - 49.0).abs() < 1e-9);
}

#[test]
fn repeated_checks_are_identical() {
    let primary = timed(
        "primary",
        &[(0.0, 250.0, 0.0, 60.0), (150.0, 150.0, 0.0, 180.0), (350.0, 250.0, 0.0, 300.0)],
        (60.0, 300.0),
    );
    let fleet = simulated_fleet(0.0);
    let engine = engine();

    let first = engine.check_mission(&primary, &fleet).unwrap();
    let second = engine.check_mission(&primary, &fleet).unwrap();
    assert!(!first.is_clear());
    assert_eq!(first, second);
}

#[test]
fn fleet_conflict_free_mission() {
    let primary = timed(
        "primary",
        &[
            (100.0, 400.0, 0.0, 0.0),
            (200.0, 500.0, 0.0, 120.0),
            (300.0, 500.0, 0.0, 240.0),
            (400.0, 400.0, 0.0, 360.0),
        ],
        (0.0, 360.0),
    );
    let result = engine().check_mission(&primary, &simulated_fleet(0.0)).unwrap();
    assert!(result.is_clear(), "{result}");
}

#[test]
fn fleet_altitude_separation_avoids_2d_conflict() {
    let flat = timed(
        "primary",
        &[(0.0, 250.0, 0.0, 60.0), (150.0, 150.0, 0.0, 180.0), (350.0, 250.0, 0.0, 300.0)],
        (60.0, 300.0),
    );
    let raised = timed(
        "primary",
        &[
            (0.0, 250.0, 150.0, 60.0),
            (150.0, 150.0, 150.0, 180.0),
            (350.0, 250.0, 150.0, 300.0),
        ],
        (60.0, 300.0),
    );

    let engine = engine();
    assert!(!engine.check_mission(&flat, &simulated_fleet(0.0)).unwrap().is_clear());
    assert!(engine.check_mission(&raised, &simulated_fleet(0.0)).unwrap().is_clear());
}

#[test]
fn sampled_distance_is_symmetric_and_non_negative() {
    let segments = [
        TimedSegment::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(90.0, 10.0, 5.0), 0.0, 90.0),
        TimedSegment::new(DVec3::new(40.0, -30.0, 0.0), DVec3::new(40.0, 30.0, 0.0), 20.0, 80.0),
        TimedSegment::new(DVec3::new(5.0, 5.0, 5.0), DVec3::new(5.0, 5.0, 5.0), 10.0, 50.0),
    ];
    let geometry = SampledGeometry::default();

    for a in &segments {
        for b in &segments {
            let Some(window) = deconflict_core::overlap(a.window(), b.window()) else {
                continue;
            };
            let ab = geometry.minimum_distance(a, b, window);
            let ba = geometry.minimum_distance(b, a, window);
            assert_eq!(ab.distance, ba.distance);
            assert!(ab.distance >= 0.0);
            assert!(window.contains(ab.time));
        }
    }

    let window = TimeWindow::new(0.0, 10.0);
    let same = geometry.minimum_distance(&segments[0], &segments[0], window);
    assert_eq!(same.distance, 0.0);
    assert_eq!(same.time, 0.0);
}

#[test]
fn missions_round_trip_through_json() {
    let json = r#"[
        {"drone_id": "a", "start_time": 0, "end_time": 100,
         "waypoints": [{"x": 0, "y": 0, "z": 10}, {"x": 100, "y": 0, "z": 10}]},
        {"drone_id": "b", "start_time": 40, "end_time": 60,
         "waypoints": [{"x": 50, "y": -10, "z": 10, "time": 40},
                       {"x": 50, "y": 10, "z": 10, "time": 60}]}
    ]"#;
    let missions: Vec<Mission> = serde_json::from_str(json).unwrap();
    let result = engine().check_mission(&missions[0], &missions[1..]).unwrap();
    assert_eq!(result.conflicts().len(), 1);

    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["is_clear"], false);
    assert_eq!(encoded["conflicts"][0]["other_mission_id"], "b");
}
