//! Segment geometry for conflict detection.
//!
//! Two layers: the static closest-points problem between two 3D line
//! segments, and the minimum separation between two points moving linearly
//! along their segments over a shared time window.

use crate::temporal::TimeWindow;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Squared lengths below this are treated as zero-length segments.
const DEGENERATE_LENGTH_SQ: f64 = 1e-12;
/// Relative tolerance on |d1 x d2|^2 for treating segments as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;
/// Relative speeds (squared, m^2/s^2) below this are treated as no relative motion.
const STATIONARY_SPEED_SQ: f64 = 1e-18;

/// Default number of subdivisions of the shared window for sampled evaluation.
pub const DEFAULT_TIME_SUBDIVISIONS: u32 = 20;

/// Straight-line, time-interpolated motion between two consecutive waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub start: DVec3,
    pub end: DVec3,
    pub start_time: f64,
    pub end_time: f64,
}

impl TimedSegment {
    pub fn new(start: DVec3, end: DVec3, start_time: f64, end_time: f64) -> Self {
        Self {
            start,
            end,
            start_time,
            end_time,
        }
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Interpolated position at time `t`, clamped to the segment endpoints.
    pub fn position_at(&self, t: f64) -> DVec3 {
        let duration = self.duration();
        if duration <= 0.0 {
            return self.start;
        }
        let ratio = ((t - self.start_time) / duration).clamp(0.0, 1.0);
        // Offset form keeps constant coordinates exact.
        self.start + (self.end - self.start) * ratio
    }

    /// Velocity in m/s; zero for zero-duration segments.
    pub fn velocity(&self) -> DVec3 {
        let duration = self.duration();
        if duration <= 0.0 {
            return DVec3::ZERO;
        }
        (self.end - self.start) / duration
    }
}

pub(crate) fn midpoint(a: DVec3, b: DVec3) -> DVec3 {
    (a + b) * 0.5
}

/// Closest points between two static segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClosestPoints {
    pub distance: f64,
    pub point_on_a: DVec3,
    pub point_on_b: DVec3,
    /// Parameter of `point_on_a` along segment A, in `[0, 1]`
    pub s: f64,
    /// Parameter of `point_on_b` along segment B, in `[0, 1]`
    pub u: f64,
}

/// Closest point on segment `a..b` to `p`, with its parameter in `[0, 1]`.
pub fn closest_point_on_segment(p: DVec3, a: DVec3, b: DVec3) -> (DVec3, f64) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Minimum distance between segments `p1..p2` and `p3..p4`, ignoring time.
///
/// Solves the 2x2 system built from the direction dot products and clamps
/// the parameters to the segments. Parallel segments fall back to the four
/// endpoint-to-segment distances; zero-length segments are handled as points.
pub fn closest_points_between_segments(
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,
    p4: DVec3,
) -> SegmentClosestPoints {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let r = p1 - p3;
    let a = d1.length_squared();
    let e = d2.length_squared();

    let build = |s: f64, u: f64| {
        let point_on_a = p1 + d1 * s;
        let point_on_b = p3 + d2 * u;
        SegmentClosestPoints {
            distance: point_on_a.distance(point_on_b),
            point_on_a,
            point_on_b,
            s,
            u,
        }
    };

    if a <= DEGENERATE_LENGTH_SQ && e <= DEGENERATE_LENGTH_SQ {
        return build(0.0, 0.0);
    }
    if a <= DEGENERATE_LENGTH_SQ {
        let (_, u) = closest_point_on_segment(p1, p3, p4);
        return build(0.0, u);
    }
    if e <= DEGENERATE_LENGTH_SQ {
        let (_, s) = closest_point_on_segment(p3, p1, p2);
        return build(s, 0.0);
    }

    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);
    let denom = a * e - b * b;

    if denom <= PARALLEL_TOLERANCE * a * e {
        return parallel_closest_points(p1, p2, p3, p4, build);
    }

    let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
    let mut u = (b * s + f) / e;
    if u < 0.0 {
        u = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if u > 1.0 {
        u = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }

    build(s, u)
}

fn parallel_closest_points(
    p1: DVec3,
    p2: DVec3,
    p3: DVec3,
    p4: DVec3,
    build: impl Fn(f64, f64) -> SegmentClosestPoints,
) -> SegmentClosestPoints {
    let (_, u1) = closest_point_on_segment(p1, p3, p4);
    let (_, u2) = closest_point_on_segment(p2, p3, p4);
    let (_, s3) = closest_point_on_segment(p3, p1, p2);
    let (_, s4) = closest_point_on_segment(p4, p1, p2);

    [build(0.0, u1), build(1.0, u2), build(s3, 0.0), build(s4, 1.0)]
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.distance < best.distance {
                candidate
            } else {
                best
            }
        })
        .unwrap_or_else(|| build(0.0, 0.0))
}

/// Lower bound on the separation of two moving segments over `window`.
///
/// Distance between the sub-paths each drone flies during the window,
/// ignoring time. The true moving separation can never be smaller.
pub fn swept_separation(a: &TimedSegment, b: &TimedSegment, window: TimeWindow) -> f64 {
    closest_points_between_segments(
        a.position_at(window.start),
        a.position_at(window.end),
        b.position_at(window.start),
        b.position_at(window.end),
    )
    .distance
}

/// Minimum separation between two moving drones over a shared window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClosestApproach {
    pub distance: f64,
    pub point_on_a: DVec3,
    pub point_on_b: DVec3,
    /// Seconds since the mission epoch
    pub time: f64,
}

impl ClosestApproach {
    fn at(a: &TimedSegment, b: &TimedSegment, time: f64) -> Self {
        let point_on_a = a.position_at(time);
        let point_on_b = b.position_at(time);
        Self {
            distance: point_on_a.distance(point_on_b),
            point_on_a,
            point_on_b,
            time,
        }
    }

    /// Midpoint between the two drones.
    pub fn midpoint(&self) -> DVec3 {
        midpoint(self.point_on_a, self.point_on_b)
    }
}

/// Strategy computing the closest approach of two moving segments.
pub trait GeometryEvaluator: Send + Sync {
    /// Closest approach of `a` and `b` within `window`.
    ///
    /// `window` is expected to lie inside both segments' time intervals.
    fn minimum_distance(
        &self,
        a: &TimedSegment,
        b: &TimedSegment,
        window: TimeWindow,
    ) -> ClosestApproach;
}

/// Evaluates separation at evenly spaced instants across the window.
///
/// An approximation: between two samples the true separation may dip below
/// the reported minimum. More subdivisions shrink the gap at linear cost.
#[derive(Debug, Clone, Copy)]
pub struct SampledGeometry {
    subdivisions: u32,
}

impl Default for SampledGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SUBDIVISIONS)
    }
}

impl SampledGeometry {
    /// `subdivisions` intervals, i.e. `subdivisions + 1` sample instants.
    pub fn new(subdivisions: u32) -> Self {
        Self {
            subdivisions: subdivisions.max(1),
        }
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }
}

impl GeometryEvaluator for SampledGeometry {
    fn minimum_distance(
        &self,
        a: &TimedSegment,
        b: &TimedSegment,
        window: TimeWindow,
    ) -> ClosestApproach {
        let steps = self.subdivisions;
        let span = window.duration();

        let mut best = ClosestApproach::at(a, b, window.start);
        for k in 1..=steps {
            let time = if k == steps {
                window.end
            } else {
                window.start + span * (k as f64 / steps as f64)
            };
            let candidate = ClosestApproach::at(a, b, time);
            // Strict comparison keeps the earliest instant on ties.
            if candidate.distance < best.distance {
                best = candidate;
            }
        }
        best
    }
}

/// Exact minimum of the relative-motion quadratic over the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormGeometry;

impl GeometryEvaluator for ClosedFormGeometry {
    fn minimum_distance(
        &self,
        a: &TimedSegment,
        b: &TimedSegment,
        window: TimeWindow,
    ) -> ClosestApproach {
        let relative_start = a.position_at(window.start) - b.position_at(window.start);
        let relative_velocity = a.velocity() - b.velocity();
        let speed_sq = relative_velocity.length_squared();

        if speed_sq <= STATIONARY_SPEED_SQ {
            return ClosestApproach::at(a, b, window.start);
        }

        let offset = (-relative_start.dot(relative_velocity) / speed_sq).clamp(0.0, window.duration());
        ClosestApproach::at(a, b, window.start + offset)
    }
}
