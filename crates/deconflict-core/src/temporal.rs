//! Temporal pre-filter: rejects segment pairs that are never airborne together.

use crate::geometry::TimedSegment;
use serde::{Deserialize, Serialize};

/// Closed time interval in seconds since the mission epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Intersection of two windows, or `None` unless it has positive duration.
///
/// Windows that only touch at a single instant do not overlap.
pub fn overlap(a: TimeWindow, b: TimeWindow) -> Option<TimeWindow> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (start < end).then_some(TimeWindow { start, end })
}

/// Cheap gate evaluated before any geometry.
pub trait TemporalFilter: Send + Sync {
    /// Shared window of two intervals, if any.
    fn intersect(&self, a: TimeWindow, b: TimeWindow) -> Option<TimeWindow>;

    /// Shared window of two flight path segments, if any.
    fn overlap(&self, a: &TimedSegment, b: &TimedSegment) -> Option<TimeWindow> {
        self.intersect(a.window(), b.window())
    }
}

/// Strict interval intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalOverlap;

impl TemporalFilter for IntervalOverlap {
    fn intersect(&self, a: TimeWindow, b: TimeWindow) -> Option<TimeWindow> {
        overlap(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_partial_overlap() {
        let shared = overlap(TimeWindow::new(0.0, 10.0), TimeWindow::new(5.0, 20.0));
        assert_eq!(shared, Some(TimeWindow::new(5.0, 10.0)));
    }

    #[test]
    fn test_containment() {
        let shared = overlap(TimeWindow::new(0.0, 100.0), TimeWindow::new(40.0, 60.0));
        assert_eq!(shared, Some(TimeWindow::new(40.0, 60.0)));
    }

    #[test]
    fn test_disjoint_windows() {
        assert_eq!(
            overlap(TimeWindow::new(0.0, 10.0), TimeWindow::new(20.0, 30.0)),
            None
        );
    }

    #[test]
    fn test_touching_windows_do_not_overlap() {
        assert_eq!(
            overlap(TimeWindow::new(0.0, 10.0), TimeWindow::new(10.0, 20.0)),
            None
        );
    }

    #[test]
    fn test_filter_uses_segment_windows() {
        let a = TimedSegment::new(DVec3::ZERO, DVec3::X, 0.0, 10.0);
        let b = TimedSegment::new(DVec3::ZERO, DVec3::Y, 8.0, 12.0);
        let shared = IntervalOverlap.overlap(&a, &b);
        assert_eq!(shared, Some(TimeWindow::new(8.0, 10.0)));
        assert_eq!(IntervalOverlap.overlap(&b, &a), shared);
    }
}
