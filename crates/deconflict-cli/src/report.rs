//! Human-readable conflict reports.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use deconflict_core::ConflictResult;
use std::fmt;

/// Multi-line report of a check, printable with `{}`.
pub struct ConflictReport<'a> {
    result: &'a ConflictResult,
    epoch: Option<DateTime<Utc>>,
}

impl<'a> ConflictReport<'a> {
    pub fn new(result: &'a ConflictResult) -> Self {
        Self {
            result,
            epoch: None,
        }
    }

    /// Print conflict times as absolute UTC timestamps relative to `epoch`.
    pub fn with_epoch(mut self, epoch: Option<DateTime<Utc>>) -> Self {
        self.epoch = epoch;
        self
    }

    fn format_time(&self, seconds: f64) -> String {
        // Out-of-range offsets fall back to relative time.
        let absolute = self.epoch.and_then(|epoch| {
            let offset = TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)?;
            epoch.checked_add_signed(offset)
        });
        match absolute {
            Some(at) => format!(
                "{} (t={seconds:.1}s)",
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => format!("t={seconds:.1}s"),
        }
    }
}

impl fmt::Display for ConflictReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.result)?;
        if self.result.is_clear() {
            return Ok(());
        }

        writeln!(f, "Found {} conflicts:", self.result.conflicts().len())?;
        for (index, conflict) in self.result.conflicts().iter().enumerate() {
            let location = conflict.location();
            writeln!(f, "  Conflict {}:", index + 1)?;
            writeln!(
                f,
                "    Location: ({:.1}, {:.1}, {:.1})",
                location.x, location.y, location.z
            )?;
            writeln!(f, "    Time: {}", self.format_time(conflict.time()))?;
            writeln!(
                f,
                "    With drone: {} (segments {} / {})",
                conflict.other_mission_id(),
                conflict.primary_segment(),
                conflict.other_segment()
            )?;
            writeln!(
                f,
                "    Distance: {:.1}m (minimum safe: {}m)",
                conflict.distance(),
                conflict.safety_threshold()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconflict_core::{DeconflictionEngine, Mission, SafetyRules, Waypoint};

    fn crossing_result() -> ConflictResult {
        let primary = Mission::new(
            "primary",
            vec![
                Waypoint::timed(0.0, 0.0, 10.0, 0.0),
                Waypoint::timed(100.0, 0.0, 10.0, 100.0),
            ],
            0.0,
            100.0,
        )
        .unwrap();
        let other = Mission::new(
            "crosser",
            vec![
                Waypoint::timed(50.0, -10.0, 10.0, 40.0),
                Waypoint::timed(50.0, 10.0, 10.0, 60.0),
            ],
            40.0,
            60.0,
        )
        .unwrap();
        DeconflictionEngine::new(SafetyRules::default())
            .unwrap()
            .check_mission(&primary, &[other])
            .unwrap()
    }

    #[test]
    fn test_report_lists_conflicts() {
        let result = crossing_result();
        let text = ConflictReport::new(&result).to_string();
        assert!(text.starts_with("CONFLICT DETECTED: 1 conflict(s) with 1 drone(s)."));
        assert!(text.contains("Location: (50.0, 0.0, 10.0)"));
        assert!(text.contains("Time: t=50.0s"));
        assert!(text.contains("With drone: crosser (segments 0 / 0)"));
        assert!(text.contains("Distance: 0.0m (minimum safe: 50m)"));
    }

    #[test]
    fn test_report_uses_epoch() {
        let result = crossing_result();
        let epoch = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let text = ConflictReport::new(&result)
            .with_epoch(Some(epoch))
            .to_string();
        assert!(text.contains("Time: 2024-05-01T12:00:50Z (t=50.0s)"));
    }

    #[test]
    fn test_report_falls_back_when_epoch_offset_overflows() {
        let track = |drone_id: &str, y: f64| {
            Mission::new(
                drone_id,
                vec![
                    Waypoint::timed(0.0, y, 10.0, -1e16),
                    Waypoint::timed(100.0, y, 10.0, -1e16 + 100.0),
                ],
                -1e16,
                -1e16 + 100.0,
            )
            .unwrap()
        };
        let result = DeconflictionEngine::new(SafetyRules::default())
            .unwrap()
            .check_mission(&track("primary", 0.0), &[track("close", 10.0)])
            .unwrap();
        assert!(!result.is_clear());

        let epoch = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let text = ConflictReport::new(&result)
            .with_epoch(Some(epoch))
            .to_string();
        assert!(text.contains("Time: t=-10000000000000000.0s"));
    }
}
