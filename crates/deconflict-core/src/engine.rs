//! Deconfliction engine.
//!
//! Checks a primary mission against the other missions sharing its airspace
//! by enumerating every pair of flight path segments, gating each pair on
//! temporal overlap, and evaluating the closest approach of the survivors.

use crate::error::Result;
use crate::geometry::{swept_separation, GeometryEvaluator, SampledGeometry, TimedSegment};
use crate::models::{ConflictRecord, ConflictResult, Mission};
use crate::rules::{validate_threshold, SafetyRules};
use crate::temporal::{IntervalOverlap, TemporalFilter, TimeWindow};
use crate::timing::normalize_times;
use std::borrow::Cow;
use std::time::Instant;

/// Relative slack before a pair is pruned on its swept separation.
const PRUNE_TOLERANCE: f64 = 1e-9;

/// Outcome of a deadline-bounded check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Every segment pair was evaluated.
    Complete(ConflictResult),
    /// The deadline passed before enumeration finished.
    Partial(PartialResult),
}

impl CheckOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, CheckOutcome::Complete(_))
    }

    /// Conflicts found, whether or not the check finished.
    pub fn conflicts(&self) -> &[ConflictRecord] {
        match self {
            CheckOutcome::Complete(result) => result.conflicts(),
            CheckOutcome::Partial(partial) => partial.conflicts(),
        }
    }
}

/// Conflicts found before a deadline cut a check short.
///
/// Absence of conflicts here says nothing about the unevaluated segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialResult {
    conflicts: Vec<ConflictRecord>,
    segments_evaluated: usize,
    segments_total: usize,
}

impl PartialResult {
    pub fn conflicts(&self) -> &[ConflictRecord] {
        &self.conflicts
    }

    /// Primary segments whose pairs were all evaluated.
    pub fn segments_evaluated(&self) -> usize {
        self.segments_evaluated
    }

    pub fn segments_total(&self) -> usize {
        self.segments_total
    }
}

/// Pair counters collected during one check, for logging.
#[derive(Debug, Default, Clone, Copy)]
struct CheckStats {
    missions_skipped: usize,
    pairs_overlapping: usize,
    pairs_pruned: usize,
    pairs_evaluated: usize,
}

/// An other mission prepared for enumeration.
struct Traffic<'a> {
    drone_id: &'a str,
    span: TimeWindow,
    segments: Vec<TimedSegment>,
}

/// Strategic deconfliction engine.
///
/// Stateless between calls: every check allocates a fresh result, so one
/// engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DeconflictionEngine<F = IntervalOverlap, G = SampledGeometry> {
    rules: SafetyRules,
    filter: F,
    geometry: G,
}

impl Default for DeconflictionEngine {
    fn default() -> Self {
        let rules = SafetyRules::default();
        Self {
            geometry: SampledGeometry::new(rules.time_subdivisions),
            filter: IntervalOverlap,
            rules,
        }
    }
}

impl DeconflictionEngine {
    /// Engine with the default interval filter and sampled geometry.
    ///
    /// # Errors
    /// `Configuration` when the rules fail validation.
    pub fn new(rules: SafetyRules) -> Result<Self> {
        let geometry = SampledGeometry::new(rules.time_subdivisions);
        Self::with_strategies(rules, IntervalOverlap, geometry)
    }
}

impl<F: TemporalFilter, G: GeometryEvaluator> DeconflictionEngine<F, G> {
    /// Engine with caller-supplied filter and geometry strategies.
    ///
    /// # Errors
    /// `Configuration` when the rules fail validation.
    pub fn with_strategies(rules: SafetyRules, filter: F, geometry: G) -> Result<Self> {
        rules.validate()?;
        Ok(Self {
            rules,
            filter,
            geometry,
        })
    }

    pub fn rules(&self) -> &SafetyRules {
        &self.rules
    }

    /// Check `primary` against `others` using the configured threshold.
    ///
    /// # Errors
    /// `InvalidMission` when a mission cannot be time-normalized.
    pub fn check_mission(&self, primary: &Mission, others: &[Mission]) -> Result<ConflictResult> {
        self.check_mission_with_threshold(primary, others, self.rules.safety_threshold_m)
    }

    /// Check `primary` against `others` with a per-call safety threshold.
    ///
    /// # Errors
    /// `Configuration` for a non-positive threshold, `InvalidMission` when a
    /// mission cannot be time-normalized.
    pub fn check_mission_with_threshold(
        &self,
        primary: &Mission,
        others: &[Mission],
        safety_threshold_m: f64,
    ) -> Result<ConflictResult> {
        match self.run(primary, others, safety_threshold_m, None)? {
            CheckOutcome::Complete(result) => Ok(result),
            // Unreachable without a deadline; keep what was found.
            CheckOutcome::Partial(partial) => Ok(ConflictResult::from_records(partial.conflicts)),
        }
    }

    /// Check with the configured threshold, giving up at `deadline`.
    ///
    /// The deadline is checked before each primary segment, so the overrun
    /// is bounded by one segment's worth of pairs.
    ///
    /// # Errors
    /// Same as [`Self::check_mission`].
    pub fn check_mission_until(
        &self,
        primary: &Mission,
        others: &[Mission],
        deadline: Instant,
    ) -> Result<CheckOutcome> {
        self.run(primary, others, self.rules.safety_threshold_m, Some(deadline))
    }

    fn run(
        &self,
        primary: &Mission,
        others: &[Mission],
        safety_threshold_m: f64,
        deadline: Option<Instant>,
    ) -> Result<CheckOutcome> {
        validate_threshold(safety_threshold_m)?;

        let primary_segments = timed_segments(primary)?;
        let primary_span = span_of(&primary_segments);
        let mut stats = CheckStats::default();

        // Normalize everything up front so malformed input fails before any output.
        let mut traffic = Vec::with_capacity(others.len());
        for other in others {
            if self.rules.skip_same_drone && other.drone_id() == primary.drone_id() {
                stats.missions_skipped += 1;
                continue;
            }
            let segments = timed_segments(other)?;
            let span = span_of(&segments);
            if self.filter.intersect(primary_span, span).is_none() {
                tracing::trace!(
                    primary = %primary.drone_id(),
                    other = %other.drone_id(),
                    "Mission windows disjoint, skipping"
                );
                stats.missions_skipped += 1;
                continue;
            }
            traffic.push(Traffic {
                drone_id: other.drone_id(),
                span,
                segments,
            });
        }

        let prune_at = safety_threshold_m * (1.0 + PRUNE_TOLERANCE);
        let mut conflicts = Vec::new();

        for (i, segment_a) in primary_segments.iter().enumerate() {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::warn!(
                        primary = %primary.drone_id(),
                        evaluated = i,
                        total = primary_segments.len(),
                        conflicts = conflicts.len(),
                        "Deadline reached, returning partial result"
                    );
                    return Ok(CheckOutcome::Partial(PartialResult {
                        conflicts,
                        segments_evaluated: i,
                        segments_total: primary_segments.len(),
                    }));
                }
            }

            for other in &traffic {
                if self.filter.intersect(segment_a.window(), other.span).is_none() {
                    continue;
                }
                for (j, segment_b) in other.segments.iter().enumerate() {
                    let Some(window) = self.filter.overlap(segment_a, segment_b) else {
                        continue;
                    };
                    stats.pairs_overlapping += 1;

                    if swept_separation(segment_a, segment_b, window) >= prune_at {
                        stats.pairs_pruned += 1;
                        continue;
                    }

                    stats.pairs_evaluated += 1;
                    let approach = self.geometry.minimum_distance(segment_a, segment_b, window);
                    if approach.distance < safety_threshold_m {
                        tracing::trace!(
                            primary = %primary.drone_id(),
                            other = %other.drone_id,
                            primary_segment = i,
                            other_segment = j,
                            distance_m = approach.distance,
                            time_s = approach.time,
                            "Separation violated"
                        );
                        conflicts.push(ConflictRecord::new(
                            primary.drone_id(),
                            other.drone_id,
                            i,
                            j,
                            approach.point_on_a,
                            approach.point_on_b,
                            approach.time,
                            approach.distance,
                            safety_threshold_m,
                        ));
                    }
                }
            }
        }

        tracing::debug!(
            primary = %primary.drone_id(),
            others = others.len(),
            skipped = stats.missions_skipped,
            overlapping = stats.pairs_overlapping,
            pruned = stats.pairs_pruned,
            evaluated = stats.pairs_evaluated,
            conflicts = conflicts.len(),
            threshold_m = safety_threshold_m,
            "Mission check complete"
        );

        Ok(CheckOutcome::Complete(ConflictResult::from_records(conflicts)))
    }
}

/// Flight path segments of a mission, normalizing times when absent.
fn timed_segments(mission: &Mission) -> Result<Vec<TimedSegment>> {
    let timed = if mission.is_timed() {
        Cow::Borrowed(mission)
    } else {
        Cow::Owned(normalize_times(mission)?)
    };
    let fallback = timed.start_time();

    Ok(timed
        .waypoints()
        .windows(2)
        .map(|pair| {
            TimedSegment::new(
                pair[0].position(),
                pair[1].position(),
                pair[0].time.unwrap_or(fallback),
                pair[1].time.unwrap_or(fallback),
            )
        })
        .collect())
}

fn span_of(segments: &[TimedSegment]) -> TimeWindow {
    match (segments.first(), segments.last()) {
        (Some(first), Some(last)) => TimeWindow::new(first.start_time, last.end_time),
        _ => TimeWindow::new(0.0, 0.0),
    }
}
