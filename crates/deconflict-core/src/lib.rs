//! Strategic deconfliction for UAV missions.
//!
//! Checks a planned mission against other flights sharing the airspace and
//! reports every instant where two drones would come closer than the
//! safety threshold.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod models;
pub mod rules;
pub mod temporal;
pub mod timing;

pub use engine::{CheckOutcome, DeconflictionEngine, PartialResult};
pub use error::{DeconflictionError, Result};
pub use geometry::{
    closest_points_between_segments, ClosedFormGeometry, ClosestApproach, GeometryEvaluator,
    SampledGeometry, SegmentClosestPoints, TimedSegment,
};
pub use models::{ConflictRecord, ConflictResult, Mission, Waypoint};
pub use rules::SafetyRules;
pub use temporal::{overlap, IntervalOverlap, TemporalFilter, TimeWindow};
pub use timing::normalize_times;
