//! Detection parameters.
//!
//! Tolerances are tuned per export format and never adjusted at runtime.
//! Too tight and real crossings are missed, rows and columns vanish; too
//! loose and distinct grid lines merge.

use serde::{Deserialize, Serialize};

use crate::table::HeaderNudge;

pub const DEFAULT_INTERSECTION_TOLERANCE: f64 = 1.0;
pub const DEFAULT_DEDUP_TOLERANCE: f64 = 1.5;
pub const DEFAULT_ALIGNMENT_TOLERANCE: f64 = 1.5;
pub const DEFAULT_AREA_TOLERANCE: f64 = 0.5;

/// Parameters for the grid detection pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    /// Maximum gap between two segments for them to count as crossing.
    pub intersection_tolerance: f64,
    /// Maximum distance between intersections that are merged.
    pub dedup_tolerance: f64,
    /// Maximum per-axis distance between coordinates snapped to one grid line.
    pub alignment_tolerance: f64,
    /// Per-axis slack when looking for an intersection's row/column neighbours.
    pub area_tolerance: f64,
    /// Maximum control-point deviation for a curve to count as a straight path.
    pub curve_linear_tolerance: f64,
    /// Left-edge correction for header cells, if the export format needs one.
    pub header_nudge: Option<HeaderNudge>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            intersection_tolerance: DEFAULT_INTERSECTION_TOLERANCE,
            dedup_tolerance: DEFAULT_DEDUP_TOLERANCE,
            alignment_tolerance: DEFAULT_ALIGNMENT_TOLERANCE,
            area_tolerance: DEFAULT_AREA_TOLERANCE,
            curve_linear_tolerance: crate::table::DEFAULT_CURVE_LINEAR_TOLERANCE,
            header_nudge: None,
        }
    }
}

impl DetectionParams {
    /// Parse parameters from JSON; missing fields keep their defaults.
    pub fn from_json(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
