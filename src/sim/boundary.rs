//! On-track / off-track test
//!
//! Nearest point on the closed centerline polyline, with the track width
//! interpolated along the winning segment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::track::TrackData;
use crate::track::geometry::project_onto_segment;

/// Result of a boundary query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResult {
    pub on_track: bool,
    /// Distance from the query point to the centerline
    pub dist_from_center: f32,
    /// Half of the interpolated track width at the nearest point
    pub half_width: f32,
    /// Start sample of the nearest segment
    pub nearest_index: usize,
}

impl BoundaryResult {
    /// Result for an empty track: nothing is on it
    pub fn off_track() -> Self {
        Self {
            on_track: false,
            dist_from_center: f32::INFINITY,
            half_width: 0.0,
            nearest_index: 0,
        }
    }
}

/// Test a point against a generated track
#[inline]
pub fn is_on_track(point: Vec2, track: &TrackData) -> BoundaryResult {
    nearest_on_loop(point, &track.center_points, &track.widths)
}

/// Test a point against any closed centerline with per-sample widths.
///
/// O(n) over all segments; squared distances are compared during the scan and
/// the single square root is taken at the end.
pub fn nearest_on_loop(point: Vec2, center: &[Vec2], widths: &[f32]) -> BoundaryResult {
    let n = center.len().min(widths.len());
    if n == 0 {
        return BoundaryResult::off_track();
    }

    let mut best_dist_sq = f32::INFINITY;
    let mut best_index = 0;
    let mut best_t = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let (t, closest) = project_onto_segment(point, center[i], center[j]);
        let dist_sq = point.distance_squared(closest);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best_index = i;
            best_t = t;
        }
    }

    let next = (best_index + 1) % n;
    let width = widths[best_index] + (widths[next] - widths[best_index]) * best_t;
    let half_width = width * 0.5;
    let dist_from_center = best_dist_sq.sqrt();

    BoundaryResult {
        on_track: dist_from_center <= half_width,
        dist_from_center,
        half_width,
        nearest_index: best_index,
    }
}
