//! Generated track data
//!
//! Everything the race and the presentation layer need, produced once per
//! seed and never mutated afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Track difficulty: narrower tracks and fewer boost pads at higher levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Track width on straights
    pub fn max_width(&self) -> f32 {
        match self {
            Difficulty::Easy => 170.0,
            Difficulty::Normal => 150.0,
            Difficulty::Hard => 130.0,
        }
    }

    /// Track width on the sharpest turn
    pub fn min_width(&self) -> f32 {
        match self {
            Difficulty::Easy => 115.0,
            Difficulty::Normal => 95.0,
            Difficulty::Hard => 80.0,
        }
    }

    /// Maximum number of boost pads placed
    pub fn boost_pad_budget(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Normal => 5,
            Difficulty::Hard => 4,
        }
    }
}

/// A checkpoint gate spanning the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Position in race order (0 = start/finish line)
    pub index: usize,
    /// Centerline sample the gate sits on
    pub sample_index: usize,
    pub position: Vec2,
    pub left_point: Vec2,
    pub right_point: Vec2,
    /// Unit tangent: the valid crossing direction
    pub direction: Vec2,
}

/// A speed boost pad on a straight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostPad {
    pub sample_index: usize,
    pub position: Vec2,
    /// Facing angle (radians) along the track
    pub angle: f32,
    pub width: f32,
}

/// Axis-aligned bounding box (already padded)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A fully generated closed-loop track.
///
/// All per-sample vectors have length `total_samples`; sample `n - 1`
/// connects back to sample `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    /// The seed string that was requested (not the retry seed)
    pub seed: String,
    pub difficulty: Difficulty,
    /// Which generation attempt produced this track (0 = first try)
    pub attempt: u32,
    /// Control points the spline was built from
    pub control_points: Vec<Vec2>,
    pub center_points: Vec<Vec2>,
    pub widths: Vec<f32>,
    /// Normalized curvature in [0, 1]
    pub curvatures: Vec<f32>,
    pub left_edge: Vec<Vec2>,
    pub right_edge: Vec<Vec2>,
    /// Unit tangents
    pub directions: Vec<Vec2>,
    pub checkpoints: Vec<Checkpoint>,
    pub boost_pads: Vec<BoostPad>,
    pub bounds: Bounds,
    pub total_arc_length: f32,
    pub total_samples: usize,
    pub start_position: Vec2,
    pub start_rotation: f32,
}

impl TrackData {
    /// Index of the sample after `i`, wrapping around the loop
    #[inline]
    pub fn next_index(&self, i: usize) -> usize {
        (i + 1) % self.total_samples
    }

    /// Length of the implicit closing segment (last sample → first)
    pub fn closing_segment_length(&self) -> f32 {
        match (self.center_points.last(), self.center_points.first()) {
            (Some(last), Some(first)) => last.distance(*first),
            _ => 0.0,
        }
    }

    /// True when every per-sample vector has `total_samples` entries
    pub fn is_consistent(&self) -> bool {
        let n = self.total_samples;
        self.center_points.len() == n
            && self.widths.len() == n
            && self.curvatures.len() == n
            && self.left_edge.len() == n
            && self.right_edge.len() == n
            && self.directions.len() == n
    }
}
