//! Procedural track generation
//!
//! Seed string in, [`TrackData`] out. The whole pipeline draws from a single
//! [`SeededRandom`] in a fixed order, so a seed (plus difficulty) always
//! regenerates the identical track.

use std::f32::consts::TAU;

use glam::Vec2;

use super::data::{Bounds, Difficulty, TrackData};
use super::geometry::{cumulative_arc_lengths, has_self_intersection};
use super::placement::{PlacementInput, place_boost_pads, place_checkpoints};
use super::spline::{
    SAMPLES_PER_SEGMENT, normalized_curvatures, offset_edges, sample_closed_loop, tangents,
    widths_from_curvature,
};
use crate::rng::SeededRandom;

/// Control point count range (inclusive)
pub const MIN_CONTROL_POINTS: i32 = 8;
pub const MAX_CONTROL_POINTS: i32 = 13;

/// Base ellipse radii ranges
pub const RADIUS_X_RANGE: (f32, f32) = (700.0, 1100.0);
pub const RADIUS_Y_RANGE: (f32, f32) = (500.0, 900.0);

/// Per-point perturbation
pub const ANGLE_JITTER: f32 = 0.25;
pub const RADIUS_SCALE_RANGE: (f32, f32) = (0.7, 1.3);

/// Adjacent control points closer than this are pushed apart
pub const MIN_CONTROL_POINT_DISTANCE: f32 = 250.0;
pub const REPAIR_PASSES: usize = 3;

/// Extra space around the track edges in the bounding box
pub const BOUNDS_PADDING: f32 = 200.0;

/// Ship spawns this far behind the start line
pub const START_BACKOFF: f32 = 40.0;

/// Extra attempts after a self-intersecting result
pub const MAX_RETRIES: u32 = 3;

/// Separator between the requested seed and the retry number
pub const RETRY_SUFFIX: &str = "#retry";

/// Generate a track for `seed` at the given difficulty (default Normal)
pub fn generate_track(seed: &str, difficulty: Option<Difficulty>) -> TrackData {
    TrackGenerator::new(difficulty.unwrap_or_default()).generate(seed)
}

/// Track generator for one difficulty level
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackGenerator {
    pub difficulty: Difficulty,
}

impl TrackGenerator {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Generate, retrying with derived seeds while the centerline crosses itself.
    ///
    /// If every retry still self-intersects, the last attempt is returned: it
    /// is playable, just geometrically odd.
    pub fn generate(&self, seed: &str) -> TrackData {
        let mut attempt = 0;
        loop {
            let attempt_seed = retry_seed(seed, attempt);
            let track = self.build(seed, &attempt_seed, attempt);

            if !has_self_intersection(&track.center_points) {
                log::info!(
                    "Track '{}' ({}): {} control points, {} samples, length {:.0}, {} gates, {} boost pads (attempt {})",
                    seed,
                    self.difficulty.as_str(),
                    track.control_points.len(),
                    track.total_samples,
                    track.total_arc_length,
                    track.checkpoints.len(),
                    track.boost_pads.len(),
                    attempt
                );
                return track;
            }

            if attempt >= MAX_RETRIES {
                log::warn!(
                    "Track '{}' still self-intersects after {} retries; using last attempt",
                    seed,
                    MAX_RETRIES
                );
                return track;
            }

            log::debug!("Track '{}' attempt {} self-intersects, retrying", seed, attempt);
            attempt += 1;
        }
    }

    /// Run the full pipeline once from `attempt_seed`
    fn build(&self, seed: &str, attempt_seed: &str, attempt: u32) -> TrackData {
        let mut rng = SeededRandom::from_seed_str(attempt_seed);

        let control_points = control_points(&mut rng);
        let center_points = sample_closed_loop(&control_points, SAMPLES_PER_SEGMENT);
        let directions = tangents(&center_points);
        let curvatures = normalized_curvatures(&center_points);
        let widths = widths_from_curvature(
            &curvatures,
            self.difficulty.max_width(),
            self.difficulty.min_width(),
        );
        let (left_edge, right_edge) = offset_edges(&center_points, &directions, &widths);
        let (arc_lengths, total_arc_length) = cumulative_arc_lengths(&center_points);

        let placement = PlacementInput {
            center: &center_points,
            left: &left_edge,
            right: &right_edge,
            directions: &directions,
            widths: &widths,
            curvatures: &curvatures,
            arc_lengths: &arc_lengths,
            total_arc_length,
        };
        let checkpoints = place_checkpoints(&placement);
        let boost_pads = place_boost_pads(
            &mut rng,
            &placement,
            &checkpoints,
            self.difficulty.boost_pad_budget(),
        );

        let bounds = padded_bounds(&left_edge, &right_edge, BOUNDS_PADDING);
        let (start_position, start_rotation) = match checkpoints.first() {
            Some(start) => (
                start.position - start.direction * START_BACKOFF,
                start.direction.y.atan2(start.direction.x),
            ),
            None => (Vec2::ZERO, 0.0),
        };

        TrackData {
            seed: seed.to_string(),
            difficulty: self.difficulty,
            attempt,
            total_samples: center_points.len(),
            control_points,
            center_points,
            widths,
            curvatures,
            left_edge,
            right_edge,
            directions,
            checkpoints,
            boost_pads,
            bounds,
            total_arc_length,
            start_position,
            start_rotation,
        }
    }
}

/// Seed string used for a given attempt (attempt 0 is the seed itself)
pub fn retry_seed(seed: &str, attempt: u32) -> String {
    if attempt == 0 {
        seed.to_string()
    } else {
        format!("{seed}{RETRY_SUFFIX}{attempt}")
    }
}

/// Jittered points around a random ellipse, repaired and centered on the origin
pub fn control_points(rng: &mut SeededRandom) -> Vec<Vec2> {
    let count = rng.int_range(MIN_CONTROL_POINTS, MAX_CONTROL_POINTS) as usize;
    let radius_x = rng.range(RADIUS_X_RANGE.0, RADIUS_X_RANGE.1);
    let radius_y = rng.range(RADIUS_Y_RANGE.0, RADIUS_Y_RANGE.1);

    let mut points: Vec<Vec2> = (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU + rng.range(-ANGLE_JITTER, ANGLE_JITTER);
            let scale = rng.range(RADIUS_SCALE_RANGE.0, RADIUS_SCALE_RANGE.1);
            Vec2::new(angle.cos() * radius_x, angle.sin() * radius_y) * scale
        })
        .collect();

    spread_adjacent(&mut points, MIN_CONTROL_POINT_DISTANCE, REPAIR_PASSES);
    recenter(&mut points);
    points
}

/// Push apart adjacent (circular) pairs closer than `min_distance`.
///
/// Each offending pair moves symmetrically along the line joining them. Stops
/// early once a pass changes nothing.
fn spread_adjacent(points: &mut [Vec2], min_distance: f32, passes: usize) {
    let n = points.len();
    if n < 2 {
        return;
    }
    for _ in 0..passes {
        let mut moved = false;
        for i in 0..n {
            let j = (i + 1) % n;
            let delta = points[j] - points[i];
            let dist = delta.length();
            if dist >= min_distance {
                continue;
            }
            let dir = if dist > f32::EPSILON {
                delta / dist
            } else {
                // Coincident: separate along the local tangent of the loop
                points[i].normalize_or_zero().perp()
            };
            let push = (min_distance - dist) * 0.5;
            points[i] -= dir * push;
            points[j] += dir * push;
            moved = true;
        }
        if !moved {
            break;
        }
    }
}

/// Translate so the centroid sits at the origin
fn recenter(points: &mut [Vec2]) {
    if points.is_empty() {
        return;
    }
    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    for p in points.iter_mut() {
        *p -= centroid;
    }
}

/// Bounding box of both edges, grown by `padding` on every side
fn padded_bounds(left: &[Vec2], right: &[Vec2], padding: f32) -> Bounds {
    let (min, max) = left.iter().chain(right).fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    );
    if !min.is_finite() || !max.is_finite() {
        return Bounds {
            min: Vec2::splat(-padding),
            max: Vec2::splat(padding),
        };
    }
    Bounds {
        min: min - Vec2::splat(padding),
        max: max + Vec2::splat(padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::placement::MIN_CHECKPOINT_SPACING;

    #[test]
    fn test_generate_deterministic() {
        let a = generate_track("sunset-strip", None);
        let b = generate_track("sunset-strip", None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_track("alpha", None);
        let b = generate_track("beta", None);
        assert_ne!(a.center_points, b.center_points);
    }

    #[test]
    fn test_difficulty_changes_widths_not_shape() {
        let easy = generate_track("shape", Some(Difficulty::Easy));
        let hard = generate_track("shape", Some(Difficulty::Hard));
        if easy.attempt == hard.attempt {
            assert_eq!(easy.center_points, hard.center_points);
        }
        let avg = |t: &TrackData| t.widths.iter().sum::<f32>() / t.widths.len() as f32;
        assert!(avg(&easy) > avg(&hard));
    }

    #[test]
    fn test_parallel_arrays_consistent() {
        let track = generate_track("parallel", None);
        assert!(track.is_consistent());
        let n = track.total_samples;
        assert_eq!(n, track.control_points.len() * SAMPLES_PER_SEGMENT);
        assert!((MIN_CONTROL_POINTS as usize..=MAX_CONTROL_POINTS as usize)
            .contains(&track.control_points.len()));
    }

    #[test]
    fn test_control_points_centered_and_spread() {
        let mut rng = SeededRandom::from_seed_str("controls");
        let pts = control_points(&mut rng);
        let centroid = pts.iter().copied().sum::<Vec2>() / pts.len() as f32;
        assert!(centroid.length() < 1e-2);
    }

    #[test]
    fn test_spread_adjacent_repairs_close_pair() {
        let mut pts = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(500.0, 500.0),
            Vec2::new(0.0, 800.0),
        ];
        spread_adjacent(&mut pts, 250.0, 3);
        assert!(pts[0].distance(pts[1]) >= 249.9);
    }

    #[test]
    fn test_spread_adjacent_coincident_points() {
        let mut pts = vec![Vec2::new(100.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(-400.0, 300.0)];
        spread_adjacent(&mut pts, 250.0, 3);
        assert!(pts.iter().all(|p| p.is_finite()));
        assert!(pts[0].distance(pts[1]) > 100.0);
    }

    #[test]
    fn test_retry_seed_format() {
        assert_eq!(retry_seed("abc", 0), "abc");
        assert_eq!(retry_seed("abc", 2), "abc#retry2");
    }

    #[test]
    fn test_checkpoints_and_start_pose() {
        let track = generate_track("gates", None);
        assert!(track.checkpoints.len() >= 2);
        let start = &track.checkpoints[0];
        assert_eq!(start.index, 0);
        assert_eq!(start.sample_index, 0);

        // Start pose sits behind the line, facing across it
        let to_line = start.position - track.start_position;
        assert!(to_line.dot(start.direction) > 0.0);
        let facing = Vec2::new(track.start_rotation.cos(), track.start_rotation.sin());
        assert!(facing.dot(start.direction) > 0.999);

        for w in track.checkpoints.windows(2) {
            assert!(w[1].sample_index >= w[0].sample_index + MIN_CHECKPOINT_SPACING);
        }
    }

    #[test]
    fn test_bounds_contain_edges() {
        let track = generate_track("bounds", Some(Difficulty::Easy));
        for p in track.left_edge.iter().chain(&track.right_edge) {
            assert!(track.bounds.contains(*p));
        }
        assert!(track.bounds.size().min_element() > 2.0 * BOUNDS_PADDING);
    }

    #[test]
    fn test_returned_track_has_no_self_intersection() {
        for seed in ["a", "b", "c", "daily-2024-06-01", "12345", "🏁", ""] {
            let track = generate_track(seed, None);
            assert!(
                !has_self_intersection(&track.center_points),
                "seed {seed:?} self-intersects after {} attempts",
                track.attempt
            );
        }
    }
}
