//! Polyline geometry shared by generation, boundary queries and the race
//!
//! Segment intersection here is the single primitive used both for the
//! self-intersection validation and for checkpoint gate crossings.

use glam::Vec2;

/// Cross products below this are treated as parallel segments
const PARALLEL_EPSILON: f32 = 1e-6;

/// Intersection parameters within this of 0 or 1 are shared endpoints, not crossings
pub const PARAM_EPSILON: f32 = 1e-5;

/// Squared lengths below this are zero-length segments
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Self-intersection check tests every Nth segment
pub const SELF_INTERSECTION_STRIDE: usize = 4;

/// Segments this close (in index, circularly) are neighbours and never tested
pub const SELF_INTERSECTION_ADJACENCY: usize = 3;

/// Intersection parameters `(t, u)` of segment `a1→a2` with `b1→b2`,
/// or `None` if they don't cross strictly inside both segments.
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(f32, f32)> {
    let r = a2 - a1;
    let s = b2 - b1;
    let denom = r.perp_dot(s);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qp = b1 - a1;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;

    let inside = |v: f32| v > PARAM_EPSILON && v < 1.0 - PARAM_EPSILON;
    if inside(t) && inside(u) {
        Some((t, u))
    } else {
        None
    }
}

/// True if segment `a1→a2` properly crosses `b1→b2` (shared endpoints excluded)
#[inline]
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    segment_intersection(a1, a2, b1, b2).is_some()
}

/// Clamped projection of `p` onto segment `a→b`.
///
/// Returns `(t, closest_point)`. Zero-length segments project to `a` with `t = 0`.
#[inline]
pub fn project_onto_segment(p: Vec2, a: Vec2, b: Vec2) -> (f32, Vec2) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return (0.0, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (t, a + ab * t)
}

/// Distance between two indices on a loop of `n` samples
#[inline]
pub fn circular_distance(a: usize, b: usize, n: usize) -> usize {
    let d = a.abs_diff(b) % n.max(1);
    d.min(n - d)
}

/// Cumulative arc length at each point of a closed loop, plus the total
/// length including the closing segment.
pub fn cumulative_arc_lengths(points: &[Vec2]) -> (Vec<f32>, f32) {
    let mut lengths = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            acc += points[i - 1].distance(*p);
        }
        lengths.push(acc);
    }
    let closing = match (points.last(), points.first()) {
        (Some(last), Some(first)) if points.len() > 1 => last.distance(*first),
        _ => 0.0,
    };
    (lengths, acc + closing)
}

/// Strided self-intersection test of a closed polyline.
///
/// Every [`SELF_INTERSECTION_STRIDE`]th segment is tested against every
/// segment more than [`SELF_INTERSECTION_ADJACENCY`] indices away. This is a
/// local sampling check, not a guarantee of global simplicity.
pub fn has_self_intersection(points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }

    (0..n).step_by(SELF_INTERSECTION_STRIDE).any(|i| {
        let a1 = points[i];
        let a2 = points[(i + 1) % n];
        (0..n)
            .filter(|&j| circular_distance(i, j, n) > SELF_INTERSECTION_ADJACENCY)
            .any(|j| segments_intersect(a1, a2, points[j], points[(j + 1) % n]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersection(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        );
        let (t, u) = hit.expect("segments cross at the origin");
        assert!((t - 0.5).abs() < 1e-6);
        assert!((u - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_shared_endpoint_is_not_a_crossing() {
        // Two consecutive polyline segments meeting at (1, 0)
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ));
    }

    #[test]
    fn test_parallel_and_disjoint() {
        assert!(!segments_intersect(
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(10.0, 1.0),
        ));
        assert!(!segments_intersect(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
        ));
    }

    #[test]
    fn test_projection_clamps_and_handles_degenerate() {
        let (t, p) = project_onto_segment(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((t - 0.5).abs() < 1e-6);
        assert_eq!(p, Vec2::new(5.0, 0.0));

        let (t, p) = project_onto_segment(Vec2::new(-5.0, 0.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(t, 0.0);
        assert_eq!(p, Vec2::ZERO);

        let a = Vec2::new(3.0, 4.0);
        let (t, p) = project_onto_segment(Vec2::new(9.0, 9.0), a, a);
        assert_eq!(t, 0.0);
        assert_eq!(p, a);
    }

    #[test]
    fn test_circular_distance() {
        assert_eq!(circular_distance(0, 9, 10), 1);
        assert_eq!(circular_distance(2, 7, 10), 5);
        assert_eq!(circular_distance(4, 4, 10), 0);
    }

    #[test]
    fn test_arc_lengths_of_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let (lengths, total) = cumulative_arc_lengths(&square);
        assert_eq!(lengths, vec![0.0, 10.0, 20.0, 30.0]);
        assert!((total - 40.0).abs() < 1e-5);
    }

    fn circle(n: usize, r: f32) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin()) * r
            })
            .collect()
    }

    #[test]
    fn test_circle_is_simple() {
        assert!(!has_self_intersection(&circle(64, 500.0)));
    }

    #[test]
    fn test_figure_eight_detected() {
        // Lemniscate crosses itself at the origin, inside segments 20 and 60
        let pts: Vec<Vec2> = (0..80)
            .map(|i| {
                let a = i as f32 / 80.0 * std::f32::consts::TAU - 0.03;
                Vec2::new(a.cos(), a.sin() * a.cos()) * 400.0
            })
            .collect();
        assert!(has_self_intersection(&pts));
    }
}
