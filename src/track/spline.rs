//! Centerline sampling and per-sample analysis
//!
//! Closed-loop uniform Catmull-Rom interpolation, then tangents, normalized
//! curvature, curvature-driven widths and offset edges.

use glam::Vec2;

/// Samples emitted per control-point segment
pub const SAMPLES_PER_SEGMENT: usize = 20;

/// Curvature at which narrowing starts / reaches the minimum width
pub const WIDTH_CURVATURE_LOW: f32 = 0.15;
pub const WIDTH_CURVATURE_HIGH: f32 = 0.85;

/// Half-window of the circular moving average over widths
pub const WIDTH_SMOOTHING_RADIUS: usize = 4;

/// Length products below this mean a degenerate corner (zero curvature)
const CURVATURE_EPSILON: f32 = 1e-9;

/// Evaluate a uniform Catmull-Rom segment between `p1` and `p2` at `t` in [0, 1]
#[inline]
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Sample a closed Catmull-Rom loop through `control` points.
///
/// Produces `control.len() * samples_per_segment` points; the first sample of
/// each segment is exactly its control point, and the loop closes implicitly.
pub fn sample_closed_loop(control: &[Vec2], samples_per_segment: usize) -> Vec<Vec2> {
    let n = control.len();
    if n < 2 || samples_per_segment == 0 {
        return control.to_vec();
    }

    let mut points = Vec::with_capacity(n * samples_per_segment);
    for i in 0..n {
        let p0 = control[(i + n - 1) % n];
        let p1 = control[i];
        let p2 = control[(i + 1) % n];
        let p3 = control[(i + 2) % n];
        for s in 0..samples_per_segment {
            let t = s as f32 / samples_per_segment as f32;
            points.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    points
}

/// Unit tangents by central difference around the loop
pub fn tangents(points: &[Vec2]) -> Vec<Vec2> {
    let n = points.len();
    let mut dirs: Vec<Vec2> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let next = points[(i + 1) % n];
        let dir = (next - prev).normalize_or_zero();
        let dir = if dir == Vec2::ZERO {
            // Repeated points: carry the previous heading forward
            dirs.last().copied().unwrap_or(Vec2::X)
        } else {
            dir
        };
        dirs.push(dir);
    }
    dirs
}

/// Curvature at each sample, normalized so the sharpest sample is 1.0.
///
/// Raw curvature is `|a × b| / (|a| |b|)` for the incoming and outgoing
/// segment vectors; a perfectly straight loop yields all zeros.
pub fn normalized_curvatures(points: &[Vec2]) -> Vec<f32> {
    let n = points.len();
    let raw: Vec<f32> = (0..n)
        .map(|i| {
            let a = points[i] - points[(i + n - 1) % n];
            let b = points[(i + 1) % n] - points[i];
            let len_product = a.length() * b.length();
            if len_product > CURVATURE_EPSILON {
                a.perp_dot(b).abs() / len_product
            } else {
                0.0
            }
        })
        .collect();

    let max = raw.iter().copied().fold(0.0f32, f32::max);
    if max <= CURVATURE_EPSILON {
        return vec![0.0; n];
    }
    raw.into_iter().map(|c| (c / max).clamp(0.0, 1.0)).collect()
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Map curvature to width (sharper = narrower), then smooth circularly
pub fn widths_from_curvature(curvatures: &[f32], max_width: f32, min_width: f32) -> Vec<f32> {
    let raw: Vec<f32> = curvatures
        .iter()
        .map(|&c| {
            max_width - (max_width - min_width) * smoothstep(WIDTH_CURVATURE_LOW, WIDTH_CURVATURE_HIGH, c)
        })
        .collect();
    circular_moving_average(&raw, WIDTH_SMOOTHING_RADIUS)
}

/// Moving average over `[i - radius, i + radius]`, wrapping around the loop
pub fn circular_moving_average(values: &[f32], radius: usize) -> Vec<f32> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let window = 2 * radius + 1;
    (0..n)
        .map(|i| {
            let sum: f32 = (0..window)
                .map(|k| values[(i + n * window - radius + k) % n])
                .sum();
            sum / window as f32
        })
        .collect()
}

/// Offset each sample along its left normal by `+width/2` and `-width/2`.
///
/// Returns `(left_edge, right_edge)`; "left" is the side to the left of travel.
pub fn offset_edges(points: &[Vec2], directions: &[Vec2], widths: &[f32]) -> (Vec<Vec2>, Vec<Vec2>) {
    points
        .iter()
        .zip(directions)
        .zip(widths)
        .map(|((&p, &dir), &w)| {
            let normal = dir.perp();
            (p + normal * (w * 0.5), p - normal * (w * 0.5))
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(-100.0, -100.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(-100.0, 100.0),
        ]
    }

    #[test]
    fn test_catmull_rom_passes_through_controls() {
        let [p0, p1, p2, p3] = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(4.0, 0.0),
        ];
        assert!(catmull_rom(p0, p1, p2, p3, 0.0).distance(p1) < 1e-6);
        assert!(catmull_rom(p0, p1, p2, p3, 1.0).distance(p2) < 1e-5);
    }

    #[test]
    fn test_sample_count_and_control_hits() {
        let ctrl = square();
        let pts = sample_closed_loop(&ctrl, SAMPLES_PER_SEGMENT);
        assert_eq!(pts.len(), ctrl.len() * SAMPLES_PER_SEGMENT);
        for (i, c) in ctrl.iter().enumerate() {
            assert!(pts[i * SAMPLES_PER_SEGMENT].distance(*c) < 1e-4);
        }
    }

    #[test]
    fn test_tangents_are_unit() {
        let pts = sample_closed_loop(&square(), 10);
        for d in tangents(&pts) {
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tangents_degenerate_fallback() {
        let pts = vec![Vec2::ZERO; 5];
        assert!(tangents(&pts).iter().all(|d| *d == Vec2::X));
    }

    #[test]
    fn test_curvature_normalized() {
        let pts = sample_closed_loop(&square(), 10);
        let curv = normalized_curvatures(&pts);
        assert!(curv.iter().all(|c| (0.0..=1.0).contains(c)));
        assert!(curv.iter().any(|&c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_circle_curvature_uniform() {
        let pts: Vec<Vec2> = (0..90)
            .map(|i| {
                let a = i as f32 / 90.0 * TAU;
                Vec2::new(a.cos(), a.sin()) * 300.0
            })
            .collect();
        let curv = normalized_curvatures(&pts);
        assert!(curv.iter().all(|&c| c > 0.99));
    }

    #[test]
    fn test_zero_length_segments_have_zero_curvature() {
        let pts = vec![Vec2::ZERO, Vec2::ZERO, Vec2::ZERO];
        assert_eq!(normalized_curvatures(&pts), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_widths_narrow_on_curves() {
        let curv = vec![0.0; 20]
            .into_iter()
            .chain(vec![1.0; 20])
            .collect::<Vec<f32>>();
        let widths = widths_from_curvature(&curv, 150.0, 90.0);
        assert!((widths[10] - 150.0).abs() < 1e-3);
        assert!((widths[30] - 90.0).abs() < 1e-3);
        assert!(widths.iter().all(|&w| (90.0..=150.0).contains(&w)));
    }

    #[test]
    fn test_moving_average_wraps() {
        let vals = vec![9.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let avg = circular_moving_average(&vals, 1);
        assert!((avg[0] - 3.0).abs() < 1e-6);
        assert!((avg[5] - 3.0).abs() < 1e-6);
        assert!((avg[1] - 3.0).abs() < 1e-6);
        assert_eq!(avg[3], 0.0);
    }

    #[test]
    fn test_edges_offset_by_half_width() {
        let pts = vec![Vec2::new(0.0, 0.0)];
        let dirs = vec![Vec2::X];
        let (left, right) = offset_edges(&pts, &dirs, &[100.0]);
        assert_eq!(left[0], Vec2::new(0.0, 50.0));
        assert_eq!(right[0], Vec2::new(0.0, -50.0));
    }
}
