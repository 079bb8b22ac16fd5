//! Checkpoint gates and boost pads
//!
//! Checkpoints are spaced by arc length, not by sample index: sample density
//! varies along a Catmull-Rom curve, so equal index steps would bunch gates
//! up on short control segments.

use glam::Vec2;
use rand::seq::SliceRandom;

use super::data::{BoostPad, Checkpoint};
use super::geometry::circular_distance;
use crate::rng::SeededRandom;

/// Number of gates per lap, including the start/finish line
pub const CHECKPOINT_COUNT: usize = 8;
/// Gates on samples sharper than this are nudged toward a straighter spot
pub const CHECKPOINT_MAX_CURVATURE: f32 = 0.55;
/// How far (in samples, each direction) the nudge may search
pub const CHECKPOINT_NUDGE_RANGE: usize = 6;
/// Minimum circular sample distance between any two gates
pub const MIN_CHECKPOINT_SPACING: usize = 6;

/// Boost pad site must be at most gently curved
pub const BOOST_MAX_CURVATURE: f32 = 0.3;
/// Samples ahead of a boost pad that must be free of sharp turns
pub const BOOST_LOOKAHEAD: usize = 15;
/// Sharp-turn threshold inside the lookahead window
pub const BOOST_LOOKAHEAD_MAX_CURVATURE: f32 = 0.5;
/// Minimum circular sample distance between boost pads
pub const BOOST_MIN_SPACING: usize = 25;
/// Pads never sit within this many samples of a gate
pub const BOOST_GATE_CLEARANCE: usize = 4;
/// Pad width as a fraction of local track width
pub const BOOST_WIDTH_RATIO: f32 = 0.5;

/// Per-sample data the placement passes read from
pub struct PlacementInput<'a> {
    pub center: &'a [Vec2],
    pub left: &'a [Vec2],
    pub right: &'a [Vec2],
    pub directions: &'a [Vec2],
    pub widths: &'a [f32],
    pub curvatures: &'a [f32],
    pub arc_lengths: &'a [f32],
    pub total_arc_length: f32,
}

impl PlacementInput<'_> {
    fn len(&self) -> usize {
        self.center.len()
    }

    fn checkpoint_at(&self, index: usize, sample_index: usize) -> Checkpoint {
        Checkpoint {
            index,
            sample_index,
            position: self.center[sample_index],
            left_point: self.left[sample_index],
            right_point: self.right[sample_index],
            direction: self.directions[sample_index],
        }
    }
}

/// Place gates at even arc-length intervals; gate 0 is sample 0 (start/finish).
///
/// Returned gates are in strictly increasing sample order and no two are
/// closer than [`MIN_CHECKPOINT_SPACING`] samples around the loop.
pub fn place_checkpoints(input: &PlacementInput) -> Vec<Checkpoint> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }

    let mut placed: Vec<usize> = vec![0];
    for k in 1..CHECKPOINT_COUNT {
        let target = input.total_arc_length * k as f32 / CHECKPOINT_COUNT as f32;
        let raw = nearest_sample_at(input.arc_lengths, target);

        // Keep order and leave room before wrapping back to the start line
        let prev = placed[placed.len() - 1];
        let floor = prev + MIN_CHECKPOINT_SPACING;
        let ceiling = n.saturating_sub(MIN_CHECKPOINT_SPACING);
        if floor > ceiling {
            log::debug!("Dropping checkpoint {k}: no room left on a {n}-sample loop");
            break;
        }

        let mut sample = raw.clamp(floor, ceiling);
        if input.curvatures[sample] > CHECKPOINT_MAX_CURVATURE {
            match nudge_off_turn(input, sample, floor, ceiling, &placed) {
                Some(nudged) => {
                    log::debug!("Checkpoint {k} nudged {sample} -> {nudged} off a sharp turn");
                    sample = nudged;
                }
                None => log::debug!("Checkpoint {k} left on a sharp turn at {sample}"),
            }
        }
        placed.push(sample);
    }

    placed
        .into_iter()
        .enumerate()
        .map(|(index, sample)| input.checkpoint_at(index, sample))
        .collect()
}

/// Sample whose cumulative arc length is closest to `target`
fn nearest_sample_at(arc_lengths: &[f32], target: f32) -> usize {
    let after = arc_lengths.partition_point(|&s| s < target);
    match after {
        0 => 0,
        a if a >= arc_lengths.len() => arc_lengths.len() - 1,
        a if target - arc_lengths[a - 1] <= arc_lengths[a] - target => a - 1,
        a => a,
    }
}

/// Nearest sample (searching outward in both directions) that is gently
/// curved and far enough from every placed gate.
fn nudge_off_turn(
    input: &PlacementInput,
    sample: usize,
    floor: usize,
    ceiling: usize,
    placed: &[usize],
) -> Option<usize> {
    let n = input.len();
    (1..=CHECKPOINT_NUDGE_RANGE)
        .flat_map(|d| [sample.checked_add(d), sample.checked_sub(d)])
        .flatten()
        .filter(|&c| c >= floor && c <= ceiling)
        .find(|&c| {
            input.curvatures[c] <= CHECKPOINT_MAX_CURVATURE
                && placed
                    .iter()
                    .all(|&p| circular_distance(p, c, n) >= MIN_CHECKPOINT_SPACING)
        })
}

/// Place up to `budget` boost pads on straights.
///
/// Candidates are gently curved samples with no sharp turn inside the
/// lookahead window; they are shuffled with the track RNG and accepted
/// greedily while keeping [`BOOST_MIN_SPACING`].
pub fn place_boost_pads(
    rng: &mut SeededRandom,
    input: &PlacementInput,
    checkpoints: &[Checkpoint],
    budget: usize,
) -> Vec<BoostPad> {
    let n = input.len();
    let mut candidates: Vec<usize> = (0..n)
        .filter(|&i| input.curvatures[i] < BOOST_MAX_CURVATURE)
        .filter(|&i| {
            (1..=BOOST_LOOKAHEAD)
                .all(|k| input.curvatures[(i + k) % n] < BOOST_LOOKAHEAD_MAX_CURVATURE)
        })
        .filter(|&i| {
            checkpoints
                .iter()
                .all(|cp| circular_distance(cp.sample_index, i, n) > BOOST_GATE_CLEARANCE)
        })
        .collect();

    candidates.shuffle(rng);

    let mut accepted: Vec<usize> = Vec::with_capacity(budget);
    for c in candidates {
        if accepted.len() >= budget {
            break;
        }
        if accepted
            .iter()
            .all(|&a| circular_distance(a, c, n) >= BOOST_MIN_SPACING)
        {
            accepted.push(c);
        }
    }
    accepted.sort_unstable();

    accepted
        .into_iter()
        .map(|i| {
            let dir = input.directions[i];
            BoostPad {
                sample_index: i,
                position: input.center[i],
                angle: dir.y.atan2(dir.x),
                width: input.widths[i] * BOOST_WIDTH_RATIO,
            }
        })
        .collect()
}
