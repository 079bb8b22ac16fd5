//! Generation properties over arbitrary seeds

use proptest::prelude::*;

use seed_racer::track::generator::MAX_RETRIES;
use seed_racer::track::geometry::circular_distance;
use seed_racer::track::placement::{BOOST_GATE_CLEARANCE, BOOST_MIN_SPACING, MIN_CHECKPOINT_SPACING};
use seed_racer::track::{Difficulty, TrackData, TrackGenerator, has_self_intersection};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
    ]
}

fn generate(seed: &str, difficulty: Difficulty) -> TrackData {
    TrackGenerator::new(difficulty).generate(seed)
}

proptest! {
    // Each case generates a full track, keep the count modest
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generation_is_deterministic(seed in "[a-zA-Z0-9#-]{1,16}", difficulty in difficulty()) {
        let a = generate(&seed, difficulty);
        let b = generate(&seed, difficulty);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn closed_loop_arrays_line_up(seed in "[a-z0-9]{1,12}", difficulty in difficulty()) {
        let track = generate(&seed, difficulty);
        prop_assert!(track.is_consistent());
        prop_assert!(track.total_samples > 0);

        let n = track.total_samples;
        let max_step = (0..n - 1)
            .map(|i| track.center_points[i].distance(track.center_points[i + 1]))
            .fold(0.0_f32, f32::max);
        let closing = track.closing_segment_length();
        prop_assert!(closing > 1e-3, "degenerate closing segment");
        prop_assert!(closing <= 2.0 * max_step, "closing {} vs max step {}", closing, max_step);

        for &c in &track.curvatures {
            prop_assert!((0.0..=1.0).contains(&c));
        }
        for &w in &track.widths {
            prop_assert!(w >= difficulty.min_width() - 1e-3 && w <= difficulty.max_width() + 1e-3);
        }
        for d in &track.directions {
            prop_assert!((d.length() - 1.0).abs() < 1e-3);
        }
        for p in track.left_edge.iter().chain(&track.right_edge) {
            prop_assert!(track.bounds.contains(*p));
        }
    }

    #[test]
    fn returned_track_does_not_cross_itself(seed in "[a-z0-9]{1,12}") {
        let track = generate(&seed, Difficulty::Normal);
        prop_assert!(track.attempt <= MAX_RETRIES);
        if track.attempt < MAX_RETRIES {
            prop_assert!(!has_self_intersection(&track.center_points));
        }
    }

    #[test]
    fn checkpoints_are_ordered_and_spaced(seed in "[a-z0-9]{1,12}", difficulty in difficulty()) {
        let track = generate(&seed, difficulty);
        let n = track.total_samples;
        prop_assert!(!track.checkpoints.is_empty());
        prop_assert_eq!(track.checkpoints[0].sample_index, 0);

        for (i, cp) in track.checkpoints.iter().enumerate() {
            prop_assert_eq!(cp.index, i);
        }
        for pair in track.checkpoints.windows(2) {
            prop_assert!(pair[1].sample_index >= pair[0].sample_index + MIN_CHECKPOINT_SPACING);
        }
        if let Some(last) = track.checkpoints.last() {
            prop_assert!(n - last.sample_index >= MIN_CHECKPOINT_SPACING || track.checkpoints.len() == 1);
        }

        let start = &track.checkpoints[0];
        prop_assert!((track.start_position.distance(start.position) - 40.0).abs() < 1e-2);
    }

    #[test]
    fn boost_pads_respect_budget_and_spacing(seed in "[a-z0-9]{1,12}", difficulty in difficulty()) {
        let track = generate(&seed, difficulty);
        let n = track.total_samples;
        prop_assert!(track.boost_pads.len() <= difficulty.boost_pad_budget());

        for pair in track.boost_pads.windows(2) {
            prop_assert!(pair[0].sample_index < pair[1].sample_index);
        }
        for (i, a) in track.boost_pads.iter().enumerate() {
            for b in &track.boost_pads[i + 1..] {
                prop_assert!(circular_distance(a.sample_index, b.sample_index, n) >= BOOST_MIN_SPACING);
            }
            for cp in &track.checkpoints {
                prop_assert!(circular_distance(a.sample_index, cp.sample_index, n) > BOOST_GATE_CLEARANCE);
            }
        }
    }
}
