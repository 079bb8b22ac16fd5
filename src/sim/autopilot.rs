//! Demo driver
//!
//! Pure pursuit toward a point further along the centerline. Good enough to
//! lap a generated track; not meant to be fast.

use super::boundary::is_on_track;
use super::ship::{ShipInput, VehicleState};
use crate::normalize_angle;
use crate::track::TrackData;

/// Samples ahead of the nearest one at a standstill
const BASE_LOOKAHEAD: usize = 3;
/// Extra lookahead sample per this much speed
const LOOKAHEAD_SPEED_STEP: f32 = 120.0;
const STEER_GAIN: f32 = 2.5;
/// Counter-steer against spin, angular-momentum tiers only
const SPIN_DAMPING: f32 = 0.6;
/// Heading error beyond which the throttle is released
const THROTTLE_CUTOFF: f32 = 0.6;
/// Heading error and speed beyond which the brake is applied
const BRAKE_ANGLE: f32 = 1.1;
const BRAKE_SPEED: f32 = 180.0;
/// Normalized curvature that counts as a sharp turn ahead
const SHARP_TURN: f32 = 0.7;
/// Samples scanned for sharp turns, beyond the steering lookahead
const TURN_SCAN: usize = 12;
/// Speed held into a sharp turn; brake above `CORNER_SPEED * CORNER_BRAKE_RATIO`
const CORNER_SPEED: f32 = 220.0;
const CORNER_BRAKE_RATIO: f32 = 1.3;

/// Input that steers the ship along the track
pub fn autopilot(ship: &VehicleState, track: &TrackData) -> ShipInput {
    let n = track.center_points.len();
    if n == 0 {
        return ShipInput::neutral();
    }

    let nearest = is_on_track(ship.pos, track).nearest_index;
    let lookahead = BASE_LOOKAHEAD + (ship.speed / LOOKAHEAD_SPEED_STEP) as usize;
    let target = track.center_points[(nearest + lookahead) % n];

    let to_target = target - ship.pos;
    if to_target.length_squared() < f32::EPSILON {
        return ShipInput::neutral();
    }
    let error = normalize_angle(to_target.y.atan2(to_target.x) - ship.rotation);

    // Direct steering sets the turn rate from this tick's input, so damping
    // against it would just echo the previous input back
    let damping = match ship.tier.angular {
        Some(_) => ship.angular_velocity * SPIN_DAMPING,
        None => 0.0,
    };

    let sharp_ahead = (0..lookahead + TURN_SCAN)
        .filter_map(|k| track.curvatures.get((nearest + k) % n))
        .any(|&c| c > SHARP_TURN);
    let too_fast = sharp_ahead && ship.speed > CORNER_SPEED;

    ShipInput {
        turn: (error * STEER_GAIN - damping).clamp(-1.0, 1.0),
        thrust: error.abs() < THROTTLE_CUTOFF && !too_fast,
        brake: (error.abs() > BRAKE_ANGLE && ship.speed > BRAKE_SPEED)
            || (sharp_ahead && ship.speed > CORNER_SPEED * CORNER_BRAKE_RATIO),
    }
}
