//! Ship physics
//!
//! One call per tick: rotation, thrust, braking, drag, Euler integration, then
//! a boundary re-test whose verdict picks the drag coefficient next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boundary::{BoundaryResult, is_on_track};
use crate::normalize_angle;
use crate::track::TrackData;
use crate::tuning::TierParams;

/// Speeds below this snap to a dead stop
pub const SNAP_SPEED: f32 = 2.0;

/// Drag coefficients are specified per frame at this rate
pub const DRAG_REFERENCE_HZ: f32 = 60.0;

/// Angular velocities below this stop decaying and snap to zero
const ANGULAR_REST: f32 = 1e-3;

/// Player intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipInput {
    /// Steering in [-1, 1]; positive turns counter-clockwise
    pub turn: f32,
    pub thrust: bool,
    pub brake: bool,
}

impl ShipInput {
    /// No steering, no thrust, no brake
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Steering clamped to [-1, 1]; non-finite steering becomes 0
    pub fn clamped(&self) -> Self {
        let turn = if self.turn.is_finite() {
            self.turn.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self { turn, ..*self }
    }
}

/// The single player ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub pos: Vec2,
    /// Position before the last tick (the race tests this movement segment)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians, normalized to [-π, π))
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Cached `vel.length()` after the last tick
    pub speed: f32,
    /// Boundary verdict from the last tick; selects drag on the next one
    pub on_track: bool,
    pub tier: TierParams,
}

impl VehicleState {
    pub fn new(pos: Vec2, rotation: f32, tier: TierParams) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            rotation: normalize_angle(rotation),
            angular_velocity: 0.0,
            speed: 0.0,
            on_track: true,
            tier,
        }
    }

    /// Ship parked at the track's start pose
    pub fn at_start(track: &TrackData, tier: TierParams) -> Self {
        let mut ship = Self::new(track.start_position, track.start_rotation, tier);
        ship.on_track = is_on_track(ship.pos, track).on_track;
        ship
    }

    /// Unit vector the nose points along
    #[inline]
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Switch speed class. Spin is cleared since the steering model may change.
    pub fn set_tier(&mut self, tier: TierParams) {
        self.tier = tier;
        self.angular_velocity = 0.0;
    }

    /// Put the ship back on the start pose, keeping its tier
    pub fn reset(&mut self, track: &TrackData) {
        *self = Self::at_start(track, self.tier.clone());
    }
}

/// Per-tick decay factor for a per-60Hz-frame coefficient.
///
/// `(1 - c)^(dt * 60)`: the same wall-clock time loses the same fraction of
/// velocity at any tick rate.
#[inline]
pub fn frame_rate_independent_decay(per_frame_loss: f32, dt: f32) -> f32 {
    (1.0 - per_frame_loss).clamp(0.0, 1.0).powf(dt * DRAG_REFERENCE_HZ)
}

/// Advance the ship by `dt` seconds.
///
/// Returns the boundary result for the new position (also cached in
/// `state.on_track`).
pub fn vehicle_tick(
    state: &mut VehicleState,
    dt: f32,
    input: &ShipInput,
    track: &TrackData,
) -> BoundaryResult {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let input = input.clamped();
    let tier = &state.tier;

    // Rotation
    match tier.angular {
        None => {
            state.angular_velocity = input.turn * tier.rotation_speed;
        }
        Some(angular) => {
            if input.turn != 0.0 {
                state.angular_velocity = (state.angular_velocity
                    + input.turn * angular.acceleration * dt)
                    .clamp(-angular.max_angular_velocity, angular.max_angular_velocity);
            } else {
                state.angular_velocity *= angular.decay.clamp(0.0, 1.0).powf(dt * DRAG_REFERENCE_HZ);
                if state.angular_velocity.abs() < ANGULAR_REST {
                    state.angular_velocity = 0.0;
                }
            }
        }
    }
    state.rotation = normalize_angle(state.rotation + state.angular_velocity * dt);

    // Thrust, softly capped so max_speed is approached but never hit
    if input.thrust && tier.max_speed > 0.0 {
        let ratio = state.vel.length() / tier.max_speed;
        let soft_cap = (1.0 - ratio * ratio).max(0.0);
        state.vel += Vec2::from_angle(state.rotation) * tier.thrust * soft_cap * dt;
    }

    // Retro-thrust against the velocity, never past a standstill
    if input.brake {
        let speed = state.vel.length();
        if speed > 0.0 {
            let dv = (tier.thrust * tier.brake_ratio * dt).min(speed);
            state.vel -= state.vel / speed * dv;
        }
    }

    // Drag picked by the previous tick's verdict
    let drag = if state.on_track {
        tier.drag_on_track
    } else {
        tier.drag_off_track
    };
    state.vel *= frame_rate_independent_decay(drag, dt);

    state.prev_pos = state.pos;
    state.pos += state.vel * dt;

    let boundary = is_on_track(state.pos, track);
    state.on_track = boundary.on_track;

    state.speed = state.vel.length();
    if state.speed < SNAP_SPEED {
        state.vel = Vec2::ZERO;
        state.speed = 0.0;
    }

    boundary
}
