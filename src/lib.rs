//! Seed Racer - seeded top-down racing simulation core
//!
//! Core modules:
//! - `rng`: Deterministic string-seeded random numbers
//! - `track`: Procedural track generation (spline, widths, gates, boost pads)
//! - `sim`: Boundary test, ship physics, race state machine, session loop
//! - `tuning`: Data-driven ship tiers
//! - `settings` / `records`: Host-persisted preferences and lap records
//!
//! The same seed (and difficulty) always produces the same track, so a track
//! can be shared as a short code.

pub mod records;
pub mod rng;
pub mod settings;
pub mod sim;
pub mod track;
pub mod tuning;

pub use records::{LapRecords, RecordUpdate};
pub use rng::{SeededRandom, random_seed};
pub use settings::Settings;
pub use sim::{RaceEvent, RacePhase, RaceResult, RaceSession, ShipInput, VehicleState};
pub use track::{Difficulty, TrackData, TrackGenerator, generate_track};
pub use tuning::{TierParams, Tuning};

/// Simulation constants
pub mod consts {
    /// Nominal host frame step (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame a session will integrate in one step
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
