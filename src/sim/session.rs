//! Host loop for a single race
//!
//! Owns the track, the ship and the race, and drives them one frame at a time.

use serde::{Deserialize, Serialize};

use super::boundary::BoundaryResult;
use super::race::{RaceEvent, RacePhase, RaceState, race_tick};
use super::ship::{ShipInput, VehicleState, vehicle_tick};
use crate::consts::MAX_FRAME_DT;
use crate::settings::Settings;
use crate::track::{TrackData, TrackGenerator};
use crate::tuning::{TierParams, Tuning};

/// One race on one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSession {
    pub track: TrackData,
    pub vehicle: VehicleState,
    pub race: RaceState,
    /// Boundary verdict from the latest step
    pub boundary: BoundaryResult,
}

impl RaceSession {
    pub fn new(track: TrackData, tier: TierParams, laps: u32) -> Self {
        let vehicle = VehicleState::at_start(&track, tier);
        let boundary = super::boundary::is_on_track(vehicle.pos, &track);
        Self {
            race: RaceState::new(laps),
            vehicle,
            boundary,
            track,
        }
    }

    /// Generate the track for `seed` and set up a race from saved settings
    pub fn from_settings(seed: &str, settings: &Settings, tuning: &Tuning) -> Self {
        let track = TrackGenerator::new(settings.difficulty).generate(seed);
        Self::new(track, tuning.tier(&settings.tier), settings.laps())
    }

    pub fn phase(&self) -> RacePhase {
        self.race.phase
    }

    /// Advance one frame.
    ///
    /// `frame_dt` is clamped to [`MAX_FRAME_DT`] so a stalled host can't
    /// teleport the ship. Input only reaches the ship while racing.
    pub fn step(&mut self, frame_dt: f32, input: &ShipInput) -> Vec<RaceEvent> {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let input = match self.race.phase {
            RacePhase::Racing => *input,
            RacePhase::Countdown | RacePhase::Finished => ShipInput::neutral(),
        };

        self.boundary = vehicle_tick(&mut self.vehicle, dt, &input, &self.track);
        race_tick(&mut self.race, &self.vehicle, &self.track, dt)
    }

    /// Start over on the same track with the same tier and lap count
    pub fn restart(&mut self) {
        log::info!("Restarting race on '{}'", self.track.seed);
        self.vehicle.reset(&self.track);
        self.boundary = super::boundary::is_on_track(self.vehicle.pos, &self.track);
        self.race = RaceState::new(self.race.total_laps);
    }
}
