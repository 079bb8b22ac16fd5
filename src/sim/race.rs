//! Race lifecycle: countdown, racing, finished
//!
//! Checkpoints must be crossed in order, forwards. Progress is judged from
//! the ship's movement segment over the last tick, so the race never needs to
//! know how the ship moved, only where it was and where it is.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ship::VehicleState;
use crate::track::geometry::segment_intersection;
use crate::track::{Checkpoint, TrackData};

/// Countdown beats before the start ("3", "2", "1")
pub const COUNTDOWN_BEATS: u32 = 3;
/// Seconds per countdown beat
pub const BEAT_DURATION: f32 = 1.0;

/// Current phase of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Ship visible and simulated, input held neutral
    Countdown,
    /// Timers running, checkpoints evaluated
    Racing,
    /// Terminal; the ship coasts on residual momentum
    Finished,
}

/// Final standings of a completed race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub total_time: f32,
    pub lap_times: Vec<f32>,
    /// Fastest lap, only flagged when there is more than one lap to compare
    pub best_lap_index: Option<usize>,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    CountdownBeat { remaining: u32 },
    RaceStarted,
    CheckpointCrossed { index: usize },
    WrongWay { index: usize },
    /// A gate behind the expected one was crossed forwards, i.e. the ship
    /// looped round past a gate it never passed
    MissedCheckpoint { index: usize, expected: usize },
    LapComplete { lap: u32, time: f32, new_best: bool },
    RaceFinished(RaceResult),
}

/// State of one race attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    pub phase: RacePhase,
    /// Seconds spent in the countdown so far
    pub countdown_elapsed: f32,
    /// Beats already announced
    pub beats_announced: u32,
    /// Gate expected next (0 = start/finish line)
    pub next_checkpoint: usize,
    /// Completed laps
    pub current_lap: u32,
    pub total_laps: u32,
    /// Seconds since the start signal (frozen once finished)
    pub race_time: f32,
    /// Race time at which the current lap began
    pub lap_start_time: f32,
    pub lap_times: Vec<f32>,
    pub best_lap_time: Option<f32>,
    pub best_lap_index: Option<usize>,
    /// Every intermediate gate of this lap has been crossed
    pub all_checkpoints_passed: bool,
    pub final_time: Option<f32>,
}

impl RaceState {
    pub fn new(total_laps: u32) -> Self {
        Self {
            phase: RacePhase::Countdown,
            countdown_elapsed: 0.0,
            beats_announced: 0,
            next_checkpoint: 0,
            current_lap: 0,
            total_laps: total_laps.max(1),
            race_time: 0.0,
            lap_start_time: 0.0,
            lap_times: Vec::new(),
            best_lap_time: None,
            best_lap_index: None,
            all_checkpoints_passed: false,
            final_time: None,
        }
    }

    /// Skip the countdown (for replays and tests)
    pub fn racing(total_laps: u32) -> Self {
        Self {
            phase: RacePhase::Racing,
            beats_announced: COUNTDOWN_BEATS,
            countdown_elapsed: COUNTDOWN_BEATS as f32 * BEAT_DURATION,
            ..Self::new(total_laps)
        }
    }

    /// Time on the lap in progress
    pub fn current_lap_time(&self) -> f32 {
        self.race_time - self.lap_start_time
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RacePhase::Finished
    }

    /// Summary of the race so far (final once finished)
    pub fn result(&self) -> RaceResult {
        RaceResult {
            total_time: self.final_time.unwrap_or(self.race_time),
            lap_times: self.lap_times.clone(),
            best_lap_index: if self.lap_times.len() > 1 {
                self.best_lap_index
            } else {
                None
            },
        }
    }

    fn advance_countdown(&mut self, dt: f32, events: &mut Vec<RaceEvent>) {
        self.announce_due_beats(events);
        self.countdown_elapsed += dt;
        self.announce_due_beats(events);

        if self.countdown_elapsed >= COUNTDOWN_BEATS as f32 * BEAT_DURATION {
            self.phase = RacePhase::Racing;
            log::info!("Race started ({} laps)", self.total_laps);
            events.push(RaceEvent::RaceStarted);
        }
    }

    fn announce_due_beats(&mut self, events: &mut Vec<RaceEvent>) {
        while self.beats_announced < COUNTDOWN_BEATS
            && self.beats_announced as f32 * BEAT_DURATION <= self.countdown_elapsed
        {
            events.push(RaceEvent::CountdownBeat {
                remaining: COUNTDOWN_BEATS - self.beats_announced,
            });
            self.beats_announced += 1;
        }
    }

    /// Apply one gate crossing along `movement`
    fn cross(&mut self, gate: &Checkpoint, gate_count: usize, movement: Vec2, events: &mut Vec<RaceEvent>) {
        if movement.dot(gate.direction) <= 0.0 {
            events.push(RaceEvent::WrongWay { index: gate.index });
            return;
        }

        let expected = self.next_checkpoint;
        if gate.index == expected {
            if gate.index == 0 && self.all_checkpoints_passed {
                self.complete_lap(gate_count, events);
                return;
            }
            if gate.index == 0 && self.lap_times.is_empty() && self.current_lap == 0 {
                // First pass over the line: lap timing starts here
                self.lap_start_time = self.race_time;
            }
            self.next_checkpoint = gate.index + 1;
            if self.next_checkpoint >= gate_count {
                self.next_checkpoint = 0;
                self.all_checkpoints_passed = true;
            }
            events.push(RaceEvent::CheckpointCrossed { index: gate.index });
        } else if gate.index < expected && gate.index != 0 {
            events.push(RaceEvent::MissedCheckpoint {
                index: gate.index,
                expected,
            });
        }
        // Ahead of expectation, or the line before the lap is done: ignored
    }

    fn complete_lap(&mut self, gate_count: usize, events: &mut Vec<RaceEvent>) {
        let lap_time = self.current_lap_time();

        // Compared before the lap joins the history, so the first lap is never a "new best"
        let new_best = !self.lap_times.is_empty()
            && self.best_lap_time.is_some_and(|best| lap_time <= best);
        if self.best_lap_time.is_none_or(|best| lap_time <= best) {
            self.best_lap_time = Some(lap_time);
            self.best_lap_index = Some(self.lap_times.len());
        }
        self.lap_times.push(lap_time);

        self.current_lap += 1;
        self.lap_start_time = self.race_time;
        // With a lone start gate, the next lap is already "all passed"
        self.all_checkpoints_passed = gate_count <= 1;
        self.next_checkpoint = if gate_count > 1 { 1 } else { 0 };

        log::info!(
            "Lap {}/{} complete in {:.3}s{}",
            self.current_lap,
            self.total_laps,
            lap_time,
            if new_best { " (best)" } else { "" }
        );
        events.push(RaceEvent::LapComplete {
            lap: self.current_lap,
            time: lap_time,
            new_best,
        });

        if self.current_lap >= self.total_laps {
            self.phase = RacePhase::Finished;
            self.final_time = Some(self.race_time);
            let result = self.result();
            log::info!("Race finished in {:.3}s", result.total_time);
            events.push(RaceEvent::RaceFinished(result));
        }
    }
}

/// Advance the race by `dt` given the ship's latest movement.
///
/// Returns the events produced this tick, in order.
pub fn race_tick(
    state: &mut RaceState,
    vehicle: &VehicleState,
    track: &TrackData,
    dt: f32,
) -> Vec<RaceEvent> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    match state.phase {
        RacePhase::Countdown => state.advance_countdown(dt, &mut events),
        RacePhase::Racing => {
            state.race_time += dt;

            let from = vehicle.prev_pos;
            let to = vehicle.pos;
            let movement = to - from;

            // Gates in the order the ship met them along this tick's movement
            let mut hits: Vec<(f32, &Checkpoint)> = track
                .checkpoints
                .iter()
                .filter_map(|gate| {
                    segment_intersection(from, to, gate.left_point, gate.right_point)
                        .map(|(t, _)| (t, gate))
                })
                .collect();
            hits.sort_by(|a, b| a.0.total_cmp(&b.0));

            for (_, gate) in hits {
                if state.phase != RacePhase::Racing {
                    break;
                }
                state.cross(gate, track.checkpoints.len(), movement, &mut events);
            }
        }
        RacePhase::Finished => {}
    }

    events
}
