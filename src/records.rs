//! Per-track lap records
//!
//! A seed regenerates the same track, so records are keyed by seed,
//! difficulty and lap count. Persisted by the host as JSON.

use serde::{Deserialize, Serialize};

use crate::sim::RaceResult;
use crate::track::Difficulty;

/// Best times on one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub seed: String,
    pub difficulty: Difficulty,
    pub laps: u32,
    /// Best total race time
    pub best_race: f32,
    /// Best single lap
    pub best_lap: f32,
    /// Races finished on this track
    pub races: u32,
}

/// What a finished race changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub new_best_race: bool,
    pub new_best_lap: bool,
}

impl RecordUpdate {
    pub fn any(&self) -> bool {
        self.new_best_race || self.new_best_lap
    }
}

/// All track records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapRecords {
    pub tracks: Vec<TrackRecord>,
}

impl LapRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Record for a track, if it has ever been finished
    pub fn get(&self, seed: &str, difficulty: Difficulty, laps: u32) -> Option<&TrackRecord> {
        self.tracks
            .iter()
            .find(|r| r.seed == seed && r.difficulty == difficulty && r.laps == laps)
    }

    /// Fold a finished race into the records.
    ///
    /// The first finish on a track sets both bests. Ties are not new records.
    pub fn submit(&mut self, seed: &str, difficulty: Difficulty, result: &RaceResult) -> RecordUpdate {
        let Some(lap) = result
            .lap_times
            .iter()
            .copied()
            .min_by(|a, b| a.total_cmp(b))
        else {
            return RecordUpdate::default();
        };
        let laps = result.lap_times.len() as u32;
        let race = result.total_time;

        let existing = self
            .tracks
            .iter_mut()
            .find(|r| r.seed == seed && r.difficulty == difficulty && r.laps == laps);

        let update = match existing {
            Some(record) => {
                record.races += 1;
                let update = RecordUpdate {
                    new_best_race: race < record.best_race,
                    new_best_lap: lap < record.best_lap,
                };
                if update.new_best_race {
                    record.best_race = race;
                }
                if update.new_best_lap {
                    record.best_lap = lap;
                }
                update
            }
            None => {
                self.tracks.push(TrackRecord {
                    seed: seed.to_string(),
                    difficulty,
                    laps,
                    best_race: race,
                    best_lap: lap,
                    races: 1,
                });
                RecordUpdate {
                    new_best_race: true,
                    new_best_lap: true,
                }
            }
        };

        if update.any() {
            log::info!(
                "New record on '{}' ({}, {} laps): race {:.3}s, lap {:.3}s",
                seed,
                difficulty.as_str(),
                laps,
                race,
                lap
            );
        }
        update
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: LapRecords = serde_json::from_str(json)?;
        log::info!("Loaded records for {} tracks", records.tracks.len());
        Ok(records)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
