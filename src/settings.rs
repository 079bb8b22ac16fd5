//! Race preferences
//!
//! Persisted by the host as JSON, separately from lap records.

use serde::{Deserialize, Serialize};

use crate::track::Difficulty;
use crate::tuning::BASE_TIER;

pub const MIN_LAPS: u32 = 1;
pub const MAX_LAPS: u32 = 9;
pub const DEFAULT_LAPS: u32 = 3;

/// Player preferences for the next race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ship tier name, resolved against the tuning table at race start
    pub tier: String,
    /// Laps per race (see [`Settings::laps`])
    pub laps: u32,
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tier: BASE_TIER.to_string(),
            laps: DEFAULT_LAPS,
            difficulty: Difficulty::default(),
        }
    }
}

impl Settings {
    /// Lap count clamped to the supported range
    pub fn laps(&self) -> u32 {
        self.laps.clamp(MIN_LAPS, MAX_LAPS)
    }

    pub fn set_laps(&mut self, laps: u32) {
        self.laps = laps.clamp(MIN_LAPS, MAX_LAPS);
    }

    /// Parse saved settings. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.laps = settings.laps();
        log::info!(
            "Loaded settings: tier={}, laps={}, difficulty={}",
            settings.tier,
            settings.laps,
            settings.difficulty.as_str()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
