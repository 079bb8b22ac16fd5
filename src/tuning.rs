//! Data-driven ship tuning
//!
//! Tier tables are plain data built once at startup (defaults or JSON) and
//! handed to whoever needs them. Nothing reads a global table.

use serde::{Deserialize, Serialize};

/// Name of the tier used when a requested tier doesn't exist
pub const BASE_TIER: &str = "cadet";

/// Angular momentum steering parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngularParams {
    /// Angular acceleration from full steering input (rad/s²)
    pub acceleration: f32,
    /// Angular velocity ceiling (rad/s)
    pub max_angular_velocity: f32,
    /// Per-60Hz-frame multiplier applied while no steering input is held
    pub decay: f32,
}

/// Physics constants for one speed class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    pub name: String,
    /// Forward acceleration at zero speed (units/s²)
    pub thrust: f32,
    /// Asymptotic top speed (units/s)
    pub max_speed: f32,
    /// Turn rate for direct steering (rad/s)
    pub rotation_speed: f32,
    /// Brake deceleration as a fraction of thrust
    pub brake_ratio: f32,
    /// Per-60Hz-frame velocity loss on track
    pub drag_on_track: f32,
    /// Per-60Hz-frame velocity loss off track
    pub drag_off_track: f32,
    /// Angular momentum steering; `None` means direct steering
    #[serde(default)]
    pub angular: Option<AngularParams>,
}

impl TierParams {
    pub fn cadet() -> Self {
        Self {
            name: "cadet".to_string(),
            thrust: 380.0,
            max_speed: 420.0,
            rotation_speed: 3.4,
            brake_ratio: 0.7,
            drag_on_track: 0.008,
            drag_off_track: 0.045,
            angular: None,
        }
    }

    pub fn racer() -> Self {
        Self {
            name: "racer".to_string(),
            thrust: 480.0,
            max_speed: 560.0,
            rotation_speed: 3.8,
            brake_ratio: 0.6,
            drag_on_track: 0.006,
            drag_off_track: 0.05,
            angular: Some(AngularParams {
                acceleration: 16.0,
                max_angular_velocity: 4.0,
                decay: 0.82,
            }),
        }
    }

    pub fn ace() -> Self {
        Self {
            name: "ace".to_string(),
            thrust: 600.0,
            max_speed: 720.0,
            rotation_speed: 4.2,
            brake_ratio: 0.5,
            drag_on_track: 0.005,
            drag_off_track: 0.06,
            // Slow decay: you have to counter-steer to stop a spin
            angular: Some(AngularParams {
                acceleration: 14.0,
                max_angular_velocity: 4.6,
                decay: 0.93,
            }),
        }
    }
}

/// Immutable table of ship tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub tiers: Vec<TierParams>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tiers: vec![TierParams::cadet(), TierParams::racer(), TierParams::ace()],
        }
    }
}

impl Tuning {
    /// Load a tier table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        log::info!("Loaded {} ship tiers", tuning.tiers.len());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Tier names in table order
    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.name.as_str())
    }

    /// Look up a tier by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&TierParams> {
        self.tiers.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Look up a tier, falling back to the base tier with a warning.
    ///
    /// If the table has no base tier either, the built-in cadet tier is used.
    pub fn tier(&self, name: &str) -> TierParams {
        if let Some(tier) = self.find(name) {
            return tier.clone();
        }
        log::warn!("Unknown ship tier '{}', falling back to '{}'", name, BASE_TIER);
        self.find(BASE_TIER)
            .cloned()
            .unwrap_or_else(TierParams::cadet)
    }
}
