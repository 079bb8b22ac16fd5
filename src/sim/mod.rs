//! Deterministic race simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied delta time only (clamped by the session)
//! - No rendering, audio or platform dependencies
//! - Events are returned, never pushed to callbacks

pub mod autopilot;
pub mod boundary;
pub mod race;
pub mod session;
pub mod ship;

pub use autopilot::autopilot;
pub use boundary::{BoundaryResult, is_on_track};
pub use race::{RaceEvent, RacePhase, RaceResult, RaceState, race_tick};
pub use session::RaceSession;
pub use ship::{ShipInput, VehicleState, vehicle_tick};
