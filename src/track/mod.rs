//! Procedural track generation
//!
//! Pure and deterministic: a seed string (plus difficulty) maps to exactly
//! one [`TrackData`]. No simulation state is touched here.

pub mod data;
pub mod generator;
pub mod geometry;
pub mod placement;
pub mod spline;

pub use data::{BoostPad, Bounds, Checkpoint, Difficulty, TrackData};
pub use generator::{TrackGenerator, generate_track};
pub use geometry::{has_self_intersection, segments_intersect};
