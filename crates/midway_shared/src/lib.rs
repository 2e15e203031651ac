//! # MIDWAY Shared Types
//!
//! Canonical coordinate and geometry types used across the engine, plus the
//! engine-wide constants. These are the representations an external savegame
//! collaborator serializes, so the geometry types stay POD.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constants;
pub mod math;

pub use math::{CoordsXyz, ScreenRect};
