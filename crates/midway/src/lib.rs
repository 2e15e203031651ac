//! # MIDWAY Session Layer
//!
//! The thin layer that drives the entity subsystem, tick by tick:
//! - Owns the [`midway_entity::EntityStore`] and the simulation clock
//! - Runs the per-tick misc-effect dispatch
//! - Stamps litter with the session tick so eviction can order it
//!
//! Everything stateful lives in [`ParkSession`]; there are no globals, so
//! tests and tools may run several sessions side by side.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod session;

pub use session::ParkSession;
