//! # Midway Entity Pool
//!
//! Fixed-capacity entity management for the simulation:
//! - 10,000 pre-allocated slots, O(1) allocate and remove
//! - Intrusive category lists (vehicles, peeps, misc effects, litter)
//! - A quadrant spatial index for cheap proximity queries
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations after construction** - the slot arena, list
//!    tables, and bucket heads are built once in [`EntityStore::new`]
//! 2. **Indices, not pointers** - every cross-reference is a 16-bit slot
//!    index; [`EntityIndex::NULL`] terminates every chain
//! 3. **Explicit state** - no globals; tests run stores side by side
//!
//! ## Example
//!
//! ```rust,ignore
//! use midway_entity::{EntityConfig, EntityList, EntityStore};
//!
//! let mut store = EntityStore::new(EntityConfig::default());
//! let peep = store.allocate(EntityList::Peep)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod effects;
pub mod error;
pub mod litter;
pub mod movement;
pub mod quadrant;
pub mod services;
pub mod slot;
pub mod store;

pub use config::EntityConfig;
pub use effects::{MiscHooks, NoHooks};
pub use error::{EntityError, EntityResult};
pub use movement::Rotation;
pub use services::{LabelId, LabelRegistry, MaxZoom, NoLabels, NullViewport, TileOracle, ViewportSink};
pub use slot::{EntityIndex, EntityList, EntityPayload, EntitySlot, LitterKind, MiscPayload};
pub use store::EntityStore;
