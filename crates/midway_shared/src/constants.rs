//! # Engine Constants
//!
//! Fixed sizing for the entity subsystem.
//!
//! **CRITICAL:** The savegame format assumes these values. Changes break
//! existing saves.

// =============================================================================
// ENTITY POOL
// =============================================================================

/// Total entity slots in the pool. Fixed at session start.
pub const MAX_ENTITIES: usize = 10_000;

/// Reserved quota for the misc-effect list. Misc allocations fail once the
/// list reaches this size, or when granting one would eat into the free
/// slots the quota keeps in reserve.
pub const MISC_QUOTA: u16 = 300;

/// Litter ceiling. Creating litter past this evicts the newest existing
/// piece first.
pub const LITTER_CEILING: u16 = 500;

// =============================================================================
// MAP GEOMETRY
// =============================================================================

/// Largest valid world coordinate on either axis. Anything outside
/// `0..=MAP_COORD_MAX` is off-map and normalizes to [`LOCATION_NULL`].
pub const MAP_COORD_MAX: i16 = 0x1FFF;

/// Sentinel coordinate meaning "not positioned". Used by free slots and by
/// entities that have been moved off the map.
pub const LOCATION_NULL: i16 = i16::MIN;

// =============================================================================
// SPATIAL QUADRANTS
// =============================================================================

/// Quadrant cells are 32 world units on a side.
pub const QUADRANT_CELL_SHIFT: i16 = 5;

/// Bucket index reserved for unpositioned entities.
pub const OFF_MAP_BUCKET: usize = 0x10000;

/// Total quadrant buckets: one per 32x32 cell plus the off-map bucket.
pub const QUADRANT_BUCKET_COUNT: usize = OFF_MAP_BUCKET + 1;
