//! # Quadrant Hashing
//!
//! World positions hash to coarse 32x32-unit buckets for proximity queries.
//! The key packs the high bits of `x` above `y`'s cell index, so a bucket
//! covers one cell and neighboring cells differ in the low bits. One bucket
//! index past the spatial range is reserved for unpositioned entities.

use midway_shared::constants::{OFF_MAP_BUCKET, QUADRANT_CELL_SHIFT};
use midway_shared::CoordsXyz;

/// Bucket index for a position. Off-map and sentinel positions map to the
/// reserved bucket.
#[inline]
#[must_use]
pub fn bucket_index(pos: CoordsXyz) -> usize {
    if !pos.is_on_map() {
        return OFF_MAP_BUCKET;
    }
    let x = (pos.x as usize & 0x1FE0) << 3;
    let y = pos.y as usize >> QUADRANT_CELL_SHIFT;
    x | y
}
