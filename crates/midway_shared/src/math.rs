//! Geometry types shared across the engine.
//!
//! These are the canonical representations an external savegame collaborator
//! persists, so they stay `repr(C)` and POD.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::{LOCATION_NULL, MAP_COORD_MAX};

/// A world-space position. Coordinates are 16-bit; `x == LOCATION_NULL`
/// marks an unpositioned entity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct CoordsXyz {
    /// X component (west-east).
    pub x: i16,
    /// Y component (north-south).
    pub y: i16,
    /// Z component (height).
    pub z: i16,
}

impl CoordsXyz {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// The unpositioned sentinel.
    pub const UNPOSITIONED: Self = Self::new(LOCATION_NULL, LOCATION_NULL, 0);

    /// Whether this position carries the unpositioned sentinel.
    #[inline]
    #[must_use]
    pub const fn is_unpositioned(self) -> bool {
        self.x == LOCATION_NULL
    }

    /// Whether both horizontal coordinates lie on the map.
    #[inline]
    #[must_use]
    pub const fn is_on_map(self) -> bool {
        self.x >= 0 && self.y >= 0 && self.x <= MAP_COORD_MAX && self.y <= MAP_COORD_MAX
    }
}

/// A screen-space bounding box used for render invalidation.
/// `left == LOCATION_NULL` marks the cleared sentinel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Left edge.
    pub left: i16,
    /// Top edge.
    pub top: i16,
    /// Right edge.
    pub right: i16,
    /// Bottom edge.
    pub bottom: i16,
}

impl ScreenRect {
    /// Creates a new rect.
    #[inline]
    #[must_use]
    pub const fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The cleared sentinel rect carried by unpositioned entities.
    pub const UNSET: Self = Self::new(LOCATION_NULL, LOCATION_NULL, LOCATION_NULL, LOCATION_NULL);

    /// Whether this rect carries the cleared sentinel.
    #[inline]
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.left == LOCATION_NULL
    }
}
