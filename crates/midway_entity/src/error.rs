//! # Entity Error Types
//!
//! All failure modes of the entity subsystem.
//!
//! Out-of-bounds positions are deliberately NOT an error: moving an entity
//! off the map parks it in the reserved off-map bucket with a sentinel
//! position, and it keeps ticking. See [`crate::movement`].

use thiserror::Error;

use crate::slot::EntityIndex;

/// Errors that can occur in the entity subsystem.
///
/// `PoolExhausted` and `PlacementRejected` are expected back-pressure:
/// callers skip the dependent side effects and move on. `CorruptedList`
/// indicates a prior bug elsewhere and must never be swallowed - continuing
/// risks trashing unrelated entities.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityError {
    /// The pool cannot grant a slot: the free list is empty, or a misc
    /// allocation would break the reserved-capacity quota.
    #[error("entity pool exhausted")]
    PoolExhausted,

    /// The map oracle refused litter placement at the target tile. No
    /// entity was created and no eviction was performed.
    #[error("litter placement rejected at ({x}, {y}, {z})")]
    PlacementRejected {
        /// Target x after the direction offset.
        x: i16,
        /// Target y after the direction offset.
        y: i16,
        /// Target z.
        z: i16,
    },

    /// A list or bucket chain was scanned to exhaustion without finding the
    /// expected slot. Fatal: an earlier operation desynchronized the links.
    #[error("intrusive list corrupted: entity {index:?} missing from its chain")]
    CorruptedList {
        /// The entity whose chain membership was violated.
        index: EntityIndex,
    },
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;
