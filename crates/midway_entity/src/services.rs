//! # External Collaborators
//!
//! Seams for the services this subsystem consumes or notifies: the map/tile
//! oracle, render invalidation, and the display-label registry. The clock is
//! not a trait; callers pass the current tick where creation timestamps are
//! needed.

use midway_shared::ScreenRect;

/// Zoom granularity for a render invalidation.
///
/// A viewport applies the invalidation only when its own zoom level is at
/// or below the granularity's maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MaxZoom {
    /// Closest zoom only. Used by small entities such as litter.
    Closest,
    /// Closest zoom or the next one up.
    Near,
    /// Every zoom except the furthest. Used by misc effects.
    NotFurthest,
}

/// Render-invalidation collaborator.
///
/// The subsystem reports screen regions whose pixels went stale: the old
/// box before a move and the new box after it.
pub trait ViewportSink {
    /// Marks a screen region stale for viewports within `max_zoom`.
    fn invalidate(&mut self, rect: ScreenRect, max_zoom: MaxZoom);
}

/// A sink that drops every invalidation. For headless simulation and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullViewport;

impl ViewportSink for NullViewport {
    fn invalidate(&mut self, _rect: ScreenRect, _max_zoom: MaxZoom) {}
}

/// Map/tile oracle consumed by litter placement.
pub trait TileOracle {
    /// Whether the tile containing `(x, y)` can host litter at height `z`:
    /// owned land, a path at a compatible height, not underground.
    fn can_host_litter(&self, x: i16, y: i16, z: i16) -> bool;
}

/// Handle to a display label owned by an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct LabelId(pub u16);

/// Display-label registry. Entities that own a label must release it on
/// removal.
pub trait LabelRegistry {
    /// Returns a label to the registry.
    fn release(&mut self, id: LabelId);
}

/// A registry for sessions that never assign labels. Releasing is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLabels;

impl LabelRegistry for NoLabels {
    fn release(&mut self, _id: LabelId) {}
}
