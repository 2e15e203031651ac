//! # Movement and Screen Projection
//!
//! Moving an entity rekeys its quadrant bucket when the key changes and
//! rederives its screen-space box through the active isometric rotation.
//! Off-map targets are a defined state, not an error: the entity parks in
//! the reserved bucket with a sentinel position and keeps ticking.

use midway_shared::constants::LOCATION_NULL;
use midway_shared::{CoordsXyz, ScreenRect};

use crate::error::EntityResult;
use crate::quadrant::bucket_index;
use crate::services::{MaxZoom, ViewportSink};
use crate::slot::EntityIndex;
use crate::store::EntityStore;

/// The four isometric view rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// Default view.
    #[default]
    R0,
    /// Rotated once clockwise.
    R1,
    /// Rotated twice.
    R2,
    /// Rotated three times.
    R3,
}

impl Rotation {
    /// Projects a world position to the screen-space anchor point.
    ///
    /// Each rotation swaps signs and averages x/y before subtracting the
    /// height. Arithmetic is 32-bit, truncated to the 16-bit screen range.
    #[must_use]
    pub fn project(self, pos: CoordsXyz) -> (i16, i16) {
        let (x, y, z) = (i32::from(pos.x), i32::from(pos.y), i32::from(pos.z));
        let (sx, sy) = match self {
            Self::R0 => (y - x, (y + x) / 2 - z),
            Self::R1 => (-y - x, (y - x) / 2 - z),
            Self::R2 => (-y + x, (-y - x) / 2 - z),
            Self::R3 => (y + x, (-y + x) / 2 - z),
        };
        (sx as i16, sy as i16)
    }
}

impl EntityStore {
    /// Returns the active view rotation.
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Sets the active view rotation. Existing screen rects are not
    /// recomputed; a rotation change triggers a full redraw elsewhere and
    /// each entity's rect refreshes on its next move.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Moves an entity to a new world position.
    ///
    /// Rekeys the quadrant bucket only when the key actually changes
    /// (scan-and-splice). On-map targets get a fresh screen rect from the
    /// active rotation; off-map targets store the sentinel position and a
    /// cleared rect.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`](crate::EntityError::CorruptedList) if
    /// the entity was missing from its old bucket chain. Fatal.
    pub fn set_position(&mut self, index: EntityIndex, pos: CoordsXyz) -> EntityResult<()> {
        let on_map = pos.is_on_map();
        let stored = if on_map {
            pos
        } else {
            CoordsXyz::new(LOCATION_NULL, pos.y, pos.z)
        };

        let old_bucket = bucket_index(self.slot(index).pos);
        let new_bucket = bucket_index(stored);
        if old_bucket != new_bucket {
            self.unlink_from_bucket(index)?;
            self.link_at_bucket_head(index, new_bucket);
        }

        let rotation = self.rotation;
        let slot = self.slot_mut(index);
        if on_map {
            let (sx, sy) = rotation.project(pos);
            let (sx, sy) = (i32::from(sx), i32::from(sy));
            slot.screen_rect = ScreenRect::new(
                (sx - i32::from(slot.half_width)) as i16,
                (sy - i32::from(slot.height_above)) as i16,
                (sx + i32::from(slot.half_width)) as i16,
                (sy + i32::from(slot.height_below)) as i16,
            );
        } else {
            slot.screen_rect = ScreenRect::UNSET;
        }
        slot.pos = stored;
        Ok(())
    }

    /// Reports the entity's current screen rect to the viewport sink.
    /// Unpositioned entities have nothing to invalidate.
    pub fn invalidate_entity(
        &self,
        index: EntityIndex,
        max_zoom: MaxZoom,
        sink: &mut impl ViewportSink,
    ) {
        let rect = self.slot(index).screen_rect;
        if rect.is_unset() {
            return;
        }
        sink.invalidate(rect, max_zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityConfig;
    use crate::slot::EntityList;

    fn store_with_one_peep() -> (EntityStore, EntityIndex) {
        let mut store = EntityStore::new(EntityConfig {
            capacity: 16,
            ..EntityConfig::default()
        });
        let idx = store.allocate(EntityList::Peep).unwrap();
        (store, idx)
    }

    #[test]
    fn test_projection_all_rotations() {
        let pos = CoordsXyz::new(100, 40, 10);
        assert_eq!(Rotation::R0.project(pos), (-60, 60));
        assert_eq!(Rotation::R1.project(pos), (-140, -40));
        assert_eq!(Rotation::R2.project(pos), (60, -80));
        assert_eq!(Rotation::R3.project(pos), (140, 20));
    }

    #[test]
    fn test_move_onto_map_sets_bucket_and_rect() {
        let (mut store, idx) = store_with_one_peep();
        store.set_position(idx, CoordsXyz::new(100, 100, 0)).unwrap();

        let at: Vec<EntityIndex> = store.iter_quadrant(CoordsXyz::new(100, 100, 0)).collect();
        assert_eq!(at, vec![idx]);
        // Gone from the off-map bucket.
        assert!(store.first_in_quadrant(CoordsXyz::UNPOSITIONED).is_null());

        let slot = store.get(idx).unwrap();
        assert!(!slot.screen_rect.is_unset());
        assert_eq!(slot.pos, CoordsXyz::new(100, 100, 0));
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_rect_uses_extents() {
        let (mut store, idx) = store_with_one_peep();
        {
            let slot = store.get_mut(idx).unwrap();
            slot.half_width = 6;
            slot.height_above = 6;
            slot.height_below = 3;
        }
        store.set_position(idx, CoordsXyz::new(100, 40, 10)).unwrap();
        let rect = store.get(idx).unwrap().screen_rect;
        // Anchor (-60, 60) under R0.
        assert_eq!(rect, ScreenRect::new(-66, 54, -54, 63));
    }

    #[test]
    fn test_move_within_same_cell_keeps_bucket() {
        let (mut store, idx) = store_with_one_peep();
        store.set_position(idx, CoordsXyz::new(100, 100, 0)).unwrap();
        store.set_position(idx, CoordsXyz::new(110, 120, 5)).unwrap();
        let at: Vec<EntityIndex> = store.iter_quadrant(CoordsXyz::new(100, 100, 0)).collect();
        assert_eq!(at, vec![idx]);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_off_map_round_trip() {
        let (mut store, idx) = store_with_one_peep();
        store.set_position(idx, CoordsXyz::new(100, 100, 0)).unwrap();

        store.set_position(idx, CoordsXyz::new(-5, 10, 0)).unwrap();
        let slot = store.get(idx).unwrap();
        assert!(slot.pos.is_unpositioned());
        assert!(slot.screen_rect.is_unset());
        assert_eq!(store.first_in_quadrant(CoordsXyz::UNPOSITIONED), idx);
        assert!(store
            .iter_quadrant(CoordsXyz::new(100, 100, 0))
            .next()
            .is_none());

        store.set_position(idx, CoordsXyz::new(100, 100, 0)).unwrap();
        let slot = store.get(idx).unwrap();
        assert!(!slot.screen_rect.is_unset());
        let at: Vec<EntityIndex> = store.iter_quadrant(CoordsXyz::new(100, 100, 0)).collect();
        assert_eq!(at, vec![idx]);
        store.verify_integrity().unwrap();
    }

    #[test]
    fn test_invalidate_skips_unpositioned() {
        struct Counting(u32);
        impl ViewportSink for Counting {
            fn invalidate(&mut self, _rect: ScreenRect, _max_zoom: MaxZoom) {
                self.0 += 1;
            }
        }

        let (mut store, idx) = store_with_one_peep();
        let mut sink = Counting(0);
        store.invalidate_entity(idx, MaxZoom::Closest, &mut sink);
        assert_eq!(sink.0, 0);

        store.set_position(idx, CoordsXyz::new(100, 100, 0)).unwrap();
        store.invalidate_entity(idx, MaxZoom::Closest, &mut sink);
        assert_eq!(sink.0, 1);
    }
}
