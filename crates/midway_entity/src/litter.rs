//! # Litter
//!
//! Litter creation, the litter-ceiling eviction policy, and targeted
//! cleanup. Litter is the only entity kind whose creation consults the map
//! oracle and the only one with a population ceiling enforced by evicting
//! a live entity.

use midway_shared::CoordsXyz;

use crate::error::{EntityError, EntityResult};
use crate::services::{LabelRegistry, MaxZoom, TileOracle, ViewportSink};
use crate::slot::{EntityIndex, EntityList, EntityPayload, LitterKind};
use crate::store::EntityStore;

/// Drop offset per facing quadrant: litter lands slightly in front of the
/// dropper. Indexed by `direction >> 3`.
const DROP_OFFSET: [(i16, i16); 4] = [(-4, 0), (0, 4), (4, 0), (0, -4)];

/// Vertical tolerance for targeted cleanup.
const CLEANUP_Z_TOLERANCE: i16 = 16;
/// Horizontal tolerance for targeted cleanup.
const CLEANUP_XY_TOLERANCE: i16 = 8;

impl EntityStore {
    /// Drops a piece of litter near `pos`, facing `direction` (0..32).
    ///
    /// The drop point is offset one notch in front of the dropper and the
    /// map oracle is consulted before anything is allocated. When the
    /// litter list sits at its ceiling, the newest existing piece is
    /// evicted first; on a creation-tick tie the first piece found in list
    /// order wins and stays.
    ///
    /// Returns `Ok(None)` when littering is disabled by configuration.
    ///
    /// # Errors
    ///
    /// * [`EntityError::PlacementRejected`] when the oracle refuses the
    ///   offset drop point. Nothing was allocated or evicted.
    /// * [`EntityError::PoolExhausted`] when no slot can be granted.
    /// * [`EntityError::CorruptedList`] from a failed eviction unlink.
    #[allow(clippy::too_many_arguments)]
    pub fn create_litter(
        &mut self,
        pos: CoordsXyz,
        direction: u8,
        kind: LitterKind,
        now: u32,
        oracle: &impl TileOracle,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<Option<EntityIndex>> {
        if self.config().disable_littering {
            return Ok(None);
        }

        let (dx, dy) = DROP_OFFSET[usize::from(direction >> 3) & 3];
        let x = pos.x + dx;
        let y = pos.y + dy;
        if !oracle.can_host_litter(x, y, pos.z) {
            return Err(EntityError::PlacementRejected { x, y, z: pos.z });
        }

        if self.list_count(EntityList::Litter) >= self.config().litter_ceiling {
            self.evict_newest_litter(sink, labels)?;
        }

        let index = self.allocate(EntityList::Litter)?;
        {
            let slot = self.slot_mut(index);
            slot.direction = direction;
            slot.half_width = 6;
            slot.height_above = 6;
            slot.height_below = 3;
            slot.payload = EntityPayload::Litter { kind, created_at: now };
        }
        self.set_position(index, CoordsXyz::new(x, y, pos.z))?;
        self.invalidate_entity(index, MaxZoom::Closest, sink);

        tracing::trace!("dropped {:?} at ({}, {}, {})", kind, x, y, pos.z);
        Ok(Some(index))
    }

    /// Removes every piece of litter within the cleanup tolerances of
    /// `pos`. Scans the single quadrant bucket covering `pos`; litter never
    /// straddles cells, so one bucket suffices.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`] from a failed unlink. Fatal.
    pub fn remove_litter_around(
        &mut self,
        pos: CoordsXyz,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        let mut cursor = self.first_in_quadrant(pos);
        while !cursor.is_null() {
            let slot = self.slot(cursor);
            let next = slot.next_in_quadrant;
            if slot.list == EntityList::Litter
                && (slot.pos.z - pos.z).abs() <= CLEANUP_Z_TOLERANCE
                && (slot.pos.x - pos.x).abs() <= CLEANUP_XY_TOLERANCE
                && (slot.pos.y - pos.y).abs() <= CLEANUP_XY_TOLERANCE
            {
                self.invalidate_entity(cursor, MaxZoom::Closest, sink);
                self.remove(cursor, labels)?;
            }
            cursor = next;
        }
        Ok(())
    }

    /// Evicts the piece of litter with the highest creation tick. Walks the
    /// whole litter list; the ceiling bounds the cost.
    fn evict_newest_litter(
        &mut self,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        let mut newest = EntityIndex::NULL;
        let mut newest_tick = 0u32;
        let mut first = true;
        for index in self.iter_list(EntityList::Litter) {
            let EntityPayload::Litter { created_at, .. } = self.slot(index).payload else {
                return Err(EntityError::CorruptedList { index });
            };
            if first || created_at > newest_tick {
                newest_tick = created_at;
                newest = index;
                first = false;
            }
        }
        if !newest.is_null() {
            tracing::debug!(
                "litter ceiling reached, evicting entity {} (tick {})",
                newest.raw(),
                newest_tick
            );
            self.invalidate_entity(newest, MaxZoom::Closest, sink);
            self.remove(newest, labels)?;
        }
        Ok(())
    }
}
