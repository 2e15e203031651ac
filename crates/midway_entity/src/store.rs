//! # Entity Store
//!
//! The owned arena of entity slots plus the category-list and
//! quadrant-bucket tables. All cross-references are 16-bit slot indices;
//! no pointers escape the arena. The store is an explicit state object:
//! tests and tools may run several side by side.
//!
//! ## Iteration contract
//!
//! List and bucket mutations are visible immediately. A caller iterating a
//! category or bucket chain must snapshot the `next` index before invoking
//! anything that can remove the current slot.

use midway_shared::constants::{OFF_MAP_BUCKET, QUADRANT_BUCKET_COUNT};
use midway_shared::CoordsXyz;

use crate::config::EntityConfig;
use crate::error::{EntityError, EntityResult};
use crate::movement::Rotation;
use crate::quadrant::bucket_index;
use crate::services::LabelRegistry;
use crate::slot::{EntityIndex, EntityList, EntityPayload, EntitySlot};

/// The entity pool: slot arena, category lists, quadrant index.
pub struct EntityStore {
    /// All entity slots (pre-allocated).
    slots: Box<[EntitySlot]>,
    /// Head of each category list.
    list_heads: [EntityIndex; EntityList::COUNT],
    /// Population of each category list. Sums to capacity at all times.
    list_counts: [u16; EntityList::COUNT],
    /// Head of each quadrant bucket chain.
    quadrant_heads: Box<[EntityIndex]>,
    /// Active view rotation; shapes the derived screen rects.
    pub(crate) rotation: Rotation,
    /// Session configuration.
    config: EntityConfig,
}

impl EntityStore {
    /// Creates a store with every slot on the free list.
    ///
    /// All memory is allocated here; lifecycle operations never allocate.
    ///
    /// # Panics
    ///
    /// Panics if the configured capacity is zero or does not fit a 16-bit
    /// index with room for the null sentinel.
    #[must_use]
    pub fn new(config: EntityConfig) -> Self {
        assert!(config.capacity > 0, "capacity must be greater than zero");
        assert!(
            config.capacity < usize::from(u16::MAX),
            "capacity must leave room for the 16-bit null index"
        );

        let slots = (0..config.capacity)
            .map(|i| EntitySlot::free(EntityIndex::new(i as u16)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        let quadrant_heads = vec![EntityIndex::NULL; QUADRANT_BUCKET_COUNT].into_boxed_slice();

        let mut store = Self {
            slots,
            list_heads: [EntityIndex::NULL; EntityList::COUNT],
            list_counts: [0; EntityList::COUNT],
            quadrant_heads,
            rotation: Rotation::R0,
            config,
        };
        store.reset();
        store
    }

    /// Reinitializes the store: every slot free and zeroed, the free list
    /// chained in array order, all buckets empty. Called on new-game and
    /// before savegame load.
    pub fn reset(&mut self) {
        for i in 0..self.slots.len() {
            let index = EntityIndex::new(i as u16);
            let mut slot = EntitySlot::free(index);
            if i > 0 {
                slot.prev = EntityIndex::new((i - 1) as u16);
            }
            if i + 1 < self.slots.len() {
                slot.next = EntityIndex::new((i + 1) as u16);
            }
            self.slots[i] = slot;
        }

        self.list_heads = [EntityIndex::NULL; EntityList::COUNT];
        self.list_counts = [0; EntityList::COUNT];
        self.list_heads[EntityList::Free.table_index()] = EntityIndex::new(0);
        self.list_counts[EntityList::Free.table_index()] = self.slots.len() as u16;

        self.quadrant_heads.fill(EntityIndex::NULL);
    }

    /// Returns the total slot capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the session configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    /// Returns the population of a category list.
    #[inline]
    #[must_use]
    pub fn list_count(&self, list: EntityList) -> u16 {
        self.list_counts[list.table_index()]
    }

    /// Returns the head of a category list, or the null index if empty.
    #[inline]
    #[must_use]
    pub fn list_head(&self, list: EntityList) -> EntityIndex {
        self.list_heads[list.table_index()]
    }

    /// Gets an allocated slot by handle. Free slots and out-of-range
    /// handles yield `None`: their handles are stale by definition.
    #[inline]
    #[must_use]
    pub fn get(&self, index: EntityIndex) -> Option<&EntitySlot> {
        let slot = self.slots.get(index.as_usize())?;
        if slot.is_free() {
            return None;
        }
        Some(slot)
    }

    /// Gets an allocated slot mutably. Link fields are managed by the
    /// store; callers must not rewire `prev`/`next`/`next_in_quadrant`.
    #[inline]
    pub fn get_mut(&mut self, index: EntityIndex) -> Option<&mut EntitySlot> {
        let slot = self.slots.get_mut(index.as_usize())?;
        if slot.is_free() {
            return None;
        }
        Some(slot)
    }

    /// Allocates a slot into `list`.
    ///
    /// Misc allocations apply the reserved-capacity policy: they fail once
    /// the misc list reaches its quota, and also while the free list cannot
    /// spare the slots the quota still holds in reserve. Other lists fail
    /// only when the free list is empty.
    ///
    /// The fresh slot is unpositioned, carries default extents, and sits in
    /// the reserved off-map bucket until its first move.
    ///
    /// # Errors
    ///
    /// [`EntityError::PoolExhausted`] when no slot can be granted. Callers
    /// treat this as "no entity created" and skip dependent side effects.
    ///
    /// # Panics
    ///
    /// Panics if `list` is [`EntityList::Free`].
    pub fn allocate(&mut self, list: EntityList) -> EntityResult<EntityIndex> {
        assert!(list != EntityList::Free, "cannot allocate into the free list");

        let free_count = self.list_counts[EntityList::Free.table_index()];
        if list == EntityList::Misc {
            let misc_count = self.list_counts[EntityList::Misc.table_index()];
            if misc_count >= self.config.misc_quota {
                return Err(EntityError::PoolExhausted);
            }
            // The unfilled part of the quota stays reserved on the free list.
            let reserve = self.config.misc_quota - misc_count;
            if reserve >= free_count {
                return Err(EntityError::PoolExhausted);
            }
        } else if free_count == 0 {
            return Err(EntityError::PoolExhausted);
        }

        let index = self.list_heads[EntityList::Free.table_index()];
        self.move_to_list(index, list);
        self.slots[index.as_usize()].reset_fields();
        self.link_at_bucket_head(index, OFF_MAP_BUCKET);

        tracing::trace!("allocated entity {} into {:?}", index.raw(), list);
        Ok(index)
    }

    /// Moves a slot to a different category list. No-op if it is already
    /// there. O(1): unlink from the old chain, insert at the new head,
    /// adjust both counts.
    pub fn move_to_list(&mut self, index: EntityIndex, new_list: EntityList) {
        let old_list = self.slots[index.as_usize()].list;
        if old_list == new_list {
            return;
        }

        self.unlink_from_list(index);
        self.link_at_list_head(index, new_list);

        self.list_counts[old_list.table_index()] -= 1;
        self.list_counts[new_list.table_index()] += 1;
    }

    /// Removes an entity: back to the free list, out of its quadrant
    /// bucket, label released, payload cleared.
    ///
    /// Safe to call while iterating the slot's own list provided the
    /// iterator snapshotted `next` first.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`] if the slot was missing from its
    /// bucket chain. Fatal; do not continue the simulation.
    pub fn remove(
        &mut self,
        index: EntityIndex,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        self.move_to_list(index, EntityList::Free);

        let slot = &mut self.slots[index.as_usize()];
        if let Some(label) = slot.label.take() {
            labels.release(label);
        }
        slot.payload = EntityPayload::None;

        self.unlink_from_bucket(index)?;
        tracing::trace!("removed entity {}", index.raw());
        Ok(())
    }

    /// Iterates a category list front to back. The iterator holds a shared
    /// borrow; collect the handles first when removal during the walk is
    /// needed.
    pub fn iter_list(&self, list: EntityList) -> impl Iterator<Item = EntityIndex> + '_ {
        ListIter {
            store: self,
            cursor: self.list_heads[list.table_index()],
        }
    }

    /// First entity in the quadrant bucket covering `pos`, or the null
    /// index for an empty bucket.
    #[inline]
    #[must_use]
    pub fn first_in_quadrant(&self, pos: CoordsXyz) -> EntityIndex {
        self.quadrant_heads[bucket_index(pos)]
    }

    /// Iterates the quadrant bucket covering `pos`.
    pub fn iter_quadrant(&self, pos: CoordsXyz) -> impl Iterator<Item = EntityIndex> + '_ {
        QuadrantIter {
            store: self,
            cursor: self.first_in_quadrant(pos),
        }
    }

    /// Rebuilds the quadrant index from slot positions. Used after a
    /// savegame load writes the slot array wholesale.
    pub fn rebuild_spatial_index(&mut self) {
        self.quadrant_heads.fill(EntityIndex::NULL);
        for i in 0..self.slots.len() {
            if self.slots[i].is_free() {
                continue;
            }
            let index = self.slots[i].index;
            let bucket = bucket_index(self.slots[i].pos);
            self.link_at_bucket_head(index, bucket);
        }
    }

    /// Zeroes the allocation-scoped fields of every free slot, keeping the
    /// free-list links intact. Keeps savegames compressible.
    pub fn scrub_free_slots(&mut self) {
        let mut cursor = self.list_heads[EntityList::Free.table_index()];
        while !cursor.is_null() {
            let slot = &mut self.slots[cursor.as_usize()];
            let next = slot.next;
            let prev = slot.prev;
            *slot = EntitySlot::free(cursor);
            slot.next = next;
            slot.prev = prev;
            cursor = next;
        }
    }

    /// Verifies the structural invariants: list counts sum to capacity,
    /// every slot reachable from exactly one category head with consistent
    /// back-links, and every allocated slot present exactly once in the
    /// bucket matching its position.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`] naming the first offending slot.
    pub fn verify_integrity(&self) -> EntityResult<()> {
        let total: usize = self.list_counts.iter().map(|&c| usize::from(c)).sum();
        if total != self.slots.len() {
            return Err(EntityError::CorruptedList {
                index: EntityIndex::NULL,
            });
        }

        let mut seen = vec![false; self.slots.len()];
        for list in EntityList::ALL {
            let mut walked: u16 = 0;
            let mut prev = EntityIndex::NULL;
            let mut cursor = self.list_heads[list.table_index()];
            while !cursor.is_null() {
                let slot = &self.slots[cursor.as_usize()];
                if slot.list != list || slot.prev != prev || seen[cursor.as_usize()] {
                    return Err(EntityError::CorruptedList { index: cursor });
                }
                seen[cursor.as_usize()] = true;
                walked += 1;
                prev = cursor;
                cursor = slot.next;
            }
            if walked != self.list_counts[list.table_index()] {
                return Err(EntityError::CorruptedList { index: prev });
            }
        }

        for slot in self.slots.iter() {
            if slot.is_free() {
                continue;
            }
            let bucket = bucket_index(slot.pos);
            let mut found = 0;
            let mut cursor = self.quadrant_heads[bucket];
            while !cursor.is_null() {
                if cursor == slot.index {
                    found += 1;
                }
                cursor = self.slots[cursor.as_usize()].next_in_quadrant;
            }
            if found != 1 {
                return Err(EntityError::CorruptedList { index: slot.index });
            }
        }

        Ok(())
    }

    // =========================================================================
    // Link primitives - the only code allowed to rewire chains
    // =========================================================================

    /// Unlinks a slot from its category list, patching the head or the
    /// neighbor links. Counts are the caller's concern.
    fn unlink_from_list(&mut self, index: EntityIndex) {
        let slot = &self.slots[index.as_usize()];
        let (list, prev, next) = (slot.list, slot.prev, slot.next);

        if prev.is_null() {
            self.list_heads[list.table_index()] = next;
        } else {
            self.slots[prev.as_usize()].next = next;
        }
        if !next.is_null() {
            self.slots[next.as_usize()].prev = prev;
        }
    }

    /// Inserts a slot at the head of a category list and tags it.
    fn link_at_list_head(&mut self, index: EntityIndex, list: EntityList) {
        let old_head = self.list_heads[list.table_index()];

        {
            let slot = &mut self.slots[index.as_usize()];
            slot.list = list;
            slot.prev = EntityIndex::NULL;
            slot.next = old_head;
        }
        self.list_heads[list.table_index()] = index;

        if !old_head.is_null() {
            self.slots[old_head.as_usize()].prev = index;
        }
    }

    /// Splices a slot onto the head of a bucket chain.
    pub(crate) fn link_at_bucket_head(&mut self, index: EntityIndex, bucket: usize) {
        let old_head = self.quadrant_heads[bucket];
        self.quadrant_heads[bucket] = index;
        self.slots[index.as_usize()].next_in_quadrant = old_head;
    }

    /// Removes a slot from the bucket chain its position maps to. Linear
    /// scan; buckets stay short at map-scale cell sizing.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`] if the chain ends before the slot is
    /// found.
    pub(crate) fn unlink_from_bucket(&mut self, index: EntityIndex) -> EntityResult<()> {
        let bucket = bucket_index(self.slots[index.as_usize()].pos);

        let mut cursor = self.quadrant_heads[bucket];
        if cursor == index {
            self.quadrant_heads[bucket] = self.slots[index.as_usize()].next_in_quadrant;
            self.slots[index.as_usize()].next_in_quadrant = EntityIndex::NULL;
            return Ok(());
        }
        while !cursor.is_null() {
            let after = self.slots[cursor.as_usize()].next_in_quadrant;
            if after == index {
                self.slots[cursor.as_usize()].next_in_quadrant =
                    self.slots[index.as_usize()].next_in_quadrant;
                self.slots[index.as_usize()].next_in_quadrant = EntityIndex::NULL;
                return Ok(());
            }
            cursor = after;
        }
        Err(EntityError::CorruptedList { index })
    }

    /// Raw slot access for sibling modules. No liveness filtering.
    #[inline]
    pub(crate) fn slot(&self, index: EntityIndex) -> &EntitySlot {
        &self.slots[index.as_usize()]
    }

    /// Raw mutable slot access for sibling modules.
    #[inline]
    pub(crate) fn slot_mut(&mut self, index: EntityIndex) -> &mut EntitySlot {
        &mut self.slots[index.as_usize()]
    }
}

/// Iterator over a category list.
struct ListIter<'a> {
    store: &'a EntityStore,
    cursor: EntityIndex,
}

impl Iterator for ListIter<'_> {
    type Item = EntityIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_null() {
            return None;
        }
        let current = self.cursor;
        self.cursor = self.store.slots[current.as_usize()].next;
        Some(current)
    }
}

/// Iterator over a quadrant bucket chain.
struct QuadrantIter<'a> {
    store: &'a EntityStore,
    cursor: EntityIndex,
}

impl Iterator for QuadrantIter<'_> {
    type Item = EntityIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.is_null() {
            return None;
        }
        let current = self.cursor;
        self.cursor = self.store.slots[current.as_usize()].next_in_quadrant;
        Some(current)
    }
}
