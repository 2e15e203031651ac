//! # Entity Slots
//!
//! The fixed-size record stored in the pool, its handle type, and the
//! closed variant sets that discriminate both the category lists and the
//! per-kind payloads.
//!
//! Handles are 16-bit slot indices. They are stable for the lifetime of an
//! allocation and become invalid the moment the slot returns to the free
//! list; external collaborators treat them as opaque.

use midway_shared::{CoordsXyz, ScreenRect};

use crate::services::LabelId;

/// Handle to an entity slot.
///
/// The index doubles as the slot's identity: it never changes while the
/// slot is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityIndex(u16);

impl EntityIndex {
    /// Null/invalid handle, also the "no neighbor" link sentinel.
    pub const NULL: Self = Self(u16::MAX);

    /// Creates a handle from a raw slot index.
    #[inline]
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns the slot index widened for array access.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Checks whether this handle is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u16::MAX
    }
}

impl Default for EntityIndex {
    fn default() -> Self {
        Self::NULL
    }
}

/// The category lists partitioning the pool.
///
/// Every slot belongs to exactly one of these at all times; the per-list
/// counts always sum to the pool capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityList {
    /// Unallocated slots.
    Free,
    /// Freshly allocated slots not yet claimed by a kind-specific list.
    Unsorted,
    /// Ride vehicles.
    Vehicle,
    /// Guests and staff.
    Peep,
    /// Transient visual effects, capped by the misc quota.
    Misc,
    /// Dropped litter, capped by the litter ceiling.
    Litter,
}

impl EntityList {
    /// Number of category lists.
    pub const COUNT: usize = 6;

    /// All lists in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Free,
        Self::Unsorted,
        Self::Vehicle,
        Self::Peep,
        Self::Misc,
        Self::Litter,
    ];

    /// Index into the head/count tables.
    #[inline]
    #[must_use]
    pub const fn table_index(self) -> usize {
        match self {
            Self::Free => 0,
            Self::Unsorted => 1,
            Self::Vehicle => 2,
            Self::Peep => 3,
            Self::Misc => 4,
            Self::Litter => 5,
        }
    }
}

/// Sub-kind of a misc-effect entity.
///
/// The steam particle, explosion cloud, and explosion flare are updated by
/// this crate (simple countdown state machines); the remaining kinds are
/// dispatched to a [`crate::effects::MiscHooks`] collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiscPayload {
    /// Ride exhaust. Drifts upward as its accumulator wraps.
    SteamParticle {
        /// Fixed-point accumulator; each wrap lifts the particle one unit.
        drift: u16,
    },
    /// Floating money readout (external update).
    MoneyEffect,
    /// Debris from a crashed vehicle (external update).
    CrashedVehicleParticle,
    /// Explosion smoke.
    ExplosionCloud,
    /// Water splash from a crash (external update).
    CrashSplash,
    /// Explosion flash.
    ExplosionFlare,
    /// Jumping fountain, water style (external update).
    JumpingFountainWater,
    /// Jumping fountain, snow style (external update).
    JumpingFountainSnow,
    /// Escaped balloon (external update).
    Balloon,
    /// Duck (external update).
    Duck,
}

/// Kind of litter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitterKind {
    /// Vomit.
    Vomit,
    /// Vomit, alternate sprite.
    VomitAlt,
    /// Empty drink can.
    EmptyCan,
    /// Generic rubbish.
    Rubbish,
    /// Empty burger box.
    BurgerBox,
    /// Empty drink cup.
    EmptyCup,
    /// Empty food box.
    EmptyBox,
    /// Empty bottle.
    EmptyBottle,
}

/// Per-category payload stored in a slot. Which variant is valid follows
/// the slot's category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityPayload {
    /// Free or freshly allocated slot; no payload.
    None,
    /// Ride vehicle state lives outside this crate.
    Vehicle,
    /// Guest/staff state lives outside this crate.
    Peep,
    /// A piece of litter.
    Litter {
        /// What was dropped.
        kind: LitterKind,
        /// Clock tick at creation; drives newest-first eviction.
        created_at: u32,
    },
    /// A misc effect.
    Misc(MiscPayload),
}

/// Default symmetric horizontal half-width for fresh allocations.
pub const DEFAULT_HALF_WIDTH: u8 = 16;
/// Default vertical extent above the anchor for fresh allocations.
pub const DEFAULT_HEIGHT_ABOVE: u8 = 20;
/// Default vertical extent below the anchor for fresh allocations.
pub const DEFAULT_HEIGHT_BELOW: u8 = 8;

/// One fixed-size record in the entity pool.
///
/// The `prev`/`next` pair threads the slot into exactly one category list;
/// `next_in_quadrant` threads it independently into exactly one spatial
/// bucket. Both chains use slot indices, never pointers.
#[derive(Clone, Debug)]
pub struct EntitySlot {
    /// This slot's own index; stable identity.
    pub index: EntityIndex,
    /// Which category list the slot belongs to.
    pub list: EntityList,
    /// Previous slot in the category list.
    pub prev: EntityIndex,
    /// Next slot in the category list.
    pub next: EntityIndex,
    /// Next slot in the quadrant bucket chain.
    pub next_in_quadrant: EntityIndex,
    /// World position; sentinel when unpositioned.
    pub pos: CoordsXyz,
    /// Derived screen-space box; sentinel when unpositioned.
    pub screen_rect: ScreenRect,
    /// Symmetric horizontal half-width of the screen box.
    pub half_width: u8,
    /// Vertical extent above the anchor.
    pub height_above: u8,
    /// Vertical extent below the anchor.
    pub height_below: u8,
    /// Facing direction, 0..32.
    pub direction: u8,
    /// Animation frame counter; drives effect countdowns.
    pub frame: u16,
    /// Display-label handle owned by this entity, if any.
    pub label: Option<LabelId>,
    /// Category-specific payload.
    pub payload: EntityPayload,
}

impl EntitySlot {
    /// Creates a free, unlinked slot for the given index.
    #[must_use]
    pub const fn free(index: EntityIndex) -> Self {
        Self {
            index,
            list: EntityList::Free,
            prev: EntityIndex::NULL,
            next: EntityIndex::NULL,
            next_in_quadrant: EntityIndex::NULL,
            pos: CoordsXyz::UNPOSITIONED,
            screen_rect: ScreenRect::UNSET,
            half_width: 0,
            height_above: 0,
            height_below: 0,
            direction: 0,
            frame: 0,
            label: None,
            payload: EntityPayload::None,
        }
    }

    /// Resets the allocation-scoped fields to their fresh-slot defaults.
    /// Links and list membership are left untouched.
    pub fn reset_fields(&mut self) {
        self.pos = CoordsXyz::UNPOSITIONED;
        self.screen_rect = ScreenRect::UNSET;
        self.half_width = DEFAULT_HALF_WIDTH;
        self.height_above = DEFAULT_HEIGHT_ABOVE;
        self.height_below = DEFAULT_HEIGHT_BELOW;
        self.direction = 0;
        self.frame = 0;
        self.label = None;
        self.payload = EntityPayload::None;
    }

    /// Whether this slot is on the free list.
    #[inline]
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.list == EntityList::Free
    }
}
