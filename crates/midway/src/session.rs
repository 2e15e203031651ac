//! # Park Session
//!
//! One running park: the entity store plus the monotonically increasing
//! tick counter. The session is the clock collaborator; subsystems that
//! need a creation timestamp get the current tick passed in rather than
//! reading a global.

use midway_entity::{
    EntityConfig, EntityIndex, EntityResult, EntityStore, LabelRegistry, LitterKind, MiscHooks,
    TileOracle, ViewportSink,
};
use midway_shared::CoordsXyz;

/// A running simulation session.
pub struct ParkSession {
    /// The entity pool and its indices.
    store: EntityStore,
    /// Ticks elapsed since the session started.
    ticks: u32,
}

impl ParkSession {
    /// Starts a session with a freshly initialized entity store.
    #[must_use]
    pub fn new(config: EntityConfig) -> Self {
        tracing::info!(
            "starting session: {} entity slots, misc quota {}, litter ceiling {}",
            config.capacity,
            config.misc_quota,
            config.litter_ceiling
        );
        Self {
            store: EntityStore::new(config),
            ticks: 0,
        }
    }

    /// Returns ticks elapsed since the session started.
    #[inline]
    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Returns the entity store.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Returns the entity store mutably.
    #[inline]
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Restarts the session: every entity released, clock back to zero.
    pub fn reset(&mut self) {
        self.store.reset();
        self.ticks = 0;
        tracing::info!("session reset");
    }

    /// Advances the simulation one tick: bump the clock, then run the
    /// misc-effect updates.
    ///
    /// # Errors
    ///
    /// Propagates [`midway_entity::EntityError::CorruptedList`] from the
    /// update walk. Fatal; the session must not keep ticking.
    pub fn tick(
        &mut self,
        sink: &mut impl ViewportSink,
        hooks: &mut impl MiscHooks,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        self.ticks = self.ticks.wrapping_add(1);
        self.store.update_misc_entities(sink, hooks, labels)
    }

    /// Drops litter near `pos`, stamped with the current session tick.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::create_litter`].
    pub fn drop_litter(
        &mut self,
        pos: CoordsXyz,
        direction: u8,
        kind: LitterKind,
        oracle: &impl TileOracle,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<Option<EntityIndex>> {
        self.store
            .create_litter(pos, direction, kind, self.ticks, oracle, sink, labels)
    }

    /// Sweeps up all litter around `pos`.
    ///
    /// # Errors
    ///
    /// See [`EntityStore::remove_litter_around`].
    pub fn sweep_litter(
        &mut self,
        pos: CoordsXyz,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        self.store.remove_litter_around(pos, sink, labels)
    }
}
