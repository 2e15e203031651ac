//! # Misc Effects
//!
//! Constructors and tick updates for the transient visual effects living
//! on the misc list. The steam particle, explosion cloud, and explosion
//! flare are simple countdown machines owned here: advance a frame counter
//! by a fixed step, remove once it crosses the kind's terminal threshold.
//! The remaining kinds belong to external collaborators and are routed
//! through [`MiscHooks`].

use midway_shared::CoordsXyz;

use crate::error::{EntityError, EntityResult};
use crate::services::{LabelRegistry, MaxZoom, ViewportSink};
use crate::slot::{EntityIndex, EntityList, EntityPayload, MiscPayload};
use crate::store::EntityStore;

/// Frame step per tick for a steam particle.
const STEAM_FRAME_STEP: u16 = 64;
/// Steam particle terminal frame.
const STEAM_LIFETIME: u16 = 56 * 64;
/// Fixed-point drift step; each accumulator wrap lifts the particle.
const STEAM_DRIFT_STEP: u16 = 0x5555;

/// Frame step per tick for an explosion cloud.
const CLOUD_FRAME_STEP: u16 = 128;
/// Explosion cloud terminal frame.
const CLOUD_LIFETIME: u16 = 36 * 128;

/// Frame step per tick for an explosion flare.
const FLARE_FRAME_STEP: u16 = 64;
/// Explosion flare terminal frame.
const FLARE_LIFETIME: u16 = 124 * 64;

/// Explosions render slightly above their anchor tile.
const EXPLOSION_Z_OFFSET: i16 = 4;

/// Update routines for the misc kinds owned outside this crate. Every
/// method defaults to a no-op so headless tests can pass `&mut NoHooks`.
pub trait MiscHooks {
    /// Updates a floating money readout.
    fn update_money_effect(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
    /// Updates a crashed-vehicle debris particle.
    fn update_crashed_vehicle_particle(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
    /// Updates a crash splash.
    fn update_crash_splash(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
    /// Updates a jumping fountain (water or snow; read the payload).
    fn update_jumping_fountain(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
    /// Updates an escaped balloon.
    fn update_balloon(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
    /// Updates a duck.
    fn update_duck(&mut self, _store: &mut EntityStore, _index: EntityIndex) {}
}

/// Hooks implementation that ignores every external kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl MiscHooks for NoHooks {}

impl EntityStore {
    /// Creates an explosion cloud at `pos`.
    ///
    /// # Errors
    ///
    /// [`EntityError::PoolExhausted`] when the misc quota throttles the
    /// effect; the caller skips it.
    pub fn create_explosion_cloud(&mut self, pos: CoordsXyz) -> EntityResult<EntityIndex> {
        let index = self.allocate(EntityList::Misc)?;
        {
            let slot = self.slot_mut(index);
            slot.half_width = 44;
            slot.height_above = 32;
            slot.height_below = 34;
            slot.payload = EntityPayload::Misc(MiscPayload::ExplosionCloud);
            slot.frame = 0;
        }
        self.set_position(index, CoordsXyz::new(pos.x, pos.y, pos.z + EXPLOSION_Z_OFFSET))?;
        Ok(index)
    }

    /// Creates an explosion flare at `pos`.
    ///
    /// # Errors
    ///
    /// [`EntityError::PoolExhausted`] when the misc quota throttles the
    /// effect; the caller skips it.
    pub fn create_explosion_flare(&mut self, pos: CoordsXyz) -> EntityResult<EntityIndex> {
        let index = self.allocate(EntityList::Misc)?;
        {
            let slot = self.slot_mut(index);
            slot.half_width = 25;
            slot.height_above = 85;
            slot.height_below = 8;
            slot.payload = EntityPayload::Misc(MiscPayload::ExplosionFlare);
            slot.frame = 0;
        }
        self.set_position(index, CoordsXyz::new(pos.x, pos.y, pos.z + EXPLOSION_Z_OFFSET))?;
        Ok(index)
    }

    /// Creates a steam particle at `pos` with the default extents.
    ///
    /// # Errors
    ///
    /// [`EntityError::PoolExhausted`] when the misc quota throttles the
    /// effect; the caller skips it.
    pub fn create_steam_particle(&mut self, pos: CoordsXyz) -> EntityResult<EntityIndex> {
        let index = self.allocate(EntityList::Misc)?;
        {
            let slot = self.slot_mut(index);
            slot.payload = EntityPayload::Misc(MiscPayload::SteamParticle { drift: 0 });
            slot.frame = 0;
        }
        self.set_position(index, pos)?;
        Ok(index)
    }

    /// Walks the misc list exactly once, dispatching each entity to its
    /// per-kind update. The `next` index is snapshotted before each update
    /// so a removal of the current entity cannot derail the walk.
    ///
    /// # Errors
    ///
    /// [`EntityError::CorruptedList`] from a failed unlink, or when a slot
    /// on the misc list carries a non-misc payload. Fatal either way.
    pub fn update_misc_entities(
        &mut self,
        sink: &mut impl ViewportSink,
        hooks: &mut impl MiscHooks,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        let mut cursor = self.list_head(EntityList::Misc);
        while !cursor.is_null() {
            let next = self.slot(cursor).next;
            let EntityPayload::Misc(kind) = self.slot(cursor).payload else {
                return Err(EntityError::CorruptedList { index: cursor });
            };
            match kind {
                MiscPayload::SteamParticle { drift } => {
                    self.update_steam_particle(cursor, drift, sink, labels)?;
                }
                MiscPayload::ExplosionCloud => {
                    self.update_countdown(cursor, CLOUD_FRAME_STEP, CLOUD_LIFETIME, sink, labels)?;
                }
                MiscPayload::ExplosionFlare => {
                    self.update_countdown(cursor, FLARE_FRAME_STEP, FLARE_LIFETIME, sink, labels)?;
                }
                MiscPayload::MoneyEffect => hooks.update_money_effect(self, cursor),
                MiscPayload::CrashedVehicleParticle => {
                    hooks.update_crashed_vehicle_particle(self, cursor);
                }
                MiscPayload::CrashSplash => hooks.update_crash_splash(self, cursor),
                MiscPayload::JumpingFountainWater | MiscPayload::JumpingFountainSnow => {
                    hooks.update_jumping_fountain(self, cursor);
                }
                MiscPayload::Balloon => hooks.update_balloon(self, cursor),
                MiscPayload::Duck => hooks.update_duck(self, cursor),
            }
            cursor = next;
        }
        Ok(())
    }

    /// Shared countdown for the explosion effects: invalidate, step the
    /// frame, remove past the terminal frame.
    fn update_countdown(
        &mut self,
        index: EntityIndex,
        step: u16,
        lifetime: u16,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        self.invalidate_entity(index, MaxZoom::NotFurthest, sink);
        let slot = self.slot_mut(index);
        slot.frame = slot.frame.wrapping_add(step);
        if slot.frame >= lifetime {
            self.remove(index, labels)?;
        }
        Ok(())
    }

    /// Steam particle countdown plus its upward drift: the fixed-point
    /// accumulator wraps roughly every fourth tick and lifts the particle
    /// one unit.
    fn update_steam_particle(
        &mut self,
        index: EntityIndex,
        drift: u16,
        sink: &mut impl ViewportSink,
        labels: &mut impl LabelRegistry,
    ) -> EntityResult<()> {
        self.invalidate_entity(index, MaxZoom::NotFurthest, sink);

        let new_drift = drift.wrapping_add(STEAM_DRIFT_STEP);
        {
            let slot = self.slot_mut(index);
            slot.payload = EntityPayload::Misc(MiscPayload::SteamParticle { drift: new_drift });
        }
        if new_drift < STEAM_DRIFT_STEP {
            let pos = self.slot(index).pos;
            self.set_position(index, CoordsXyz::new(pos.x, pos.y, pos.z + 1))?;
            self.invalidate_entity(index, MaxZoom::NotFurthest, sink);
        }

        let slot = self.slot_mut(index);
        slot.frame = slot.frame.wrapping_add(STEAM_FRAME_STEP);
        if slot.frame >= STEAM_LIFETIME {
            self.remove(index, labels)?;
        }
        Ok(())
    }
}
