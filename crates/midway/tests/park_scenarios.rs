//! # Park Session Scenarios
//!
//! End-to-end runs of a session with stub collaborators: effects burning
//! down over real ticks, guests littering against a selective map oracle,
//! and a handyman sweep, with the store invariants verified throughout.

use midway_entity::{
    EntityList, EntityStore, LabelId, LabelRegistry, LitterKind, MaxZoom, MiscHooks, NoHooks,
    TileOracle, ViewportSink,
};
use midway::ParkSession;
use midway_shared::{CoordsXyz, ScreenRect};

/// Oracle that allows litter only on a band of "path" tiles.
struct PathStrip;
impl TileOracle for PathStrip {
    fn can_host_litter(&self, x: i16, _y: i16, _z: i16) -> bool {
        (256..512).contains(&x)
    }
}

#[derive(Default)]
struct RecordingSink {
    rects: Vec<(ScreenRect, MaxZoom)>,
}
impl ViewportSink for RecordingSink {
    fn invalidate(&mut self, rect: ScreenRect, max_zoom: MaxZoom) {
        self.rects.push((rect, max_zoom));
    }
}

#[derive(Default)]
struct RecordingLabels {
    released: Vec<LabelId>,
}
impl LabelRegistry for RecordingLabels {
    fn release(&mut self, id: LabelId) {
        self.released.push(id);
    }
}

fn default_session() -> ParkSession {
    ParkSession::new(midway_entity::EntityConfig::default())
}

#[test]
fn test_effects_burn_down_over_session_ticks() {
    let mut session = default_session();
    let mut sink = RecordingSink::default();

    session
        .store_mut()
        .create_steam_particle(CoordsXyz::new(300, 300, 14))
        .unwrap();
    session
        .store_mut()
        .create_explosion_cloud(CoordsXyz::new(300, 332, 14))
        .unwrap();

    for _ in 0..60 {
        session.tick(&mut sink, &mut NoHooks, &mut RecordingLabels::default()).unwrap();
    }

    assert_eq!(session.store().list_count(EntityList::Misc), 0);
    assert_eq!(session.ticks(), 60);
    // Misc effects invalidate at every zoom short of the furthest.
    assert!(sink.rects.iter().all(|&(_, zoom)| zoom == MaxZoom::NotFurthest));
    session.store().verify_integrity().unwrap();
}

#[test]
fn test_guests_litter_only_on_paths() {
    let mut session = default_session();
    let mut sink = RecordingSink::default();
    let mut labels = RecordingLabels::default();

    // A guest on the path strip drops successfully.
    let dropped = session
        .drop_litter(
            CoordsXyz::new(300, 300, 0),
            8,
            LitterKind::BurgerBox,
            &PathStrip,
            &mut sink,
            &mut labels,
        )
        .unwrap();
    assert!(dropped.is_some());

    // Off the strip the oracle refuses and nothing is created.
    let refused = session.drop_litter(
        CoordsXyz::new(900, 300, 0),
        8,
        LitterKind::BurgerBox,
        &PathStrip,
        &mut sink,
        &mut labels,
    );
    assert!(refused.is_err());
    assert_eq!(session.store().list_count(EntityList::Litter), 1);

    // Litter invalidations are closest-zoom only.
    assert!(sink.rects.iter().all(|&(_, zoom)| zoom == MaxZoom::Closest));
}

#[test]
fn test_handyman_sweep_clears_one_tile() {
    let mut session = default_session();
    let mut sink = RecordingSink::default();
    let mut labels = RecordingLabels::default();

    // Two pieces on one tile, one further down the path.
    for _ in 0..2 {
        session
            .drop_litter(
                CoordsXyz::new(304, 300, 0),
                0,
                LitterKind::EmptyCan,
                &PathStrip,
                &mut sink,
                &mut labels,
            )
            .unwrap()
            .unwrap();
    }
    let far = session
        .drop_litter(
            CoordsXyz::new(404, 300, 0),
            0,
            LitterKind::EmptyCan,
            &PathStrip,
            &mut sink,
            &mut labels,
        )
        .unwrap()
        .unwrap();

    session
        .sweep_litter(CoordsXyz::new(300, 300, 0), &mut sink, &mut labels)
        .unwrap();

    assert_eq!(session.store().list_count(EntityList::Litter), 1);
    assert!(session.store().get(far).is_some());
    session.store().verify_integrity().unwrap();
}

#[test]
fn test_labels_released_on_removal() {
    let mut session = default_session();
    let mut labels = RecordingLabels::default();

    let index = session.store_mut().allocate(EntityList::Peep).unwrap();
    session.store_mut().get_mut(index).unwrap().label = Some(LabelId(17));
    session.store_mut().remove(index, &mut labels).unwrap();

    assert_eq!(labels.released, vec![LabelId(17)]);
}

#[test]
fn test_external_misc_kinds_reach_hooks_each_tick() {
    struct BalloonLogic {
        updates: u32,
    }
    impl MiscHooks for BalloonLogic {
        fn update_balloon(&mut self, store: &mut EntityStore, index: midway_entity::EntityIndex) {
            self.updates += 1;
            // Drift the balloon upward one unit per tick.
            let pos = store.get(index).unwrap().pos;
            store
                .set_position(index, CoordsXyz::new(pos.x, pos.y, pos.z + 1))
                .unwrap();
        }
    }

    let mut session = default_session();
    let index = session.store_mut().allocate(EntityList::Misc).unwrap();
    session.store_mut().get_mut(index).unwrap().payload =
        midway_entity::EntityPayload::Misc(midway_entity::MiscPayload::Balloon);
    session
        .store_mut()
        .set_position(index, CoordsXyz::new(128, 128, 0))
        .unwrap();

    let mut hooks = BalloonLogic { updates: 0 };
    for _ in 0..10 {
        session
            .tick(&mut RecordingSink::default(), &mut hooks, &mut RecordingLabels::default())
            .unwrap();
    }
    assert_eq!(hooks.updates, 10);
    assert_eq!(session.store().get(index).unwrap().pos.z, 10);
}
