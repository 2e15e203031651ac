//! # Entity Pool Benchmark
//!
//! The lifecycle and spatial operations are all on the per-tick path, so
//! they are the ones worth watching:
//! - allocate/remove churn (free-list head pops)
//! - cross-quadrant movement (bucket rekeying)
//! - quadrant bucket queries
//!
//! Run with: `cargo bench --package midway_entity`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use midway_entity::{
    EntityConfig, EntityIndex, EntityList, EntityStore, NoLabels, NullViewport,
};
use midway_shared::CoordsXyz;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Full-size pool for every benchmark.
fn full_store() -> EntityStore {
    EntityStore::new(EntityConfig::default())
}

/// Benchmark: construct the pool (one-time cost at session start).
fn bench_store_creation(c: &mut Criterion) {
    c.bench_function("store_creation_10K", |b| {
        b.iter(|| black_box(EntityStore::new(EntityConfig::default())));
    });
}

/// Benchmark: allocate/remove churn at several batch sizes.
fn bench_allocate_remove_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_remove_churn");

    for count in [100_u16, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut store = full_store();
            let mut handles = Vec::with_capacity(usize::from(count));
            b.iter(|| {
                for _ in 0..count {
                    handles.push(store.allocate(EntityList::Peep).unwrap());
                }
                for index in handles.drain(..) {
                    store.remove(index, &mut NoLabels).unwrap();
                }
                black_box(store.list_count(EntityList::Free))
            });
        });
    }

    group.finish();
}

/// Benchmark: moves that stay inside one quadrant cell (no rekeying).
fn bench_same_cell_moves(c: &mut Criterion) {
    let mut store = full_store();
    let handles: Vec<EntityIndex> = (0..1_000)
        .map(|_| store.allocate(EntityList::Peep).unwrap())
        .collect();
    for &index in &handles {
        store.set_position(index, CoordsXyz::new(512, 512, 0)).unwrap();
    }

    c.bench_function("same_cell_moves_1K", |b| {
        let mut step = 0_i16;
        b.iter(|| {
            step = (step + 1) & 0x1F;
            for &index in &handles {
                store
                    .set_position(index, CoordsXyz::new(512 + (step & 7), 512, 0))
                    .unwrap();
            }
            black_box(store.first_in_quadrant(CoordsXyz::new(512, 512, 0)))
        });
    });
}

/// Benchmark: moves that hop quadrant cells every time (unlink + relink).
fn bench_cross_cell_moves(c: &mut Criterion) {
    let mut store = full_store();
    let handles: Vec<EntityIndex> = (0..1_000)
        .map(|_| store.allocate(EntityList::Peep).unwrap())
        .collect();
    for (i, &index) in handles.iter().enumerate() {
        let x = 64 + (i as i16 % 64) * 32;
        store.set_position(index, CoordsXyz::new(x, 512, 0)).unwrap();
    }

    c.bench_function("cross_cell_moves_1K", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let dy: i16 = if flip { 32 } else { -32 };
            for &index in &handles {
                let pos = store.get(index).unwrap().pos;
                store
                    .set_position(index, CoordsXyz::new(pos.x, pos.y + dy, 0))
                    .unwrap();
            }
            black_box(store.list_count(EntityList::Peep))
        });
    });
}

/// Benchmark: scan the bucket chain for a populated cell.
fn bench_quadrant_query(c: &mut Criterion) {
    let mut store = full_store();
    let mut rng = StdRng::seed_from_u64(0x5EED);

    // Scatter 5,000 peeps over a 64x64-cell region; ~1-2 per bucket.
    for _ in 0..5_000 {
        let index = store.allocate(EntityList::Peep).unwrap();
        let x = rng.gen_range(0..64_i16) * 32 + 16;
        let y = rng.gen_range(0..64_i16) * 32 + 16;
        store.set_position(index, CoordsXyz::new(x, y, 0)).unwrap();
    }

    c.bench_function("quadrant_query_scattered_5K", |b| {
        b.iter(|| {
            let mut found = 0_usize;
            for cell in 0..64_i16 {
                found += store
                    .iter_quadrant(CoordsXyz::new(cell * 32, cell * 32, 0))
                    .count();
            }
            black_box(found)
        });
    });
}

/// Benchmark: litter cleanup scan over a crowded cell.
fn bench_litter_cleanup(c: &mut Criterion) {
    struct OpenGround;
    impl midway_entity::TileOracle for OpenGround {
        fn can_host_litter(&self, _x: i16, _y: i16, _z: i16) -> bool {
            true
        }
    }

    c.bench_function("litter_cleanup_crowded_cell", |b| {
        b.iter_batched(
            || {
                let mut store = full_store();
                for i in 0..40_u32 {
                    store
                        .create_litter(
                            CoordsXyz::new(516, 512, 0),
                            0,
                            midway_entity::LitterKind::Rubbish,
                            i,
                            &OpenGround,
                            &mut NullViewport,
                            &mut NoLabels,
                        )
                        .unwrap();
                }
                store
            },
            |mut store| {
                store
                    .remove_litter_around(
                        CoordsXyz::new(512, 512, 0),
                        &mut NullViewport,
                        &mut NoLabels,
                    )
                    .unwrap();
                black_box(store.list_count(EntityList::Litter))
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_store_creation,
    bench_allocate_remove_churn,
    bench_same_cell_moves,
    bench_cross_cell_moves,
    bench_quadrant_query,
    bench_litter_cleanup,
);

criterion_main!(benches);
