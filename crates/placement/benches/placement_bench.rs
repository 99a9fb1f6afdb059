//! Benchmarks for furniture placement.
//!
//! Measures full preset runs, candidate enumeration at several grid steps,
//! and the validator sweep.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use roomfit_placement::{
    validate, CandidateQuery, LayoutEngine, PlacedItem, Planner, Preset, Rect,
};

fn bench_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_engine");
    group.sample_size(10);

    for &preset in Preset::all() {
        let room = preset.room().unwrap();
        let catalog = preset.catalog();
        let engine = LayoutEngine::new(preset.config());

        group.bench_with_input(
            BenchmarkId::new("preset", preset.name()),
            &(room, catalog, engine),
            |b, (room, catalog, engine)| {
                b.iter(|| {
                    let result = engine.plan(black_box(room), black_box(catalog));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidates");
    let room = Preset::Scored.room().unwrap();
    let zone = Rect::new(1.0, 1.0, 15.0, 9.0).unwrap();

    for &step in &[0.4, 0.2, 0.1] {
        group.bench_with_input(BenchmarkId::new("grid_step", step), &step, |b, &step| {
            b.iter(|| {
                CandidateQuery::new(zone, 0.6, 0.6)
                    .unwrap()
                    .with_obstacles(&room.obstacles)
                    .with_wall_margin(0.5)
                    .with_obstacle_margin(0.7)
                    .with_grid_step(black_box(step))
                    .count()
            })
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for &n in &[10, 50, 200] {
        let placed: Vec<PlacedItem> = (0..n)
            .map(|i| {
                let x = (i % 20) as f64 * 0.8;
                let y = (i / 20) as f64 * 0.8;
                PlacedItem::new("Pot", i, Rect::new(x, y, 0.5, 0.5).unwrap(), "decoration", 1.0)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("items", n), &placed, |b, placed| {
            b.iter(|| validate(black_box(placed), 0.8))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_presets, bench_candidates, bench_validate);
criterion_main!(benches);
