//! Benchmarks for the reveal-gap solver and the block store.
//!
//! Run with: cargo bench -p panelwall-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use panelwall_layout::{
    GapBounds, GridRect, GridSpec, LayoutConfig, LockedJoints, Seam, WallGeometry, WallLayout,
    solve_axis, toggle_seam_joint,
};
use std::hint::black_box;

fn bench_solve_axis(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/solve_axis");
    let bounds = GapBounds::default();

    for width in [36.0, 144.0, 288.0, 2_000.0] {
        group.bench_with_input(BenchmarkId::new("width", width), &width, |b, &width| {
            b.iter(|| black_box(solve_axis(black_box(width), 18.0, bounds)))
        });
    }

    group.finish();
}

fn bench_wall_geometry(c: &mut Criterion) {
    c.bench_function("layout/wall_geometry", |b| {
        let spec = GridSpec::default();
        b.iter(|| {
            black_box(WallGeometry::solve(
                black_box(288.0),
                black_box(288.0),
                &spec,
                GapBounds::default(),
            ))
        })
    });
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/place");
    let wall = WallLayout::new(LayoutConfig::default()).expect("default wall");

    for (label, rect) in [
        ("unit", GridRect::new(3, 2, 1, 1)),
        ("tall", GridRect::new(2, 0, 1, 5)),
        ("max", GridRect::new(0, 0, 4, 5)),
    ] {
        group.bench_function(label, |b| {
            b.iter_batched(
                || wall.clone(),
                |mut wall| {
                    black_box(
                        wall.place(rect, LockedJoints::bounding(&rect))
                            .expect("in-bounds placement"),
                    )
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_regenerate(c: &mut Criterion) {
    c.bench_function("layout/regenerate_288", |b| {
        b.iter_batched(
            || WallLayout::new(LayoutConfig::default()).expect("default wall"),
            |mut wall| black_box(wall.set_dimensions(Some(288.0), Some(288.0))),
            BatchSize::SmallInput,
        )
    });
}

fn bench_seam_toggle(c: &mut Criterion) {
    let wall = WallLayout::new(LayoutConfig::default()).expect("default wall");
    c.bench_function("layout/seam_toggle", |b| {
        b.iter_batched(
            || wall.clone(),
            |mut wall| black_box(toggle_seam_joint(wall.store_mut(), Seam::vertical(3))),
            BatchSize::SmallInput,
        )
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut wall = WallLayout::new(LayoutConfig::default()).expect("default wall");
    wall.set_dimensions(Some(288.0), Some(288.0))
        .expect("resize");
    c.bench_function("layout/validate_288", |b| {
        b.iter(|| black_box(wall.store().validate()))
    });
}

criterion_group!(
    benches,
    bench_solve_axis,
    bench_wall_geometry,
    bench_place,
    bench_regenerate,
    bench_seam_toggle,
    bench_validate,
);
criterion_main!(benches);
