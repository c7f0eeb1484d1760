use std::collections::HashSet;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tile_engine::{
    Position,
    shapes::{flood_fill_points, rectangle_points},
};

fn bench_rectangles(c: &mut Criterion) {
    c.bench_function("rectangle_hollow_64", |b| {
        b.iter(|| rectangle_points(black_box(Position::new(0, 0)), black_box(Position::new(63, 63)), false))
    });
    c.bench_function("rectangle_filled_64", |b| {
        b.iter(|| rectangle_points(black_box(Position::new(0, 0)), black_box(Position::new(63, 63)), true))
    });
}

fn bench_flood_fill(c: &mut Criterion) {
    let walls: HashSet<Position> = rectangle_points(Position::new(0, 0), Position::new(63, 63), false).into_iter().collect();

    c.bench_function("flood_fill_enclosed_62x62", |b| {
        b.iter(|| flood_fill_points(black_box(Position::new(10, 10)), 4096, |p| !walls.contains(&p)))
    });
    c.bench_function("flood_fill_open_abort", |b| b.iter(|| flood_fill_points(black_box(Position::new(0, 0)), 4096, |_| true)));
}

criterion_group!(benches, bench_rectangles, bench_flood_fill);
criterion_main!(benches);
