//! Criterion benchmarks for SpriteFX critical paths
//!
//! Benchmarks the operations that run on every sprite refresh or tick:
//! - Rotate: nearest-neighbour rotation at several sizes
//! - Dither: ordered-dither opacity
//! - Shape: outline and crop
//! - Scheduler: a full smooth rotation driven tick by tick
//! - Palette: color parsing and RGBA expansion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spritefx::palette::{parse_color, Palette};
use spritefx::transforms::{dither_opacity, outline, crop_transparent_border, render_display, rotate};
use spritefx::{Bitmap, SpriteFx};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a square sprite with a filled disc of varied colors
fn make_disc(size: u32) -> Bitmap {
    let mut img = Bitmap::new(size, size);
    let c = (size as f64 - 1.0) / 2.0;
    let r = size as f64 / 2.5;
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let dx = x as f64 - c;
            let dy = y as f64 - c;
            if dx * dx + dy * dy <= r * r {
                img.set_pixel(x, y, ((x + y) % 15 + 1) as u8);
            }
        }
    }
    img
}

// =============================================================================
// Pixel Pipeline Benchmarks
// =============================================================================

fn bench_rotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotate");

    for size in [8u32, 16, 32, 64] {
        let img = make_disc(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("deg_37", size), &img, |b, img| {
            b.iter(|| rotate(black_box(img), black_box(37.0)))
        });
    }

    // Angle 0 is a straight copy
    let img = make_disc(32);
    group.bench_function("deg_0_32", |b| b.iter(|| rotate(black_box(&img), black_box(0.0))));

    group.finish();
}

fn bench_dither(c: &mut Criterion) {
    let mut group = c.benchmark_group("dither");
    let img = make_disc(32);

    for percent in [0.0, 50.0, 100.0] {
        group.bench_with_input(BenchmarkId::new("opacity_32", percent as u32), &percent, |b, &p| {
            b.iter(|| dither_opacity(black_box(&img), black_box(p)))
        });
    }

    group.bench_function("render_display_32", |b| {
        b.iter(|| render_display(black_box(&img), black_box(45.0), black_box(60.0)))
    });

    group.finish();
}

fn bench_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape");
    let img = make_disc(32);

    group.bench_function("outline_32", |b| b.iter(|| outline(black_box(&img), black_box(1.0))));

    let mut padded = Bitmap::new(64, 64);
    padded.draw_transparent(&img, 16, 16);
    group.bench_function("crop_64", |b| b.iter(|| crop_transparent_border(black_box(&padded))));

    group.finish();
}

// =============================================================================
// Scheduler Benchmarks
// =============================================================================

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");

    // 1 s at 20 ms per tick: 50 steps, each re-rendering the sprite
    group.bench_function("smooth_rotate_16x16_1s", |b| {
        b.iter(|| {
            let mut fx = SpriteFx::default();
            let id = fx.create_sprite(make_disc(16), 80.0, 60.0);
            fx.smooth_rotate(id, black_box(270.0), 1000.0);
            fx.run_until_idle(1000)
        })
    });

    group.bench_function("orbit_10_sprites_1s", |b| {
        b.iter(|| {
            let mut fx = SpriteFx::default();
            for i in 0..10 {
                let id = fx.create_sprite(make_disc(8), 100.0 + i as f64, 60.0);
                fx.orbit_around_point(id, 80.0, 60.0, 0.0, 90.0, 1000.0);
            }
            fx.run_until_idle(1000)
        })
    });

    group.finish();
}

// =============================================================================
// Palette Benchmarks
// =============================================================================

fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");

    group.bench_function("parse_hex_6", |b| b.iter(|| parse_color(black_box("#FF0000"))));
    group.bench_function("parse_named", |b| b.iter(|| parse_color(black_box("red"))));

    let palette = Palette::arcade();
    let img = make_disc(64);
    group.bench_function("to_rgba_64", |b| b.iter(|| palette.to_rgba(black_box(&img))));

    group.finish();
}

criterion_group!(benches, bench_rotate, bench_dither, bench_shape, bench_scheduler, bench_palette);

criterion_main!(benches);
