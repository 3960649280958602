//! Ordered-dither opacity
//!
//! The palette has no alpha channel, so partial opacity is approximated by
//! dropping a spatially-stable subset of opaque pixels. The subset is picked
//! with a tiled 4x4 Bayer threshold matrix, which keeps the pattern fixed
//! from frame to frame instead of shimmering.

use crate::bitmap::{Bitmap, TRANSPARENT};

/// 4x4 Bayer ordered dither matrix (16 threshold levels)
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Clamp an opacity percentage into `[0, 100]`.
///
/// NaN is treated as fully opaque.
pub fn clamp_opacity(percent: f64) -> f64 {
    if percent.is_nan() {
        return 100.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Threshold value of the tiled matrix at a pixel position.
#[inline]
pub fn threshold_at(x: u32, y: u32) -> u8 {
    BAYER_4X4[(y % 4) as usize][(x % 4) as usize]
}

/// Whether a pixel at `(x, y)` survives at the given opacity.
///
/// Monotonic in `percent`: a pixel kept at some opacity is kept at every
/// higher opacity.
#[inline]
pub fn is_kept(x: u32, y: u32, percent: f64) -> bool {
    let level = clamp_opacity(percent) * 16.0 / 100.0;
    (threshold_at(x, y) as f64) < level
}

/// Apply dithered transparency to `source`.
///
/// 100% returns an unchanged copy, 0% a blank bitmap of the same size.
pub fn dither_opacity(source: &Bitmap, percent: f64) -> Bitmap {
    let opacity = clamp_opacity(percent);
    if opacity >= 100.0 {
        return source.clone();
    }
    let (w, h) = source.dimensions();
    if opacity <= 0.0 {
        return Bitmap::new(w, h);
    }

    let mut output = Bitmap::new(w, h);
    for (x, y, color) in source.enumerate_pixels() {
        if color == TRANSPARENT {
            continue;
        }
        if is_kept(x, y, opacity) {
            output.set_pixel(x as i32, y as i32, color);
        }
    }

    output
}
