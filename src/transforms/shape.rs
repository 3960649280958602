//! Shape edits applied to a sprite's baseline art
//!
//! These are pure functions: each takes the current baseline and returns the
//! replacement. Unlike rotation and opacity they change the stored art, so
//! their effects compound across calls.

use crate::bitmap::{Bitmap, MAX_INDEX, TRANSPARENT};

use super::rotate::round_half_up;

/// Round a numeric palette argument (ties toward +inf) and clamp it into
/// `[min, max]`.
///
/// NaN maps to `min`.
pub fn clamp_index(value: f64, min: u8, max: u8) -> u8 {
    if value.is_nan() {
        return min;
    }
    round_half_up(value).clamp(min as f64, max as f64) as u8
}

/// Mirror left-right.
pub fn flip_horizontal(source: &Bitmap) -> Bitmap {
    let mut flipped = source.clone();
    flipped.flip_x();
    flipped
}

/// Mirror top-bottom.
pub fn flip_vertical(source: &Bitmap) -> Bitmap {
    let mut flipped = source.clone();
    flipped.flip_y();
    flipped
}

/// Replace every pixel of color `from` with `to`.
///
/// Both indices are rounded and clamped to `[0, 15]`, so index 0 may be used
/// to erase a color or to fill transparency.
pub fn recolor(source: &Bitmap, from: f64, to: f64) -> Bitmap {
    let from = clamp_index(from, 0, MAX_INDEX);
    let to = clamp_index(to, 0, MAX_INDEX);

    let mut recolored = source.clone();
    for (x, y, color) in source.enumerate_pixels() {
        if color == from {
            recolored.set_pixel(x as i32, y as i32, to);
        }
    }
    recolored
}

/// Paint a one-pixel ring around the opaque shape.
///
/// A transparent pixel is painted when any of its 8 neighbours is opaque in
/// `source`; neighbours off the canvas are ignored. The canvas is not grown,
/// so a shape touching the border gets no outline on that side.
pub fn outline(source: &Bitmap, color: f64) -> Bitmap {
    let outline_color = clamp_index(color, 1, MAX_INDEX);
    let mut outlined = source.clone();

    for (x, y, c) in source.enumerate_pixels() {
        if c != TRANSPARENT {
            continue;
        }
        if has_opaque_neighbor(source, x as i32, y as i32) {
            outlined.set_pixel(x as i32, y as i32, outline_color);
        }
    }

    outlined
}

fn has_opaque_neighbor(source: &Bitmap, x: i32, y: i32) -> bool {
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            // get_pixel reads off-canvas as transparent
            if source.get_pixel(x + dx, y + dy) != TRANSPARENT {
                return true;
            }
        }
    }
    false
}

/// Tight bounding box `(left, top, width, height)` of the opaque pixels.
pub fn opaque_bounds(source: &Bitmap) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, color) in source.enumerate_pixels() {
        if color == TRANSPARENT {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Shrink to the bounding box of the opaque pixels.
///
/// A blank image crops to a single transparent pixel.
pub fn crop_transparent_border(source: &Bitmap) -> Bitmap {
    match opaque_bounds(source) {
        Some((left, top, width, height)) => {
            source.sub_image(left as i32, top as i32, width, height)
        }
        None => Bitmap::new(1, 1),
    }
}
