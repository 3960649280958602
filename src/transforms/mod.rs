//! Pixel transforms for indexed sprites
//!
//! # Module Structure
//!
//! - [`angle`] - Degree normalization and shortest-path deltas
//! - [`rotate`] - Nearest-neighbour rotation on a fixed canvas
//! - [`dither`] - Ordered-dither opacity
//! - [`shape`] - Baseline edits: flips, recolor, outline, crop
//!
//! [`render_display`] composes the pipeline: the baseline is rotated first,
//! then dithered.

pub mod angle;
pub mod dither;
pub mod rotate;
pub mod shape;

pub use angle::{normalize_angle, shortest_delta};
pub use dither::{clamp_opacity, dither_opacity, BAYER_4X4};
pub use rotate::rotate;
pub use shape::{crop_transparent_border, flip_horizontal, flip_vertical, outline, recolor};

use crate::bitmap::Bitmap;

/// Compute the displayed bitmap for a baseline under rotation and opacity.
pub fn render_display(baseline: &Bitmap, rotation: f64, opacity: f64) -> Bitmap {
    dither_opacity(&rotate(baseline, rotation), opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_display_identity() {
        let img = Bitmap::from_rows(&[[1u8, 2], [3, 4]]);
        assert_eq!(render_display(&img, 0.0, 100.0), img);
    }

    #[test]
    fn test_render_display_rotates_before_dither() {
        let img = Bitmap::from_rows(&[[0u8, 0, 0], [1, 1, 2], [0, 0, 0]]);
        let expected = dither_opacity(&rotate(&img, 90.0), 50.0);
        assert_eq!(render_display(&img, 90.0, 50.0), expected);
    }
}
