//! Nearest-neighbour rotation on a fixed canvas
//!
//! Each destination pixel is mapped back to its source by rotating the
//! destination coordinate by `-angle` about the image centre. Palette indices
//! are categorical, so there is no blending between neighbours.

use super::angle::normalize_angle;
use crate::bitmap::Bitmap;

/// Rotate `source` clockwise (screen coordinates, y down) by `angle` degrees.
///
/// The result has the same dimensions as the source; corners that rotate
/// outside the canvas are lost and uncovered areas stay transparent.
/// The pivot is `((w-1)/2, (h-1)/2)`, which is half a pixel off-centre
/// towards the top-left for even dimensions.
pub fn rotate(source: &Bitmap, angle: f64) -> Bitmap {
    let normalized = normalize_angle(angle);
    if normalized == 0.0 {
        return source.clone();
    }

    let radians = normalized.to_radians();
    let (sin, cos) = radians.sin_cos();

    let (w, h) = source.dimensions();
    let center_x = (w as f64 - 1.0) / 2.0;
    let center_y = (h as f64 - 1.0) / 2.0;

    let mut rotated = Bitmap::new(w, h);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let dx = x as f64 - center_x;
            let dy = y as f64 - center_y;

            let source_x = round_half_up(cos * dx + sin * dy + center_x);
            let source_y = round_half_up(-sin * dx + cos * dy + center_y);

            if source_x >= 0.0 && source_x < w as f64 && source_y >= 0.0 && source_y < h as f64 {
                rotated.set_pixel(x, y, source.get_pixel(source_x as i32, source_y as i32));
            }
        }
    }

    rotated
}

/// Round to nearest with ties toward +inf, so `-0.5` lands on pixel 0.
#[inline]
pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow() -> Bitmap {
        // Points right: tip at (2, 1)
        Bitmap::from_rows(&[[0u8, 0, 0], [1, 1, 2], [0, 0, 0]])
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let img = arrow();
        assert_eq!(rotate(&img, 0.0), img);
        assert_eq!(rotate(&img, 360.0), img);
    }

    #[test]
    fn test_rotate_90_turns_clockwise() {
        let rotated = rotate(&arrow(), 90.0);
        // Right-pointing arrow now points down
        assert_eq!(rotated, Bitmap::from_rows(&[[0u8, 1, 0], [0, 1, 0], [0, 2, 0]]));
    }

    #[test]
    fn test_rotate_180() {
        let rotated = rotate(&arrow(), 180.0);
        assert_eq!(rotated, Bitmap::from_rows(&[[0u8, 0, 0], [2, 1, 1], [0, 0, 0]]));
    }

    #[test]
    fn test_rotate_negative_equals_positive_complement() {
        let img = arrow();
        assert_eq!(rotate(&img, -90.0), rotate(&img, 270.0));
    }

    #[test]
    fn test_round_half_up_ties() {
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(2.49), 2.0);
    }

    #[test]
    fn test_rotate_keeps_dimensions() {
        let img = Bitmap::new(7, 3);
        assert_eq!(rotate(&img, 33.0).dimensions(), (7, 3));
    }

    #[test]
    fn test_rotate_has_no_holes_at_45() {
        // A solid square rotated by 45 keeps a solid centre thanks to inverse mapping
        let img = Bitmap::from_rows(&[[3u8; 9]; 9]);
        let rotated = rotate(&img, 45.0);
        for y in 2..7 {
            for x in 2..7 {
                assert_eq!(rotated.get_pixel(x, y), 3, "hole at ({}, {})", x, y);
            }
        }
        // Corners leave the canvas
        assert_eq!(rotated.get_pixel(0, 0), 0);
    }
}
