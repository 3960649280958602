//! Indexed 16-color bitmaps
//!
//! Every pixel is a palette index in `0..=15`; index 0 is fully transparent.
//! There is no alpha channel, so partial transparency has to be faked by
//! dithering (see [`crate::transforms::dither`]).

/// The transparent palette index.
pub const TRANSPARENT: u8 = 0;

/// Highest valid palette index.
pub const MAX_INDEX: u8 = 15;

/// A width x height grid of palette indices, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a fully transparent bitmap.
    ///
    /// Zero dimensions are bumped to 1 so every bitmap has at least one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Build a bitmap from rows of palette indices.
    ///
    /// Short rows are padded with transparency; values above 15 are masked.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0) as u32;
        let mut bitmap = Bitmap::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &color) in row.as_ref().iter().enumerate() {
                bitmap.set_pixel(x as i32, y as i32, color);
            }
        }
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Read a pixel; out-of-bounds reads are transparent.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        self.index(x, y).map_or(TRANSPARENT, |i| self.pixels[i])
    }

    /// Write a pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color & MAX_INDEX;
        }
    }

    /// Raw row-major pixel indices.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterate `(x, y, color)` over every pixel.
    pub fn enumerate_pixels(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        let w = self.width;
        self.pixels.iter().enumerate().map(move |(i, &c)| (i as u32 % w, i as u32 / w, c))
    }

    /// True when no pixel is opaque.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&c| c == TRANSPARENT)
    }

    /// Number of non-transparent pixels.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|&&c| c != TRANSPARENT).count()
    }

    /// Mirror left-right in place.
    pub fn flip_x(&mut self) {
        let w = self.width as usize;
        for row in self.pixels.chunks_mut(w) {
            row.reverse();
        }
    }

    /// Mirror top-bottom in place.
    pub fn flip_y(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.pixels.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Copy the sub-rectangle starting at `(left, top)`.
    ///
    /// Pixels outside the source read as transparent.
    pub fn sub_image(&self, left: i32, top: i32, width: u32, height: u32) -> Bitmap {
        let mut out = Bitmap::new(width, height);
        for y in 0..out.height as i32 {
            for x in 0..out.width as i32 {
                out.set_pixel(x, y, self.get_pixel(left + x, top + y));
            }
        }
        out
    }

    /// Draw `src` onto this bitmap with its top-left corner at `(left, top)`.
    ///
    /// Transparent source pixels leave the destination untouched and anything
    /// falling outside this bitmap is clipped.
    pub fn draw_transparent(&mut self, src: &Bitmap, left: i32, top: i32) {
        for (x, y, color) in src.enumerate_pixels() {
            if color != TRANSPARENT {
                self.set_pixel(left + x as i32, top + y as i32, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bitmap {
        Bitmap::from_rows(&[[1u8, 2, 3], [4, 5, 6]])
    }

    #[test]
    fn test_new_is_transparent() {
        let bmp = Bitmap::new(4, 3);
        assert_eq!(bmp.dimensions(), (4, 3));
        assert!(bmp.is_blank());
    }

    #[test]
    fn test_new_wide_and_tall() {
        let bmp = Bitmap::new(70_000, 2);
        assert_eq!(bmp.pixels().len(), 140_000);
        assert_eq!(bmp.get_pixel(69_999, 1), TRANSPARENT);
    }

    #[test]
    fn test_new_zero_size_is_one_pixel() {
        let bmp = Bitmap::new(0, 0);
        assert_eq!(bmp.dimensions(), (1, 1));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut bmp = sample();
        assert_eq!(bmp.get_pixel(-1, 0), TRANSPARENT);
        assert_eq!(bmp.get_pixel(3, 0), TRANSPARENT);
        bmp.set_pixel(10, 10, 7);
        assert_eq!(bmp, sample());
    }

    #[test]
    fn test_set_pixel_masks_index() {
        let mut bmp = Bitmap::new(1, 1);
        bmp.set_pixel(0, 0, 0x1A);
        assert_eq!(bmp.get_pixel(0, 0), 0xA);
    }

    #[test]
    fn test_flip_x() {
        let mut bmp = sample();
        bmp.flip_x();
        assert_eq!(bmp, Bitmap::from_rows(&[[3u8, 2, 1], [6, 5, 4]]));
    }

    #[test]
    fn test_flip_y() {
        let mut bmp = Bitmap::from_rows(&[[1u8, 2], [3, 4], [5, 6]]);
        bmp.flip_y();
        assert_eq!(bmp, Bitmap::from_rows(&[[5u8, 6], [3, 4], [1, 2]]));
    }

    #[test]
    fn test_sub_image() {
        let bmp = sample();
        let sub = bmp.sub_image(1, 0, 2, 2);
        assert_eq!(sub, Bitmap::from_rows(&[[2u8, 3], [5, 6]]));
    }

    #[test]
    fn test_draw_transparent_skips_zero_and_clips() {
        let mut bg = Bitmap::from_rows(&[[9u8, 9, 9], [9, 9, 9]]);
        let src = Bitmap::from_rows(&[[0u8, 1], [2, 0]]);
        bg.draw_transparent(&src, 2, 0);
        assert_eq!(bg, Bitmap::from_rows(&[[9u8, 9, 9], [9, 9, 2]]));
    }

    #[test]
    fn test_opaque_count() {
        let bmp = Bitmap::from_rows(&[[0u8, 1, 0], [2, 0, 3]]);
        assert_eq!(bmp.opaque_count(), 3);
        assert!(!bmp.is_blank());
    }
}
