//! PNG and GIF output, and output path generation

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::palette::Palette;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. A factor of 0 or 1
/// returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Expand an indexed bitmap through `palette` and upscale it.
pub fn to_rgba_scaled(bitmap: &Bitmap, palette: &Palette, scale: u32) -> RgbaImage {
    scale_image(palette.to_rgba(bitmap), scale)
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save(path)?;
    Ok(())
}

/// Write frames as an animated GIF.
///
/// GIF delays have centisecond resolution, so `frame_ms` is rounded down to
/// a multiple of 10 (minimum 10). An empty frame list writes nothing.
pub fn render_gif(frames: &[RgbaImage], frame_ms: u32, loop_anim: bool, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }
    ensure_parent(path)?;

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) })?;

    let delay_ms = (frame_ms / 10).max(1) * 10;
    for rgba_image in frames {
        let frame = Frame::from_parts(rgba_image.clone(), 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame)?;
    }

    Ok(())
}

/// Output path for a rendered input.
///
/// | Scenario | Output |
/// |----------|--------|
/// | No `-o` | `{input stem}.{ext}` next to the input |
/// | `-o out.png`, single input | `out.png` |
/// | `-o out.png`, several inputs | `out_{stem}.png` |
/// | `-o dir/` | `dir/{stem}.{ext}` |
pub fn generate_output_path(input: &Path, output_arg: Option<&Path>, is_single: bool, ext: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("sprite");

    match output_arg {
        None => input.with_file_name(format!("{}.{}", stem, ext)),
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(format!("{}.{}", stem, ext))
            } else if is_single {
                output.to_path_buf()
            } else {
                let out_stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
                let out_ext = output.extension().and_then(|s| s.to_str()).unwrap_or(ext);
                output.with_file_name(format!("{}_{}.{}", out_stem, stem, out_ext))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_scale_image() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let scaled = scale_image(img.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(*scaled.get_pixel(5, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(scale_image(img.clone(), 0), img);
    }

    #[test]
    fn test_save_png_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let bmp = Bitmap::from_rows(&[[1u8, 2], [0, 3]]);
        save_png(&to_rgba_scaled(&bmp, &Palette::arcade(), 2), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(loaded.get_pixel(0, 2)[3], 0);
    }

    #[test]
    fn test_render_gif_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        let frames = vec![RgbaImage::new(4, 4), RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]))];
        render_gif(&frames, 20, true, &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_gif_empty_is_noop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        render_gif(&[], 20, true, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_output_path() {
        let input = Path::new("art/ship.txt");
        assert_eq!(generate_output_path(input, None, true, "png"), PathBuf::from("art/ship.png"));
        assert_eq!(
            generate_output_path(input, Some(Path::new("out.png")), true, "png"),
            PathBuf::from("out.png")
        );
        assert_eq!(
            generate_output_path(input, Some(Path::new("out.png")), false, "png"),
            PathBuf::from("out_ship.png")
        );
        assert_eq!(
            generate_output_path(input, Some(Path::new("build/")), false, "gif"),
            PathBuf::from("build/ship.gif")
        );
    }
}
