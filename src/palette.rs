//! 16-entry palettes and conversion of indexed bitmaps to RGBA
//!
//! Index 0 is always fully transparent regardless of the palette, so a
//! palette only defines the 15 visible colors.
//!
//! Colors are given as CSS strings: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, or any
//! functional/named form lightningcss understands (`rgb(...)`, `hsl(...)`,
//! `red`, ...).

use image::{Rgba, RgbaImage};
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

use crate::bitmap::{Bitmap, TRANSPARENT};

/// Error type for color and palette parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
    /// Wrong number of palette entries
    #[error("palette needs exactly 15 colors for indices 1-15, got {0}")]
    WrongSize(usize),
    /// No built-in palette with that name
    #[error("unknown palette '{0}'")]
    UnknownBuiltin(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use spritefx::palette::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("#00ff0080").unwrap(), image::Rgba([0, 255, 0, 128]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, PaletteError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(PaletteError::Empty);
    }
    match s.strip_prefix('#') {
        Some(hex) => parse_hex_color(hex),
        None => parse_css_color(s),
    }
}

fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, PaletteError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHex(bad));
    }
    // All digits are ASCII hex at this point, so slicing and radix parsing cannot fail
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0) * 17;
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

    match hex.len() {
        3 => Ok(Rgba([nibble(0), nibble(1), nibble(2), 255])),
        4 => Ok(Rgba([nibble(0), nibble(1), nibble(2), nibble(3)])),
        6 => Ok(Rgba([byte(0), byte(2), byte(4), 255])),
        8 => Ok(Rgba([byte(0), byte(2), byte(4), byte(6)])),
        len => Err(PaletteError::InvalidLength(len)),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, PaletteError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| PaletteError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| PaletteError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                Ok(Rgba([channel(rgb.r), channel(rgb.g), channel(rgb.b), channel(rgb.alpha)]))
            }
            _ => Err(PaletteError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(PaletteError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["arcade", "pico8", "grayscale"];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// A named 16-entry palette. Entry 0 is transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    colors: [Rgba<u8>; 16],
}

impl Default for Palette {
    fn default() -> Self {
        Self::arcade()
    }
}

impl Palette {
    /// Build a palette from 15 color strings for indices 1 through 15.
    pub fn from_colors<S: AsRef<str>>(name: impl Into<String>, colors: &[S]) -> Result<Self, PaletteError> {
        if colors.len() != 15 {
            return Err(PaletteError::WrongSize(colors.len()));
        }
        let mut entries = [Rgba([0, 0, 0, 0]); 16];
        for (i, color) in colors.iter().enumerate() {
            entries[i + 1] = parse_color(color.as_ref())?;
        }
        Ok(Self { name: name.into(), colors: entries })
    }

    /// Look up a built-in palette by name.
    pub fn builtin(name: &str) -> Result<Self, PaletteError> {
        match name.to_lowercase().as_str() {
            "arcade" => Ok(Self::arcade()),
            "pico8" => Ok(Self::from_hex_table("pico8", &PICO8)),
            "grayscale" => Ok(Self::from_hex_table("grayscale", &GRAYSCALE)),
            _ => Err(PaletteError::UnknownBuiltin(name.to_string())),
        }
    }

    /// The default MakeCode Arcade palette.
    pub fn arcade() -> Self {
        Self::from_hex_table("arcade", &ARCADE)
    }

    fn from_hex_table(name: &str, table: &[u32; 15]) -> Self {
        let mut colors = [Rgba([0, 0, 0, 0]); 16];
        for (i, &rgb) in table.iter().enumerate() {
            colors[i + 1] = Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255]);
        }
        Self { name: name.to_string(), colors }
    }

    /// RGBA color of a palette index. Index 0 and out-of-range are transparent.
    pub fn color(&self, index: u8) -> Rgba<u8> {
        if index == TRANSPARENT {
            return Rgba([0, 0, 0, 0]);
        }
        self.colors.get(index as usize).copied().unwrap_or(Rgba([0, 0, 0, 0]))
    }

    /// Expand an indexed bitmap to RGBA.
    pub fn to_rgba(&self, bitmap: &Bitmap) -> RgbaImage {
        let (w, h) = bitmap.dimensions();
        let mut out = RgbaImage::new(w, h);
        for (x, y, index) in bitmap.enumerate_pixels() {
            out.put_pixel(x, y, self.color(index));
        }
        out
    }
}

const ARCADE: [u32; 15] = [
    0xFFFFFF, 0xFF2121, 0xFF93C4, 0xFF8135, 0xFFF609, 0x249CA3, 0x78DC52, 0x003FAD, 0x87F2FF,
    0x8E2EC4, 0xA4839F, 0x5C406C, 0xE5CDC4, 0x91463D, 0x000000,
];

// PICO-8 minus its black, which is the closest thing it has to "transparent"
const PICO8: [u32; 15] = [
    0x1D2B53, 0x7E2553, 0x008751, 0xAB5236, 0x5F574F, 0xC2C3C7, 0xFFF1E8, 0xFF004D, 0xFFA300,
    0xFFEC27, 0x00E436, 0x29ADFF, 0x83769C, 0xFF77A8, 0xFFCCAA,
];

const GRAYSCALE: [u32; 15] = [
    0xFFFFFF, 0xEEEEEE, 0xDDDDDD, 0xCCCCCC, 0xBBBBBB, 0xAAAAAA, 0x999999, 0x888888, 0x777777,
    0x666666, 0x555555, 0x444444, 0x333333, 0x222222, 0x111111,
];
