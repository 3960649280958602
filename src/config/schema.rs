//! Configuration schema types for `sfx.toml`
//!
//! Defines the structure and validation rules for spritefx configuration.
//! Every section is optional; an empty file yields the defaults.

use serde::{Deserialize, Serialize};

use crate::palette::{Palette, PaletteError};
use crate::scene::{DEFAULT_BACKGROUND_HEIGHT, DEFAULT_BACKGROUND_WIDTH};
use crate::scheduler::DEFAULT_TICK_MS;

/// Largest output scale factor accepted.
pub const MAX_SCALE: u32 = 16;

/// Largest background width or height accepted.
pub const MAX_BACKGROUND_DIMENSION: u32 = 4096;

/// Animation scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
    /// Milliseconds between task turns
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_ms: default_tick_ms() }
    }
}

fn default_tick_ms() -> u32 {
    DEFAULT_TICK_MS
}

/// Background surface size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackgroundConfig {
    #[serde(default = "default_background_width")]
    pub width: u32,
    #[serde(default = "default_background_height")]
    pub height: u32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            width: default_background_width(),
            height: default_background_height(),
        }
    }
}

fn default_background_width() -> u32 {
    DEFAULT_BACKGROUND_WIDTH
}

fn default_background_height() -> u32 {
    DEFAULT_BACKGROUND_HEIGHT
}

/// Palette used when converting indexed bitmaps to RGBA
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaletteConfig {
    /// Built-in palette name
    #[serde(default = "default_palette")]
    pub builtin: String,
    /// Explicit colors for indices 1-15, overriding `builtin`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            builtin: default_palette(),
            colors: None,
        }
    }
}

fn default_palette() -> String {
    "arcade".to_string()
}

impl PaletteConfig {
    /// Resolve to a concrete palette.
    pub fn resolve(&self) -> Result<Palette, PaletteError> {
        match &self.colors {
            Some(colors) => Palette::from_colors("custom", colors),
            None => Palette::builtin(&self.builtin),
        }
    }
}

/// Image output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// Integer upscale factor for written images
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Delay between animation frames in written GIFs
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            frame_ms: default_frame_ms(),
        }
    }
}

fn default_scale() -> u32 {
    1
}

fn default_frame_ms() -> u32 {
    DEFAULT_TICK_MS
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FxConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "scheduler.tick_ms")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sfx.toml: '{}' {}", self.field, self.message)
    }
}

impl FxConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.scheduler.tick_ms == 0 {
            push("scheduler.tick_ms", "must be a positive integer".to_string());
        }
        if self.background.width == 0 || self.background.height == 0 {
            push("background", "dimensions must be positive".to_string());
        } else if self.background.width > MAX_BACKGROUND_DIMENSION || self.background.height > MAX_BACKGROUND_DIMENSION {
            push(
                "background",
                format!("dimensions must be at most {}x{}", MAX_BACKGROUND_DIMENSION, MAX_BACKGROUND_DIMENSION),
            );
        }
        if self.render.scale == 0 || self.render.scale > MAX_SCALE {
            push("render.scale", format!("must be between 1 and {}", MAX_SCALE));
        }
        if self.render.frame_ms == 0 {
            push("render.frame_ms", "must be a positive integer".to_string());
        }
        if let Err(e) = self.palette.resolve() {
            let field = if self.palette.colors.is_some() { "palette.colors" } else { "palette.builtin" };
            push(field, e.to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
