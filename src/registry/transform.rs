//! Per-sprite transform records.

use std::collections::HashMap;

use crate::bitmap::Bitmap;
use crate::scene::SpriteId;
use crate::transforms::{self, clamp_opacity, normalize_angle};

use super::traits::Registry;

/// Transform state for one sprite.
///
/// The baseline is the undistorted art; the displayed bitmap is always
/// recomputed from it and never read back.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRecord {
    sprite: SpriteId,
    baseline: Bitmap,
    rotation: f64,
    opacity: f64,
}

impl TransformRecord {
    fn new(sprite: SpriteId, baseline: Bitmap) -> Self {
        Self {
            sprite,
            baseline,
            rotation: 0.0,
            opacity: 100.0,
        }
    }

    pub fn sprite(&self) -> SpriteId {
        self.sprite
    }

    pub fn baseline(&self) -> &Bitmap {
        &self.baseline
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Opacity percentage, always in `[0, 100]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_angle(degrees);
    }

    pub fn set_opacity(&mut self, percent: f64) {
        self.opacity = clamp_opacity(percent);
    }

    /// Replace the baseline art. Used by shape edits and image cloning.
    pub fn set_baseline(&mut self, baseline: Bitmap) {
        self.baseline = baseline;
    }

    /// Restore rotation 0 and opacity 100.
    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.opacity = 100.0;
    }

    /// The bitmap this record should display.
    pub fn render(&self) -> Bitmap {
        transforms::render_display(&self.baseline, self.rotation, self.opacity)
    }
}

/// Registry of transform records keyed by sprite handle.
///
/// Records are created on first touch and never removed, including after
/// their sprite is destroyed.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    records: HashMap<SpriteId, TransformRecord>,
}

impl TransformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { records: HashMap::new() }
    }

    /// Look up the record for `sprite`, creating it on a miss.
    ///
    /// A new record takes a copy of `current` (the sprite's displayed bitmap
    /// right now) as its baseline, with rotation 0 and opacity 100. `current`
    /// is ignored when the record already exists.
    pub fn resolve(&mut self, sprite: SpriteId, current: &Bitmap) -> &mut TransformRecord {
        self.records.entry(sprite).or_insert_with(|| {
            tracing::debug!(%sprite, width = current.width(), height = current.height(), "tracking sprite");
            TransformRecord::new(sprite, current.clone())
        })
    }

    pub fn get_mut(&mut self, sprite: SpriteId) -> Option<&mut TransformRecord> {
        self.records.get_mut(&sprite)
    }

    /// Iterate over all records in the registry.
    pub fn iter(&self) -> impl Iterator<Item = (&SpriteId, &TransformRecord)> {
        self.records.iter()
    }
}

impl Registry<SpriteId, TransformRecord> for TransformRegistry {
    fn contains(&self, key: SpriteId) -> bool {
        self.records.contains_key(&key)
    }

    fn get(&self, key: SpriteId) -> Option<&TransformRecord> {
        self.records.get(&key)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn keys(&self) -> Vec<SpriteId> {
        let mut keys: Vec<SpriteId> = self.records.keys().copied().collect();
        keys.sort();
        keys
    }
}
