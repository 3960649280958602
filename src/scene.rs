//! Sprites, their handles, and the background they can be stamped onto
//!
//! A [`SpriteId`] is an opaque handle handed out when a sprite joins the
//! scene. Ids are never reused, so a handle to a destroyed sprite simply
//! stops resolving instead of aliasing a newer sprite.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::transforms::rotate::round_half_up;

/// Default background size (the Arcade screen).
pub const DEFAULT_BACKGROUND_WIDTH: u32 = 160;
pub const DEFAULT_BACKGROUND_HEIGHT: u32 = 120;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

/// Monotonic allocator for sprite handles.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> SpriteId {
        let id = SpriteId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// A positioned sprite. `(x, y)` is the centre of its image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    image: Bitmap,
}

impl Sprite {
    pub fn new(image: Bitmap, x: f64, y: f64) -> Self {
        Self { x, y, image }
    }

    /// The currently displayed bitmap.
    pub fn image(&self) -> &Bitmap {
        &self.image
    }

    /// Replace the displayed bitmap.
    pub fn set_image(&mut self, image: Bitmap) {
        self.image = image;
    }

    /// Top-left corner of the image on screen, rounded to whole pixels.
    pub fn top_left(&self) -> (i32, i32) {
        let left = round_half_up(self.x - self.image.width() as f64 / 2.0);
        let top = round_half_up(self.y - self.image.height() as f64 / 2.0);
        (left as i32, top as i32)
    }
}

/// Owns the live sprites and the background surface.
#[derive(Debug)]
pub struct Scene {
    sprites: HashMap<SpriteId, Sprite>,
    ids: IdAllocator,
    background: Bitmap,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND_WIDTH, DEFAULT_BACKGROUND_HEIGHT)
    }
}

impl Scene {
    pub fn new(background_width: u32, background_height: u32) -> Self {
        Self {
            sprites: HashMap::new(),
            ids: IdAllocator::new(),
            background: Bitmap::new(background_width, background_height),
        }
    }

    /// Add a sprite centred at `(x, y)` and return its handle.
    pub fn create(&mut self, image: Bitmap, x: f64, y: f64) -> SpriteId {
        let id = self.ids.alloc();
        self.sprites.insert(id, Sprite::new(image, x, y));
        id
    }

    /// Remove a sprite. Returns it if it was still alive.
    pub fn destroy(&mut self, id: SpriteId) -> Option<Sprite> {
        self.sprites.remove(&id)
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(&id)
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Live sprite ids in creation order.
    pub fn ids(&self) -> Vec<SpriteId> {
        let mut ids: Vec<SpriteId> = self.sprites.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn background(&self) -> &Bitmap {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut Bitmap {
        &mut self.background
    }

    pub fn set_background(&mut self, background: Bitmap) {
        self.background = background;
    }

    /// Composite: the background with every live sprite drawn on top, in
    /// creation order.
    pub fn composite(&self) -> Bitmap {
        let mut frame = self.background.clone();
        for id in self.ids() {
            if let Some(sprite) = self.sprites.get(&id) {
                let (left, top) = sprite.top_left();
                frame.draw_transparent(sprite.image(), left, top);
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_not_reused() {
        let mut scene = Scene::new(8, 8);
        let a = scene.create(Bitmap::new(1, 1), 0.0, 0.0);
        scene.destroy(a);
        let b = scene.create(Bitmap::new(1, 1), 0.0, 0.0);
        assert_ne!(a, b);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
    }

    #[test]
    fn test_top_left_rounds_from_centre() {
        let sprite = Sprite::new(Bitmap::new(5, 4), 10.0, 10.0);
        // 10 - 2.5 = 7.5 rounds up to 8; 10 - 2 = 8
        assert_eq!(sprite.top_left(), (8, 8));
    }

    #[test]
    fn test_composite_draws_sprites_over_background() {
        let mut scene = Scene::new(4, 4);
        scene.create(Bitmap::from_rows(&[[3u8]]), 1.0, 1.0);
        let frame = scene.composite();
        // 1x1 sprite at centre 1.0 -> top-left round(0.5) = 1
        assert_eq!(frame.get_pixel(1, 1), 3);
        assert_eq!(frame.opaque_count(), 1);
        assert!(scene.background().is_blank());
    }

    #[test]
    fn test_destroy_returns_sprite() {
        let mut scene = Scene::default();
        let id = scene.create(Bitmap::new(2, 2), 5.0, 6.0);
        let sprite = scene.destroy(id).unwrap();
        assert_eq!((sprite.x, sprite.y), (5.0, 6.0));
        assert!(scene.destroy(id).is_none());
        assert!(scene.is_empty());
    }
}
