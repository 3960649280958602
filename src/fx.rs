//! Sprite effects: the public, sprite-scoped operations
//!
//! [`SpriteFx`] owns the scene, the transform registry and the animation
//! scheduler. Every setter follows the same path: resolve (or lazily create)
//! the sprite's [`TransformRecord`], update it, then recompute the displayed
//! bitmap from the baseline.
//!
//! None of these operations fail. A handle to a sprite that no longer exists
//! makes the call a no-op, and out-of-range numbers are clamped or wrapped.

use crate::bitmap::Bitmap;
use crate::config::FxConfig;
use crate::motion::Point2D;
use crate::registry::{Registry, TransformRecord, TransformRegistry};
use crate::scene::{Scene, SpriteId};
use crate::scheduler::{Scheduler, TaskHost, TaskId, TaskKind};
use crate::transforms::shape;

/// Mutable view over the sprites and their transform records.
///
/// Borrowed separately from the scheduler so tasks can drive it.
struct Targets<'a> {
    scene: &'a mut Scene,
    registry: &'a mut TransformRegistry,
}

impl Targets<'_> {
    /// Apply `edit` to the sprite's record and refresh its displayed image.
    ///
    /// Returns `None` when the sprite is missing.
    fn edit<R>(&mut self, id: SpriteId, edit: impl FnOnce(&mut TransformRecord) -> R) -> Option<R> {
        let sprite = self.scene.get_mut(id)?;
        let record = self.registry.resolve(id, sprite.image());
        let result = edit(record);
        tracing::trace!(%id, rotation = record.rotation(), opacity = record.opacity(), "refresh");
        sprite.set_image(record.render());
        Some(result)
    }

    /// Read from the sprite's record, creating it if needed, without a refresh.
    fn inspect<R>(&mut self, id: SpriteId, read: impl FnOnce(&TransformRecord) -> R) -> Option<R> {
        let sprite = self.scene.get(id)?;
        Some(read(self.registry.resolve(id, sprite.image())))
    }
}

impl TaskHost for Targets<'_> {
    fn rotation(&mut self, sprite: SpriteId) -> Option<f64> {
        self.inspect(sprite, |r| r.rotation())
    }

    fn set_rotation(&mut self, sprite: SpriteId, degrees: f64) {
        self.edit(sprite, |r| r.set_rotation(degrees));
    }

    fn position(&self, sprite: SpriteId) -> Option<Point2D> {
        self.scene.get(sprite).map(|s| Point2D::new(s.x, s.y))
    }

    fn set_position(&mut self, sprite: SpriteId, position: Point2D) {
        if let Some(s) = self.scene.get_mut(sprite) {
            s.x = position.x;
            s.y = position.y;
        }
    }
}

/// Sprite effects runtime.
#[derive(Debug)]
pub struct SpriteFx {
    scene: Scene,
    registry: TransformRegistry,
    scheduler: Scheduler,
}

impl Default for SpriteFx {
    fn default() -> Self {
        Self::new(&FxConfig::default())
    }
}

impl SpriteFx {
    pub fn new(config: &FxConfig) -> Self {
        Self {
            scene: Scene::new(config.background.width, config.background.height),
            registry: TransformRegistry::new(),
            scheduler: Scheduler::new(config.scheduler.tick_ms),
        }
    }

    fn targets(&mut self) -> Targets<'_> {
        Targets {
            scene: &mut self.scene,
            registry: &mut self.registry,
        }
    }

    // ------------------------------------------------------------------
    // Host access
    // ------------------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Add a sprite to the scene. Transform state is created on first use.
    pub fn create_sprite(&mut self, image: Bitmap, x: f64, y: f64) -> SpriteId {
        self.scene.create(image, x, y)
    }

    /// Remove a sprite. Its transform record is kept.
    pub fn destroy_sprite(&mut self, id: SpriteId) {
        self.scene.destroy(id);
    }

    /// The bitmap currently shown for a sprite.
    pub fn image(&self, id: SpriteId) -> Option<&Bitmap> {
        self.scene.get(id).map(|s| s.image())
    }

    pub fn position(&self, id: SpriteId) -> Option<Point2D> {
        self.scene.get(id).map(|s| Point2D::new(s.x, s.y))
    }

    /// Move a sprite to an absolute position.
    pub fn set_position(&mut self, id: SpriteId, x: f64, y: f64) {
        self.targets().set_position(id, Point2D::new(x, y));
    }

    /// The stored baseline art, if the sprite has been touched.
    pub fn baseline(&self, id: SpriteId) -> Option<&Bitmap> {
        self.registry.get(id).map(|r| r.baseline())
    }

    // ------------------------------------------------------------------
    // Rotation
    // ------------------------------------------------------------------

    /// Add `delta` degrees to the current rotation.
    pub fn rotate_by(&mut self, id: SpriteId, delta: f64) {
        self.targets().edit(id, |r| {
            let next = r.rotation() + delta;
            r.set_rotation(next)
        });
    }

    /// Set the rotation, wrapped into `[0, 360)`.
    pub fn set_rotation(&mut self, id: SpriteId, degrees: f64) {
        self.targets().edit(id, |r| r.set_rotation(degrees));
    }

    /// Current rotation in degrees; 0 for a missing sprite.
    pub fn rotation(&mut self, id: SpriteId) -> f64 {
        self.targets().inspect(id, |r| r.rotation()).unwrap_or(0.0)
    }

    pub fn reset_rotation(&mut self, id: SpriteId) {
        self.set_rotation(id, 0.0);
    }

    /// Alias of [`SpriteFx::set_rotation`].
    pub fn face_direction(&mut self, id: SpriteId, degrees: f64) {
        self.set_rotation(id, degrees);
    }

    /// Turn `id` to face `target`'s position.
    pub fn face_toward(&mut self, id: SpriteId, target: SpriteId) {
        if !self.scene.contains(id) || !self.scene.contains(target) {
            return;
        }
        let bearing = self.bearing_between(id, target);
        self.set_rotation(id, bearing);
    }

    /// Animate the rotation to `target` along the shortest arc.
    ///
    /// A non-positive duration rotates immediately and spawns nothing.
    pub fn smooth_rotate(&mut self, id: SpriteId, target: f64, duration_ms: f64) -> Option<TaskId> {
        if !self.scene.contains(id) {
            return None;
        }
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            self.set_rotation(id, target);
            return None;
        }
        Some(self.scheduler.spawn(id, TaskKind::SmoothRotate { target }, duration_ms))
    }

    // ------------------------------------------------------------------
    // Shape edits
    // ------------------------------------------------------------------

    fn edit_baseline(&mut self, id: SpriteId, edit: impl FnOnce(&Bitmap) -> Bitmap) {
        self.targets().edit(id, |r| {
            let edited = edit(r.baseline());
            r.set_baseline(edited)
        });
    }

    pub fn flip_horizontal(&mut self, id: SpriteId) {
        self.edit_baseline(id, shape::flip_horizontal);
    }

    pub fn flip_vertical(&mut self, id: SpriteId) {
        self.edit_baseline(id, shape::flip_vertical);
    }

    /// Replace palette index `from` with `to` in the baseline.
    pub fn recolor(&mut self, id: SpriteId, from: f64, to: f64) {
        self.edit_baseline(id, |b| shape::recolor(b, from, to));
    }

    /// Grow a one-pixel outline of `color` around the baseline shape.
    pub fn outline(&mut self, id: SpriteId, color: f64) {
        self.edit_baseline(id, |b| shape::outline(b, color));
    }

    /// Shrink the baseline canvas to its opaque pixels.
    pub fn crop_transparent_border(&mut self, id: SpriteId) {
        self.edit_baseline(id, shape::crop_transparent_border);
    }

    // ------------------------------------------------------------------
    // Opacity
    // ------------------------------------------------------------------

    /// Set opacity in percent, clamped to `[0, 100]`.
    pub fn set_opacity(&mut self, id: SpriteId, percent: f64) {
        self.targets().edit(id, |r| r.set_opacity(percent));
    }

    /// Current opacity; 0 for a missing sprite.
    pub fn opacity(&mut self, id: SpriteId) -> f64 {
        self.targets().inspect(id, |r| r.opacity()).unwrap_or(0.0)
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Distance between two sprites' centres; 0 if either is missing.
    pub fn distance_between(&self, a: SpriteId, b: SpriteId) -> f64 {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.distance(&pb),
            _ => 0.0,
        }
    }

    /// Bearing from `a` to `b` in `[0, 360)`; 0 if either is missing.
    pub fn bearing_between(&self, a: SpriteId, b: SpriteId) -> f64 {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.bearing_to(&pb),
            _ => 0.0,
        }
    }

    /// Move along the sprite's current rotation.
    pub fn move_forward(&mut self, id: SpriteId, distance: f64) {
        let Some(start) = self.position(id) else {
            return;
        };
        let heading = self.rotation(id);
        let end = start.forward(heading, distance);
        self.set_position(id, end.x, end.y);
    }

    /// Circle `(center_x, center_y)` at `speed` degrees per second.
    ///
    /// A non-positive `radius` keeps the sprite's current distance from the
    /// pivot. A non-positive duration does nothing.
    pub fn orbit_around_point(
        &mut self,
        id: SpriteId,
        center_x: f64,
        center_y: f64,
        radius: f64,
        speed: f64,
        duration_ms: f64,
    ) -> Option<TaskId> {
        if !self.scene.contains(id) || duration_ms.is_nan() || duration_ms <= 0.0 {
            return None;
        }
        let kind = TaskKind::Orbit {
            pivot: Point2D::new(center_x, center_y),
            radius,
            speed,
        };
        Some(self.scheduler.spawn(id, kind, duration_ms))
    }

    // ------------------------------------------------------------------
    // Image
    // ------------------------------------------------------------------

    /// Give `target` a copy of `source`'s displayed image as its new baseline.
    ///
    /// The target's rotation and opacity are reset, so it shows the copy
    /// exactly as `source` shows it now.
    pub fn clone_image(&mut self, source: SpriteId, target: SpriteId) {
        let Some(image) = self.image(source).cloned() else {
            return;
        };
        let Some(sprite) = self.scene.get_mut(target) else {
            return;
        };
        sprite.set_image(image.clone());
        self.targets().edit(target, |r| {
            r.set_baseline(image);
            r.reset()
        });
    }

    /// Draw the sprite's displayed image onto the background.
    pub fn stamp_to_background(&mut self, id: SpriteId) {
        let Some(sprite) = self.scene.get(id) else {
            return;
        };
        let (left, top) = sprite.top_left();
        let image = sprite.image().clone();
        self.scene.background_mut().draw_transparent(&image, left, top);
    }

    // ------------------------------------------------------------------
    // Scheduling
    // ------------------------------------------------------------------

    /// Run one scheduler tick. Returns the number of task turns executed.
    pub fn tick(&mut self) -> usize {
        let mut targets = Targets {
            scene: &mut self.scene,
            registry: &mut self.registry,
        };
        self.scheduler.tick(&mut targets)
    }

    /// Tick until every task has finished or `max_ticks` have run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut targets = Targets {
            scene: &mut self.scene,
            registry: &mut self.registry,
        };
        self.scheduler.run_until_idle(&mut targets, max_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::parse_literal;

    fn plus() -> Bitmap {
        parse_literal(
            ". . 2 . .
             . . 2 . .
             2 2 2 2 2
             . . 2 . .
             . . 2 . .",
        )
        .unwrap()
    }

    fn arrow() -> Bitmap {
        parse_literal(
            ". . .
             1 1 2
             . . .",
        )
        .unwrap()
    }

    #[test]
    fn test_first_touch_creates_record_from_current_image() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 10.0, 10.0);
        assert!(fx.baseline(id).is_none());
        assert_eq!(fx.rotation(id), 0.0);
        assert_eq!(fx.baseline(id), Some(&arrow()));
        assert_eq!(fx.opacity(id), 100.0);
    }

    #[test]
    fn test_rotate_by_accumulates_and_wraps() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.rotate_by(id, 300.0);
        fx.rotate_by(id, 90.0);
        assert_eq!(fx.rotation(id), 30.0);
        fx.reset_rotation(id);
        assert_eq!(fx.rotation(id), 0.0);
    }

    #[test]
    fn test_rotation_never_touches_baseline() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        for _ in 0..8 {
            fx.rotate_by(id, 45.0);
        }
        assert_eq!(fx.baseline(id), Some(&arrow()));
        assert_eq!(fx.image(id), Some(&arrow()));
    }

    #[test]
    fn test_missing_sprite_is_noop() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.destroy_sprite(id);
        fx.set_rotation(id, 90.0);
        fx.set_opacity(id, 10.0);
        fx.flip_horizontal(id);
        fx.move_forward(id, 5.0);
        fx.stamp_to_background(id);
        assert_eq!(fx.rotation(id), 0.0);
        assert_eq!(fx.opacity(id), 0.0);
        assert!(fx.smooth_rotate(id, 90.0, 100.0).is_none());
        assert!(fx.orbit_around_point(id, 0.0, 0.0, 5.0, 10.0, 100.0).is_none());
        assert!(fx.registry().is_empty());
    }

    #[test]
    fn test_record_survives_destroy() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.set_rotation(id, 90.0);
        fx.destroy_sprite(id);
        assert!(fx.registry().contains(id));
        assert_eq!(fx.registry().len(), 1);
    }

    #[test]
    fn test_face_toward() {
        let mut fx = SpriteFx::default();
        let a = fx.create_sprite(arrow(), 10.0, 10.0);
        let b = fx.create_sprite(arrow(), 10.0, 30.0);
        fx.face_toward(a, b);
        assert!((fx.rotation(a) - 90.0).abs() < 1e-9);
        fx.face_direction(a, -45.0);
        assert_eq!(fx.rotation(a), 315.0);
    }

    #[test]
    fn test_smooth_rotate_zero_duration_is_immediate() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        assert!(fx.smooth_rotate(id, 450.0, 0.0).is_none());
        assert_eq!(fx.rotation(id), 90.0);
        assert!(fx.scheduler().is_idle());
    }

    #[test]
    fn test_smooth_rotate_lands_exactly() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.set_rotation(id, 350.0);
        fx.smooth_rotate(id, 10.0, 500.0);
        assert_eq!(fx.rotation(id), 350.0);
        fx.run_until_idle(1000);
        assert_eq!(fx.rotation(id), 10.0);
    }

    #[test]
    fn test_flip_edits_baseline() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.flip_horizontal(id);
        let expected = shape::flip_horizontal(&arrow());
        assert_eq!(fx.baseline(id), Some(&expected));
        assert_eq!(fx.image(id), Some(&expected));
        fx.flip_vertical(id);
        fx.flip_vertical(id);
        assert_eq!(fx.baseline(id), Some(&expected));
    }

    #[test]
    fn test_shape_edit_then_rotation_composes() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 0.0, 0.0);
        fx.set_rotation(id, 90.0);
        fx.recolor(id, 2.0, 9.0);
        let expected = crate::transforms::rotate(&shape::recolor(&arrow(), 2.0, 9.0), 90.0);
        assert_eq!(fx.image(id), Some(&expected));
    }

    #[test]
    fn test_quarter_turn_keeps_symmetric_plus() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(plus(), 0.0, 0.0);
        fx.rotate_by(id, 90.0);
        assert_eq!(fx.image(id), Some(&plus()));
        fx.rotate_by(id, 90.0);
        assert_eq!(fx.image(id), Some(&plus()));
    }

    #[test]
    fn test_opacity_round_trip() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(plus(), 0.0, 0.0);
        fx.set_opacity(id, 0.0);
        assert!(fx.image(id).unwrap().is_blank());
        fx.set_opacity(id, 100.0);
        assert_eq!(fx.image(id), Some(&plus()));
        fx.set_opacity(id, 250.0);
        assert_eq!(fx.opacity(id), 100.0);
    }

    #[test]
    fn test_outline_and_crop() {
        let mut fx = SpriteFx::default();
        let mut art = Bitmap::new(6, 6);
        art.set_pixel(2, 3, 7);
        let id = fx.create_sprite(art, 0.0, 0.0);
        fx.crop_transparent_border(id);
        assert_eq!(fx.image(id), Some(&Bitmap::from_rows(&[[7u8]])));
        // The new 1x1 canvas has no room for an outline
        fx.outline(id, 1.0);
        assert_eq!(fx.image(id), Some(&Bitmap::from_rows(&[[7u8]])));
    }

    #[test]
    fn test_move_forward_follows_rotation() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 10.0, 10.0);
        fx.set_rotation(id, 180.0);
        fx.move_forward(id, 4.0);
        let p = fx.position(id).unwrap();
        assert!((p.x - 6.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_and_bearing() {
        let mut fx = SpriteFx::default();
        let a = fx.create_sprite(arrow(), 0.0, 0.0);
        let b = fx.create_sprite(arrow(), 3.0, 4.0);
        assert!((fx.distance_between(a, b) - 5.0).abs() < 1e-9);
        assert!((fx.bearing_between(b, a) - 233.130_102_354_155_98).abs() < 1e-9);
        fx.destroy_sprite(b);
        assert_eq!(fx.distance_between(a, b), 0.0);
        assert_eq!(fx.bearing_between(a, b), 0.0);
    }

    #[test]
    fn test_clone_image_resets_target() {
        let mut fx = SpriteFx::default();
        let a = fx.create_sprite(arrow(), 0.0, 0.0);
        let b = fx.create_sprite(plus(), 0.0, 0.0);
        fx.set_rotation(a, 90.0);
        fx.set_rotation(b, 45.0);
        fx.set_opacity(b, 30.0);
        fx.clone_image(a, b);

        let shown = crate::transforms::rotate(&arrow(), 90.0);
        assert_eq!(fx.image(b), Some(&shown));
        assert_eq!(fx.baseline(b), Some(&shown));
        assert_eq!(fx.rotation(b), 0.0);
        assert_eq!(fx.opacity(b), 100.0);
    }

    #[test]
    fn test_stamp_to_background() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(plus(), 2.5, 2.5);
        fx.stamp_to_background(id);
        let bg = fx.scene().background();
        // Centre 2.5 with width 5 puts the top-left at the origin
        assert_eq!(bg.get_pixel(0, 0), 0);
        assert_eq!(bg.get_pixel(2, 0), 2);
        assert_eq!(bg.get_pixel(0, 2), 2);
        assert_eq!(bg.get_pixel(5, 2), 0);
        assert_eq!(bg.opaque_count(), 9);
    }

    #[test]
    fn test_orbit_moves_sprite() {
        let mut fx = SpriteFx::default();
        let id = fx.create_sprite(arrow(), 105.0, 60.0);
        fx.orbit_around_point(id, 80.0, 60.0, 25.0, 90.0, 1000.0).unwrap();
        assert!(fx.orbit_around_point(id, 80.0, 60.0, 25.0, 90.0, 0.0).is_none());
        fx.run_until_idle(1000);
        let p = fx.position(id).unwrap();
        assert!((p.x - 80.0).abs() < 1e-9);
        assert!((p.y - 85.0).abs() < 1e-9);
    }
}
