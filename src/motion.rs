//! Planar geometry for sprite movement
//!
//! Angles are in degrees, measured from +x towards +y. With screen
//! coordinates (y down) that means 90° points straight down, matching the
//! direction [`crate::transforms::rotate`] turns an image.

use crate::transforms::normalize_angle;

/// A 2D point for motion calculations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading from this point towards `other`, in `[0, 360)`.
    ///
    /// Coincident points give 0.
    pub fn bearing_to(&self, other: &Point2D) -> f64 {
        normalize_angle((other.y - self.y).atan2(other.x - self.x).to_degrees())
    }

    /// The point `distance` away along `heading` degrees.
    pub fn forward(&self, heading: f64, distance: f64) -> Point2D {
        let (sin, cos) = heading.to_radians().sin_cos();
        Point2D {
            x: self.x + cos * distance,
            y: self.y + sin * distance,
        }
    }
}

/// Position on a circle of `radius` around `pivot` at `angle` degrees.
///
/// The angle is not normalized, so accumulated orbit angles can be passed
/// straight through.
pub fn orbit_position(pivot: Point2D, radius: f64, angle: f64) -> Point2D {
    let (sin, cos) = angle.to_radians().sin_cos();
    Point2D {
        x: pivot.x + cos * radius,
        y: pivot.y + sin * radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < EPS);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let o = Point2D::new(10.0, 10.0);
        assert!((o.bearing_to(&Point2D::new(20.0, 10.0)) - 0.0).abs() < EPS);
        assert!((o.bearing_to(&Point2D::new(10.0, 20.0)) - 90.0).abs() < EPS);
        assert!((o.bearing_to(&Point2D::new(0.0, 10.0)) - 180.0).abs() < EPS);
        assert!((o.bearing_to(&Point2D::new(10.0, 0.0)) - 270.0).abs() < EPS);
    }

    #[test]
    fn test_bearing_coincident_is_zero() {
        let o = Point2D::new(1.0, 1.0);
        assert_eq!(o.bearing_to(&o), 0.0);
    }

    #[test]
    fn test_forward() {
        let p = Point2D::new(5.0, 5.0).forward(90.0, 10.0);
        assert!((p.x - 5.0).abs() < EPS);
        assert!((p.y - 15.0).abs() < EPS);
    }

    #[test]
    fn test_orbit_position() {
        let pivot = Point2D::new(80.0, 60.0);
        let p = orbit_position(pivot, 25.0, 180.0);
        assert!((p.x - 55.0).abs() < EPS);
        assert!((p.y - 60.0).abs() < EPS);
        assert!((pivot.distance(&orbit_position(pivot, 25.0, 1234.5)) - 25.0).abs() < EPS);
    }
}
