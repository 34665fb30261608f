//! Points, sizes, rectangles, and the rotation math used by gestures.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::element::Transform;

/// A point or displacement in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (positive = down).
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, e.g. a measured on-screen bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rectangle can be used as a rotation pivot.
    #[must_use]
    pub fn is_measurable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Re-express a screen-space displacement in the axes of a box rotated by
/// `degrees` (inverse rotation).
#[must_use]
pub fn to_local_frame(delta: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(
        delta.x * cos + delta.y * sin,
        -delta.x * sin + delta.y * cos,
    )
}

/// Bearing of `pointer` as seen from `center`, in degrees, with 0 at
/// 12 o'clock and increasing clockwise. The result lies in `(-90, 270]`.
#[must_use]
pub fn bearing_degrees(center: Point, pointer: Point) -> f64 {
    let d = pointer - center;
    d.y.atan2(d.x).to_degrees() + 90.0
}

/// Axis-aligned bounding box of a rotated element, offset by the screen
/// position of the canvas origin.
///
/// Rotation happens about the element center, so the box shares that center.
#[must_use]
pub fn rendered_bounds(transform: &Transform, origin: Point) -> Rect {
    let (sin, cos) = transform.rotation.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let w = transform.width * cos + transform.height * sin;
    let h = transform.width * sin + transform.height * cos;
    let c = transform.center() + origin;
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_local_frame_identity_at_zero() {
        let local = to_local_frame(Point::new(40.0, 10.0), 0.0);
        assert_eq!(local, Point::new(40.0, 10.0));
    }

    #[test]
    fn test_local_frame_swaps_axes_at_ninety() {
        let local = to_local_frame(Point::new(30.0, 0.0), 90.0);
        assert!(approx(local.x, 0.0));
        assert!(approx(local.y, -30.0));

        let local = to_local_frame(Point::new(0.0, 30.0), 90.0);
        assert!(approx(local.x, 30.0));
        assert!(approx(local.y, 0.0));
    }

    #[test]
    fn test_bearing_compass_points() {
        let c = Point::new(50.0, 40.0);
        assert!(approx(bearing_degrees(c, Point::new(50.0, -60.0)), 0.0));
        assert!(approx(bearing_degrees(c, Point::new(150.0, 40.0)), 90.0));
        assert!(approx(bearing_degrees(c, Point::new(50.0, 140.0)), 180.0));
        assert!(approx(bearing_degrees(c, Point::new(-50.0, 40.0)), 270.0));
    }

    #[test]
    fn test_rendered_bounds_unrotated() {
        let t = Transform {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            rotation: 0.0,
        };
        let r = rendered_bounds(&t, Point::new(5.0, 5.0));
        assert!(approx(r.x, 15.0));
        assert!(approx(r.y, 25.0));
        assert!(approx(r.width, 100.0));
        assert!(approx(r.height, 50.0));
    }

    #[test]
    fn test_rendered_bounds_rotated_keeps_center() {
        let t = Transform {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            rotation: 90.0,
        };
        let r = rendered_bounds(&t, Point::default());
        assert!(approx(r.width, 50.0));
        assert!(approx(r.height, 100.0));
        assert!(approx(r.center().x, 50.0));
        assert!(approx(r.center().y, 25.0));
    }

    #[test]
    fn test_nan_rect_is_not_measurable() {
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_measurable());
        assert!(!Rect::new(f64::NAN, 0.0, 10.0, 10.0).is_measurable());
    }
}
