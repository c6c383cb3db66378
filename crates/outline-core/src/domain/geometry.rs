//! Geometry in the global desktop coordinate space.
//!
//! All display bounds and pointer positions share one coordinate space with a
//! top-left origin on the primary display; y grows downward.  Both native
//! readers (Win32 monitor rectangles and the Core Graphics display space) already
//! use this convention, so no axis flipping happens anywhere.
//!
//! Each overlay surface additionally has a *local* coordinate space whose
//! origin is the top-left corner of the display it covers.

use serde::{Deserialize, Serialize};

/// A position in either global or surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle.
///
/// `x` and `y` are the top-left corner.  Width and height are expected to be
/// non-negative; operations that could shrink a rectangle clamp at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner (may be negative for displays left of the primary).
    pub x: f64,
    /// Y coordinate of the top-left corner (may be negative for displays above the primary).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns `true` if `point` lies inside this rectangle.
    ///
    /// The test is half-open (`x <= p.x < right`), so a point on the edge
    /// shared by two side-by-side displays belongs to exactly one of them.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Shrinks the rectangle by `dx` on the left and right and `dy` on the top
    /// and bottom.  The result never has a negative width or height.
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        let width = (self.width - 2.0 * dx).max(0.0);
        let height = (self.height - 2.0 * dy).max(0.0);
        Rect::new(self.x + dx, self.y + dy, width, height)
    }

    /// The same rectangle expressed in its own local coordinate space.
    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Converts a global point into this rectangle's local coordinates.
    pub fn to_local(&self, global: Point) -> Point {
        Point::new(global.x - self.x, global.y - self.y)
    }

    /// Converts a point in this rectangle's local coordinates back to global.
    pub fn to_global(&self, local: Point) -> Point {
        Point::new(local.x + self.x, local.y + self.y)
    }

    /// A square circumscribing the circle of `radius` around `center`.
    pub fn around(center: Point, radius: f64) -> Rect {
        Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open_on_shared_edge() {
        // Arrange
        let left = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let right = Rect::new(1920.0, 0.0, 1920.0, 1080.0);
        let edge = Point::new(1920.0, 500.0);

        // Assert
        assert!(!left.contains(edge));
        assert!(right.contains(edge));
    }

    #[test]
    fn test_contains_accepts_top_left_corner_and_rejects_bottom_right() {
        let r = Rect::new(-1920.0, 0.0, 1920.0, 1080.0);
        assert!(r.contains(Point::new(-1920.0, 0.0)));
        assert!(!r.contains(Point::new(0.0, 1080.0)));
    }

    #[test]
    fn test_inset_by_shrinks_symmetrically() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0).inset_by(2.0, 2.0);
        assert_eq!(r, Rect::new(2.0, 2.0, 96.0, 46.0));
    }

    #[test]
    fn test_inset_by_never_produces_negative_size() {
        let r = Rect::new(0.0, 0.0, 4.0, 4.0).inset_by(10.0, 10.0);
        assert_eq!(r.width, 0.0);
        assert_eq!(r.height, 0.0);
    }

    #[test]
    fn test_local_and_global_conversion_are_inverse() {
        // Arrange
        let frame = Rect::new(1920.0, -200.0, 2560.0, 1440.0);
        let global = Point::new(2000.0, 100.0);

        // Act
        let local = frame.to_local(global);

        // Assert
        assert_eq!(local, Point::new(80.0, 300.0));
        assert_eq!(frame.to_global(local), global);
    }

    #[test]
    fn test_around_builds_square_centred_on_point() {
        let r = Rect::around(Point::new(500.0, 500.0), 120.0);
        assert_eq!(r, Rect::new(380.0, 380.0, 240.0, 240.0));
        assert_eq!(r.center(), Point::new(500.0, 500.0));
    }
}
