//! Screen geometry.
//!
//! All points handled by the gesture pipeline live in one global coordinate
//! space: origin at the top-left of the primary display, X growing right and
//! Y growing down.  This matches the location reported by Quartz event taps,
//! so event positions need no conversion before classification.

use std::ops::Sub;

/// A position in global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Threshold checks compare against a squared radius so no square root is
    /// taken on the event path.
    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Sub for Point {
    type Output = (f64, f64);

    /// Displacement `(dx, dy)` from `rhs` to `self`.
    fn sub(self, rhs: Point) -> (f64, f64) {
        (self.x - rhs.x, self.y - rhs.y)
    }
}

/// The frame of one display in global screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    /// Platform display identifier (`CGDirectDisplayID` on macOS).
    pub display_id: u32,
    /// Left edge in global coordinates (may be negative).
    pub x: f64,
    /// Top edge in global coordinates (may be negative).
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `true` for the display that owns the menu bar.
    pub is_primary: bool,
}

impl DisplayFrame {
    /// Returns `true` if `point` lies inside this frame.
    ///
    /// The left and top edges are inclusive, the right and bottom exclusive,
    /// so adjacent displays never both claim a shared edge.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Translates a global point into this display's local space
    /// (origin at the display's top-left corner).
    ///
    /// Points outside the frame are translated all the same; they simply land
    /// outside `0..width` / `0..height`.
    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(x: f64, y: f64, w: f64, h: f64) -> DisplayFrame {
        DisplayFrame {
            display_id: 1,
            x,
            y,
            width: w,
            height: h,
            is_primary: true,
        }
    }

    #[test]
    fn test_point_subtraction_yields_displacement() {
        let (dx, dy) = Point::new(40.0, 10.0) - Point::new(100.0, 20.0);
        assert_eq!(dx, -60.0);
        assert_eq!(dy, -10.0);
    }

    #[test]
    fn test_distance_squared_is_not_rooted() {
        assert_eq!(Point::new(3.0, 4.0).distance_squared(Point::default()), 25.0);
    }

    #[test]
    fn test_frame_contains_is_half_open() {
        let f = frame(0.0, 0.0, 1920.0, 1080.0);
        assert!(f.contains(Point::new(0.0, 0.0)));
        assert!(f.contains(Point::new(1919.5, 1079.0)));
        assert!(!f.contains(Point::new(1920.0, 500.0)));
        assert!(!f.contains(Point::new(500.0, 1080.0)));
    }

    #[test]
    fn test_to_local_handles_negative_origin() {
        // A display placed to the left of the primary one.
        let f = frame(-1280.0, 100.0, 1280.0, 800.0);
        assert_eq!(f.to_local(Point::new(-1200.0, 150.0)), Point::new(80.0, 50.0));
    }
}
