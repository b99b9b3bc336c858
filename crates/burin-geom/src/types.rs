//! Core geometric types.

use serde::{Deserialize, Serialize};

/// A point in 2D space (y-down).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotate about the origin by `angle` radians.
    #[inline]
    pub fn rotated(self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A point with a heading: the turtle-cursor state and the vertex type
/// fed to the clipper.
///
/// Heading zero points up (-y); positive headings turn clockwise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub direction: f64,
}

impl Ray {
    #[inline]
    pub const fn new(x: f64, y: f64, direction: f64) -> Self {
        Self { x, y, direction }
    }

    #[inline]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }
}

impl From<Point> for Ray {
    fn from(p: Point) -> Self {
        Ray::new(p.x, p.y, 0.0)
    }
}

/// Normalize an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(std::f64::consts::TAU)
}

/// Degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// An axis-aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const ZERO: BoundingBox = BoundingBox { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };
    pub const EMPTY: BoundingBox = BoundingBox {
        x: f64::INFINITY,
        y: f64::INFINITY,
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn min_x(self) -> f64 { self.x }
    #[inline]
    pub fn min_y(self) -> f64 { self.y }
    #[inline]
    pub fn max_x(self) -> f64 { self.x + self.width }
    #[inline]
    pub fn max_y(self) -> f64 { self.y + self.height }

    #[inline]
    pub fn center(self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[inline]
    pub fn area(self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.width * self.height
    }

    /// Check if the box is the EMPTY sentinel (used for folding).
    #[inline]
    pub fn is_empty(self) -> bool {
        // Only the sentinel is empty; zero-area boxes at valid positions are not
        self.x.is_infinite()
    }

    /// Expand the box to include a point.
    #[inline]
    pub fn include_point(&mut self, p: Point) {
        if self.is_empty() {
            self.x = p.x;
            self.y = p.y;
            self.width = 0.0;
            self.height = 0.0;
        } else {
            let min_x = self.x.min(p.x);
            let min_y = self.y.min(p.y);
            let max_x = self.max_x().max(p.x);
            let max_y = self.max_y().max(p.y);
            self.x = min_x;
            self.y = min_y;
            self.width = max_x - min_x;
            self.height = max_y - min_y;
        }
    }

    /// Union of two boxes.
    #[inline]
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        if self.is_empty() { return other; }
        if other.is_empty() { return self; }
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        BoundingBox::new(
            min_x,
            min_y,
            self.max_x().max(other.max_x()) - min_x,
            self.max_y().max(other.max_y()) - min_y,
        )
    }

    /// Bounding box of a set of points.
    pub fn of_points<I: IntoIterator<Item = Point>>(points: I) -> BoundingBox {
        let mut b = BoundingBox::EMPTY;
        for p in points {
            b.include_point(p);
        }
        b
    }

    /// Check if a point is inside the box.
    #[inline]
    pub fn contains_point(self, p: Point) -> bool {
        !self.is_empty()
            && p.x >= self.x
            && p.x <= self.max_x()
            && p.y >= self.y
            && p.y <= self.max_y()
    }

    /// Check if `other` fits inside this box scaled by `tolerance`
    /// about its center (tolerance 1.0 = exact containment).
    pub fn contains_box_within(self, other: BoundingBox, tolerance: f64) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let c = self.center();
        let hw = self.width * 0.5 * tolerance;
        let hh = self.height * 0.5 * tolerance;
        other.min_x() >= c.x - hw
            && other.max_x() <= c.x + hw
            && other.min_y() >= c.y - hh
            && other.max_y() <= c.y + hh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn point_rotated_quarter_turn() {
        // Heading convention: (0, -1) is "up"; rotating by 90 degrees
        // clockwise in y-down space lands on (1, 0).
        let p = Point::new(0.0, -1.0).rotated(std::f64::consts::FRAC_PI_2);
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn normalize_angle_wraps() {
        let a = normalize_angle(-std::f64::consts::PI);
        assert!((a - std::f64::consts::PI).abs() < 1e-9);
        assert!(normalize_angle(std::f64::consts::TAU) < 1e-9);
    }

    #[test]
    fn bbox_include_point() {
        let mut b = BoundingBox::EMPTY;
        b.include_point(Point::new(10.0, 20.0));
        b.include_point(Point::new(30.0, 40.0));
        assert_eq!(b.x, 10.0);
        assert_eq!(b.y, 20.0);
        assert_eq!(b.width, 20.0);
        assert_eq!(b.height, 20.0);
    }

    #[test]
    fn bbox_contains_within_tolerance() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = BoundingBox::new(-2.0, 10.0, 50.0, 50.0);
        // Sticks out 2 units on the left: fails exact, passes 1.1x.
        assert!(!outer.contains_box_within(inner, 1.0));
        assert!(outer.contains_box_within(inner, 1.1));
    }

    #[test]
    fn bbox_area_of_empty_sentinel() {
        assert_eq!(BoundingBox::EMPTY.area(), 0.0);
    }
}
