//! Simple closed shape primitives.
//!
//! Vertex generation here is intentionally plain: primitives only need
//! to hand the composition engine a sensible closed ring. Each carries
//! a center ray (position + local heading), an alignment anchor, a
//! hidden flag, and an optional style.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::alignment::ShapeAlignment;
use crate::shape::Shape;
use crate::types::{Point, Ray};
use crate::Style;

/// Anchor, rotate, and place local outline points around a center ray.
fn place(points: Vec<Point>, align: ShapeAlignment, w: f64, h: f64, center: Ray) -> Vec<Ray> {
    let off = align.offset(w, h);
    points
        .into_iter()
        .map(|p| {
            let q = Point::new(p.x + off.x, p.y + off.y).rotated(center.direction);
            Ray::new(q.x + center.x, q.y + center.y, 0.0)
        })
        .collect()
}

macro_rules! impl_shape_accessors {
    ($ty:ty) => {
        fn center(&self) -> Ray {
            self.center
        }

        fn set_center(&mut self, center: Ray) {
            self.center = center;
        }

        fn style(&self) -> Option<&Style> {
            self.style.as_ref()
        }

        fn set_style(&mut self, style: Option<Style>) {
            self.style = style;
        }

        fn hidden(&self) -> bool {
            self.hidden
        }

        fn set_hidden(&mut self, hidden: bool) {
            self.hidden = hidden;
        }

        fn clone_shape(&self) -> Box<dyn Shape> {
            Box::new(self.clone())
        }
    };
}

/// A circle approximated by `divisions` vertices.
#[derive(Clone, Debug)]
pub struct Circle {
    pub center: Ray,
    pub radius: f64,
    pub divisions: usize,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl Circle {
    pub const DEFAULT_DIVISIONS: usize = 32;

    pub fn new(center: Ray, radius: f64) -> Self {
        Self {
            center,
            radius,
            divisions: Self::DEFAULT_DIVISIONS,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }
}

impl Shape for Circle {
    fn generate(&self) -> Vec<Ray> {
        let n = self.divisions.max(3);
        let points = (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point::new(self.radius * a.cos(), self.radius * a.sin())
            })
            .collect();
        let d = self.radius * 2.0;
        place(points, self.alignment, d, d, self.center)
    }

    impl_shape_accessors!(Circle);
}

/// An axis-aligned ellipse approximated by `divisions` vertices.
#[derive(Clone, Debug)]
pub struct Ellipse {
    pub center: Ray,
    pub radius_x: f64,
    pub radius_y: f64,
    pub divisions: usize,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl Ellipse {
    pub fn new(center: Ray, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center,
            radius_x,
            radius_y,
            divisions: Circle::DEFAULT_DIVISIONS,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }
}

impl Shape for Ellipse {
    fn generate(&self) -> Vec<Ray> {
        let n = self.divisions.max(3);
        let points = (0..n)
            .map(|i| {
                let a = TAU * i as f64 / n as f64;
                Point::new(self.radius_x * a.cos(), self.radius_y * a.sin())
            })
            .collect();
        place(
            points,
            self.alignment,
            self.radius_x * 2.0,
            self.radius_y * 2.0,
            self.center,
        )
    }

    impl_shape_accessors!(Ellipse);
}

/// An axis-aligned rectangle.
#[derive(Clone, Debug)]
pub struct Rectangle {
    pub center: Ray,
    pub width: f64,
    pub height: f64,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl Rectangle {
    pub fn new(center: Ray, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }
}

impl Shape for Rectangle {
    fn generate(&self) -> Vec<Ray> {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let points = vec![
            Point::new(-hw, -hh),
            Point::new(hw, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ];
        place(points, self.alignment, self.width, self.height, self.center)
    }

    impl_shape_accessors!(Rectangle);
}

/// A rectangle with quarter-circle corners, `divisions` segments each.
#[derive(Clone, Debug)]
pub struct RoundedRectangle {
    pub center: Ray,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub divisions: usize,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl RoundedRectangle {
    pub const DEFAULT_CORNER_DIVISIONS: usize = 4;

    pub fn new(center: Ray, width: f64, height: f64, corner_radius: f64) -> Self {
        Self {
            center,
            width,
            height,
            corner_radius,
            divisions: Self::DEFAULT_CORNER_DIVISIONS,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }
}

impl Shape for RoundedRectangle {
    fn generate(&self) -> Vec<Ray> {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        let r = self.corner_radius.clamp(0.0, hw.min(hh));
        let n = self.divisions.max(1);

        // Corner arc centers and start angles, walked clockwise from
        // the top-left corner.
        let corners = [
            (Point::new(-hw + r, -hh + r), PI),
            (Point::new(hw - r, -hh + r), PI + FRAC_PI_2),
            (Point::new(hw - r, hh - r), 0.0),
            (Point::new(-hw + r, hh - r), FRAC_PI_2),
        ];

        let mut points = Vec::with_capacity(corners.len() * (n + 1));
        for (c, start) in corners {
            for i in 0..=n {
                let a = start + FRAC_PI_2 * i as f64 / n as f64;
                points.push(Point::new(c.x + r * a.cos(), c.y + r * a.sin()));
            }
        }
        place(points, self.alignment, self.width, self.height, self.center)
    }

    impl_shape_accessors!(RoundedRectangle);
}

/// Two unequal circular ends joined by their outer tangents.
#[derive(Clone, Debug)]
pub struct Bone {
    pub center: Ray,
    pub length: f64,
    pub top_radius: f64,
    pub bottom_radius: f64,
    pub divisions: usize,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl Bone {
    pub const DEFAULT_ARC_DIVISIONS: usize = 16;

    pub fn new(center: Ray, length: f64, top_radius: f64, bottom_radius: f64) -> Self {
        Self {
            center,
            length,
            top_radius,
            bottom_radius,
            divisions: Self::DEFAULT_ARC_DIVISIONS,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }
}

impl Shape for Bone {
    fn generate(&self) -> Vec<Ray> {
        let h = self.length * 0.5;
        let rt = self.top_radius.max(0.0);
        let rb = self.bottom_radius.max(0.0);
        let n = self.divisions.max(2);

        // Common external tangent touches both circles at the same
        // normal angle t, with sin(t) = (rt - rb) / length.
        let t = if self.length > 0.0 {
            ((rt - rb) / self.length).clamp(-1.0, 1.0).asin()
        } else {
            0.0
        };

        let mut points = Vec::with_capacity(2 * (n + 1));
        // Top arc: right touch point over the top to the left touch point.
        let sweep_top = PI + 2.0 * t;
        for i in 0..=n {
            let a = t - sweep_top * i as f64 / n as f64;
            points.push(Point::new(rt * a.cos(), -h + rt * a.sin()));
        }
        // Bottom arc: left touch point under the bottom back to the right.
        let sweep_bottom = PI - 2.0 * t;
        for i in 0..=n {
            let a = (PI - t) - sweep_bottom * i as f64 / n as f64;
            points.push(Point::new(rb * a.cos(), h + rb * a.sin()));
        }

        let w = 2.0 * rt.max(rb);
        let total_h = self.length + rt + rb;
        place(points, self.alignment, w, total_h, self.center)
    }

    impl_shape_accessors!(Bone);
}

/// One piece of the classic seven-piece square dissection, scaled to
/// fit a `width` x `height` box.
#[derive(Clone, Debug)]
pub struct TangramPiece {
    pub center: Ray,
    pub width: f64,
    pub height: f64,
    /// Piece index 0..=6; out-of-range indices wrap.
    pub piece: usize,
    pub alignment: ShapeAlignment,
    pub hidden: bool,
    pub style: Option<Style>,
}

impl TangramPiece {
    pub const PIECES: usize = 7;

    pub fn new(center: Ray, width: f64, height: f64, piece: usize) -> Self {
        Self {
            center,
            width,
            height,
            piece: piece % Self::PIECES,
            alignment: ShapeAlignment::Center,
            hidden: false,
            style: None,
        }
    }

    /// Unit-square vertices of a piece (0 = large triangle bottom,
    /// 1 = large triangle left, 2 = medium triangle, 3/4 = small
    /// triangles, 5 = square, 6 = parallelogram).
    fn unit_points(piece: usize) -> &'static [(f64, f64)] {
        const LARGE_BOTTOM: &[(f64, f64)] = &[(0.0, 0.0), (1.0, 0.0), (0.5, 0.5)];
        const LARGE_LEFT: &[(f64, f64)] = &[(0.0, 0.0), (0.5, 0.5), (0.0, 1.0)];
        const MEDIUM: &[(f64, f64)] = &[(1.0, 0.5), (1.0, 1.0), (0.5, 1.0)];
        const SMALL_RIGHT: &[(f64, f64)] = &[(1.0, 0.0), (1.0, 0.5), (0.75, 0.25)];
        const SMALL_CENTER: &[(f64, f64)] = &[(0.5, 0.5), (0.75, 0.75), (0.5, 1.0)];
        const SQUARE: &[(f64, f64)] = &[(0.75, 0.25), (1.0, 0.5), (0.75, 0.75), (0.5, 0.5)];
        const PARALLELOGRAM: &[(f64, f64)] =
            &[(0.0, 1.0), (0.25, 0.75), (0.75, 0.75), (0.5, 1.0)];
        match piece % TangramPiece::PIECES {
            0 => LARGE_BOTTOM,
            1 => LARGE_LEFT,
            2 => MEDIUM,
            3 => SMALL_RIGHT,
            4 => SMALL_CENTER,
            5 => SQUARE,
            _ => PARALLELOGRAM,
        }
    }
}

impl Shape for TangramPiece {
    fn generate(&self) -> Vec<Ray> {
        let points = Self::unit_points(self.piece)
            .iter()
            .map(|&(x, y)| Point::new((x - 0.5) * self.width, (y - 0.5) * self.height))
            .collect();
        place(points, self.alignment, self.width, self.height, self.center)
    }

    impl_shape_accessors!(TangramPiece);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn bounds_of(shape: &dyn Shape) -> BoundingBox {
        shape.bounding_box()
    }

    #[test]
    fn circle_bounds() {
        let c = Circle::new(Ray::new(50.0, 50.0, 0.0), 25.0);
        let b = bounds_of(&c);
        assert!((b.x - 25.0).abs() < 0.5);
        assert!((b.width - 50.0).abs() < 1.0);
    }

    #[test]
    fn circle_vertex_count_follows_divisions() {
        let mut c = Circle::new(Ray::default(), 10.0);
        c.divisions = 12;
        assert_eq!(c.generate().len(), 12);
    }

    #[test]
    fn rectangle_corners() {
        let r = Rectangle::new(Ray::new(10.0, 20.0, 0.0), 4.0, 6.0);
        let rays = r.generate();
        assert_eq!(rays.len(), 4);
        assert_eq!(rays[0].x, 8.0);
        assert_eq!(rays[0].y, 17.0);
        assert_eq!(rays[2].x, 12.0);
        assert_eq!(rays[2].y, 23.0);
    }

    #[test]
    fn rectangle_alignment_shifts_outline() {
        let mut r = Rectangle::new(Ray::default(), 10.0, 10.0);
        r.alignment = ShapeAlignment::TopLeft;
        let b = bounds_of(&r);
        assert_eq!(b.max_x(), 0.0);
        assert_eq!(b.max_y(), 0.0);
    }

    #[test]
    fn rounded_rectangle_stays_inside_rect() {
        let rr = RoundedRectangle::new(Ray::default(), 20.0, 10.0, 3.0);
        let b = bounds_of(&rr);
        assert!(b.width <= 20.0 + 1e-9);
        assert!(b.height <= 10.0 + 1e-9);
        assert!(b.width > 19.0);
    }

    #[test]
    fn bone_with_equal_radii_is_a_capsule() {
        let bone = Bone::new(Ray::default(), 20.0, 5.0, 5.0);
        let b = bounds_of(&bone);
        assert!((b.height - 30.0).abs() < 0.5);
        assert!((b.width - 10.0).abs() < 0.5);
    }

    #[test]
    fn tangram_piece_wraps_index() {
        let a = TangramPiece::new(Ray::default(), 10.0, 10.0, 2);
        let b = TangramPiece::new(Ray::default(), 10.0, 10.0, 9);
        assert_eq!(a.generate().len(), b.generate().len());
        assert_eq!(a.piece, b.piece);
    }

    #[test]
    fn tangram_large_pieces_cover_quarter_area() {
        let piece = TangramPiece::new(Ray::default(), 2.0, 2.0, 0);
        let rays = piece.generate();
        let poly = crate::Polygon::new(Ray::default(), rays);
        assert!((poly.area() - 1.0).abs() < 1e-9);
    }
}
