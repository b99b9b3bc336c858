//! Free-form polygons: both a drawable primitive and the output node
//! type of the composition engine.

use serde::{Deserialize, Serialize};

use crate::shape::Shape;
use crate::types::{BoundingBox, Ray};
use crate::Style;

/// A closed polygon with optional hole/nesting children.
///
/// As a primitive, `points` are local vertices around `center`. As a
/// composition result, `center` is the origin and `points` are
/// absolute; `children` then form the clipper's nesting tree (a direct
/// child of a filled polygon is a hole, a child of a hole is an
/// island, and so on). A polygon owns its children exclusively.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub center: Ray,
    pub points: Vec<Ray>,
    #[serde(default)]
    pub is_hole: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Polygon>,
    #[serde(default)]
    pub hidden: bool,
}

impl Polygon {
    pub fn new(center: Ray, points: Vec<Ray>) -> Self {
        Self {
            center,
            points,
            ..Self::default()
        }
    }

    /// Number of polygons in this subtree, counting self.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Polygon::count).sum::<usize>()
    }

    /// Translate this polygon and every descendant.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.translate(dx, dy);
        }
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }

    /// Signed-free area of the outline ring (shoelace, absolute).
    pub fn area(&self) -> f64 {
        let pts = &self.points;
        if pts.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..pts.len() {
            let a = &pts[i];
            let b = &pts[(i + 1) % pts.len()];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum * 0.5).abs()
    }
}

impl Shape for Polygon {
    fn generate(&self) -> Vec<Ray> {
        self.points
            .iter()
            .map(|p| {
                let q = p.point().rotated(self.center.direction);
                Ray::new(q.x + self.center.x, q.y + self.center.y, 0.0)
            })
            .collect()
    }

    fn children(&self) -> Vec<Box<dyn Shape>> {
        self.children
            .iter()
            .map(|c| {
                // Children inherit the parent's placement.
                let mut child = c.clone();
                child.center.x += self.center.x;
                child.center.y += self.center.y;
                child.center.direction += self.center.direction;
                Box::new(child) as Box<dyn Shape>
            })
            .collect()
    }

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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::new(
            Ray::default(),
            vec![
                Ray::new(0.0, 0.0, 0.0),
                Ray::new(1.0, 0.0, 0.0),
                Ray::new(1.0, 1.0, 0.0),
                Ray::new(0.0, 1.0, 0.0),
            ],
        )
    }

    #[test]
    fn area_of_unit_square() {
        assert!((unit_square().area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn translate_recurses_into_children() {
        let mut poly = unit_square();
        poly.children.push(unit_square());
        poly.translate(5.0, -2.0);
        assert_eq!(poly.points[0].x, 5.0);
        assert_eq!(poly.children[0].points[2].y, -1.0);
    }

    #[test]
    fn generate_applies_center_rotation() {
        let mut poly = unit_square();
        poly.center = Ray::new(10.0, 0.0, std::f64::consts::PI);
        let rays = poly.generate();
        // (1, 1) rotated by pi -> (-1, -1), translated to (9, -1)
        assert!((rays[2].x - 9.0).abs() < 1e-9);
        assert!((rays[2].y + 1.0).abs() < 1e-9);
    }

    #[test]
    fn count_includes_descendants() {
        let mut poly = unit_square();
        poly.children.push(unit_square());
        poly.children[0].children.push(unit_square());
        assert_eq!(poly.count(), 3);
    }
}
