//! The `Shape` trait consumed by the composition engine.

use crate::types::{BoundingBox, Ray};
use crate::Style;

/// A closed 2D shape the composition engine can place and clip.
///
/// `generate` yields the outline ring in world space; `children` yields
/// nested shapes (holes, sub-pieces, the polygons of a baked sub-stamp).
/// A shape with an empty outline and children is a pure container.
pub trait Shape {
    /// Ordered outline vertices in world space. Open rings are treated
    /// as closed by the clipper.
    fn generate(&self) -> Vec<Ray>;

    /// Nested shapes, each already in world space relative to this
    /// shape's center.
    fn children(&self) -> Vec<Box<dyn Shape>> {
        Vec::new()
    }

    /// World-space bounds of the outline and all children.
    fn bounding_box(&self) -> BoundingBox {
        let mut b = BoundingBox::of_points(self.generate().iter().map(|r| r.point()));
        for child in self.children() {
            b = b.union(child.bounding_box());
        }
        b
    }

    fn center(&self) -> Ray;

    fn set_center(&mut self, center: Ray);

    fn style(&self) -> Option<&Style>;

    fn set_style(&mut self, style: Option<Style>);

    /// Hidden shapes occupy layout space but are excluded from
    /// composition.
    fn hidden(&self) -> bool;

    fn set_hidden(&mut self, hidden: bool);

    fn clone_shape(&self) -> Box<dyn Shape>;
}

/// Collect every closed ring of a shape: its own outline plus all
/// descendant outlines, depth-first.
pub fn collect_rings(shape: &dyn Shape) -> Vec<Vec<Ray>> {
    let mut rings = Vec::new();
    let outline = shape.generate();
    if outline.len() >= 3 {
        rings.push(outline);
    }
    for child in shape.children() {
        rings.extend(collect_rings(child.as_ref()));
    }
    rings
}

/// Combined bounds of a set of shapes.
pub fn shapes_bounding_box(shapes: &[Box<dyn Shape>]) -> BoundingBox {
    shapes
        .iter()
        .fold(BoundingBox::EMPTY, |acc, s| acc.union(s.bounding_box()))
}
