//! # burin-geom - Geometric Foundation for Burin
//!
//! Shared geometry for the procedural composition engine:
//!
//! - **Core types**: `Point`, `Ray` (point + heading), `BoundingBox`
//! - **Alignment**: 3x3 anchor grid with offset computation
//! - **Style**: resolved per-polygon drawing attributes
//! - **Shapes**: the `Shape` trait plus simple closed primitives
//!   (circle, rectangle, ellipse, rounded rectangle, polygon, bone,
//!   tangram piece)
//!
//! Coordinates are y-down (screen space). A heading of zero points up
//! (-y); headings increase clockwise.
//!
//! Vertex generation here is deliberately simple: the composition
//! engine only needs closed rings, bounding boxes, and styles. Anything
//! visually fancy happens downstream of the boolean clipper.

mod types;
mod alignment;
mod style;
mod shape;
mod polygon;
mod primitives;

pub use types::{normalize_angle, to_radians, BoundingBox, Point, Ray};
pub use alignment::ShapeAlignment;
pub use style::Style;
pub use shape::{collect_rings, shapes_bounding_box, Shape};
pub use polygon::Polygon;
pub use primitives::{Bone, Circle, Ellipse, Rectangle, RoundedRectangle, TangramPiece};
