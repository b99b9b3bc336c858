//! # burin-stamp - Deferred-Command Shape Composition
//!
//! The composition engine of burin: a fluent builder records command
//! nodes, and baking interprets them into one boolean-composed polygon
//! tree.
//!
//! ## Pipeline
//!
//! ```text
//! fluent calls ──► node list ──► expand macros ──► execute ──► clipper
//!                                                                │
//!        polygons ◄── align ◄── style zones ◄── break apart ◄── flatten
//! ```
//!
//! Two explicit phases keep the engine testable: macro expansion is a
//! pure rewrite of the node list, and execution folds the flat list
//! into an explicit bake state (cursor, mode, accumulator, zones) via
//! the external boolean clipper. Almost every numeric parameter is a
//! [`Num`] resolved through a [`burin_sequence::PatternContext`] at
//! execution time, once per grid cell.
//!
//! Failure policy: clipper errors, malformed statements, and runaway
//! macros all degrade (logged, partial result); a bake never aborts.

mod arena;
mod bake;
mod clip;
mod expand;
mod node;
mod params;
mod resolver;
mod stamp;
mod zones;

pub use arena::{PolyArena, PolyNode};
pub use expand::MAX_NODES;
pub use node::{nodes_from_string, nodes_to_string, Node, StampParams};
pub use params::{
    BoneParams, CircleParams, EllipseParams, GridParams, Num, PolygonParams, RectangleParams,
    RoundedRectangleParams, StyleSpec, TangramParams,
};
pub use resolver::{resolve_count, resolve_num, resolve_style};
pub use stamp::Stamp;
pub use zones::{StyleZone, ZONE_TOLERANCE};
