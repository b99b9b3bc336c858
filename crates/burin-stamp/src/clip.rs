//! Boolean composition over the external polygon clipper.
//!
//! Everything `geo`/`geo-buffer` is confined to this module; the rest
//! of the engine sees only `burin-geom` types. Clipper failures are
//! caught and logged, leaving the accumulator at its last good state,
//! so a degenerate shape costs one instance instead of the whole bake.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{BooleanOps, LineString, MultiPolygon, Polygon as GeoPolygon};

use burin_geom::{BoundingBox, Ray};

use crate::arena::{PolyArena, PolyNode};

/// Run one clipper call, converting a panic on degenerate geometry
/// into a logged `None`.
fn guarded<F>(label: &str, f: F) -> Option<MultiPolygon<f64>>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(mp) => Some(mp),
        Err(_) => {
            log::error!("clipper {label} failed; keeping last good result");
            None
        }
    }
}

fn ring_to_geo(ring: &[Ray]) -> GeoPolygon<f64> {
    let coords: Vec<(f64, f64)> = ring.iter().map(|r| (r.x, r.y)).collect();
    GeoPolygon::new(LineString::from(coords), Vec::new())
}

/// Resolve a shape instance's rings into one clean region.
///
/// Rings combine with even-odd semantics (XOR fold): a ring inside
/// another punches a hole, overlapping subpaths cancel. Returns `None`
/// when no usable ring exists or the clipper rejects the geometry.
pub(crate) fn self_union(rings: &[Vec<Ray>]) -> Option<MultiPolygon<f64>> {
    let polys: Vec<GeoPolygon<f64>> = rings
        .iter()
        .filter(|r| r.len() >= 3)
        .map(|r| ring_to_geo(r))
        .collect();
    let (first, rest) = polys.split_first()?;
    let first = MultiPolygon::new(vec![first.clone()]);
    if rest.is_empty() {
        return Some(first);
    }
    guarded("self-union", move || {
        let mut acc = first;
        for p in rest {
            acc = acc.xor(&MultiPolygon::new(vec![p.clone()]));
        }
        acc
    })
}

/// Offset a region outward by `delta` (mitered joins, closed caps).
pub(crate) fn dilate(mp: &MultiPolygon<f64>, delta: f64) -> Option<MultiPolygon<f64>> {
    guarded("offset", || geo_buffer::buffer_multi_polygon(mp, delta))
}

/// An axis-aligned rectangle as a clip region.
pub(crate) fn rect_region(bounds: BoundingBox) -> MultiPolygon<f64> {
    let ring = vec![
        (bounds.min_x(), bounds.min_y()),
        (bounds.max_x(), bounds.min_y()),
        (bounds.max_x(), bounds.max_y()),
        (bounds.min_x(), bounds.max_y()),
    ];
    MultiPolygon::new(vec![GeoPolygon::new(LineString::from(ring), Vec::new())])
}

/// The boolean accumulator a bake folds shape instances into.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    tree: Option<MultiPolygon<f64>>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    pub fn clear(&mut self) {
        self.tree = None;
    }

    /// Install the first region.
    pub fn seed(&mut self, mp: MultiPolygon<f64>) {
        self.tree = Some(mp);
    }

    pub fn union(&mut self, other: &MultiPolygon<f64>) {
        match &self.tree {
            None => self.tree = Some(other.clone()),
            Some(tree) => {
                if let Some(result) = guarded("union", || tree.union(other)) {
                    self.tree = Some(result);
                }
            }
        }
    }

    /// Polygon difference; a no-op while the accumulator is empty.
    pub fn subtract(&mut self, other: &MultiPolygon<f64>) {
        if let Some(tree) = &self.tree {
            if let Some(result) = guarded("difference", || tree.difference(other)) {
                self.tree = Some(result);
            }
        }
    }

    /// Polygon intersection; a no-op while the accumulator is empty.
    pub fn intersect(&mut self, other: &MultiPolygon<f64>) {
        if let Some(tree) = &self.tree {
            if let Some(result) = guarded("intersection", || tree.intersection(other)) {
                self.tree = Some(result);
            }
        }
    }

    /// Flatten the accumulated region into a polygon arena: one root
    /// per outer ring, interior rings as hole children. Islands inside
    /// holes come back from the clipper as their own outer rings and
    /// stay separate roots.
    pub fn flatten(&self) -> PolyArena {
        match &self.tree {
            None => PolyArena::new(),
            Some(mp) => flatten_tree(mp),
        }
    }
}

fn ring_to_rays(ring: &LineString<f64>) -> Vec<Ray> {
    ring.coords().map(|c| Ray::new(c.x, c.y, 0.0)).collect()
}

fn flatten_tree(mp: &MultiPolygon<f64>) -> PolyArena {
    let mut arena = PolyArena::new();
    for poly in mp.0.iter() {
        let outer = arena.push(PolyNode::new(ring_to_rays(poly.exterior()), false));
        for ring in poly.interiors() {
            let hole = arena.push(PolyNode::new(ring_to_rays(ring), true));
            arena.add_child(outer, hole);
        }
        arena.add_root(outer);
    }
    arena
}
