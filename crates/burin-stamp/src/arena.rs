//! Index-based polygon arena.
//!
//! The flattened boolean result is a tree (outer rings, hole children,
//! nested islands). Holding the nodes in one arena and referencing
//! them by index keeps `break_apart` and style mapping as simple index
//! passes, with the owned tree materialized once at the end of a bake.

use burin_geom::{BoundingBox, Polygon, Ray, Style};

/// One polygon ring in the arena.
#[derive(Clone, Debug)]
pub struct PolyNode {
    pub points: Vec<Ray>,
    pub is_hole: bool,
    pub style: Option<Style>,
    pub children: Vec<usize>,
}

impl PolyNode {
    pub fn new(points: Vec<Ray>, is_hole: bool) -> Self {
        Self {
            points,
            is_hole,
            style: None,
            children: Vec::new(),
        }
    }
}

/// Arena of polygon nodes plus the current root set.
#[derive(Clone, Debug, Default)]
pub struct PolyArena {
    nodes: Vec<PolyNode>,
    roots: Vec<usize>,
}

impl PolyArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: PolyNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn add_child(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
    }

    pub fn add_root(&mut self, index: usize) {
        self.roots.push(index);
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, index: usize) -> &PolyNode {
        &self.nodes[index]
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn set_style(&mut self, index: usize, style: Option<Style>) {
        self.nodes[index].style = style;
    }

    /// Outline bounds of one node (children not included).
    pub fn bounds(&self, index: usize) -> BoundingBox {
        BoundingBox::of_points(self.nodes[index].points.iter().map(|r| r.point()))
    }

    /// Replace every parented root by its leaf descendants, discarding
    /// the intermediate grouping. Idempotent once all roots are leaves.
    pub fn break_apart(&mut self) {
        let mut new_roots = Vec::with_capacity(self.roots.len());
        for &root in &self.roots {
            if self.nodes[root].children.is_empty() {
                new_roots.push(root);
            } else {
                self.collect_leaves(root, &mut new_roots);
            }
        }
        self.roots = new_roots;
    }

    fn collect_leaves(&self, index: usize, out: &mut Vec<usize>) {
        let node = &self.nodes[index];
        if node.children.is_empty() {
            out.push(index);
        } else {
            for &child in &node.children {
                self.collect_leaves(child, out);
            }
        }
    }

    /// Translate every node in the arena.
    pub fn translate_all(&mut self, dx: f64, dy: f64) {
        for node in &mut self.nodes {
            for p in &mut node.points {
                p.translate(dx, dy);
            }
        }
    }

    /// Combined bounds of the current roots' subtrees.
    pub fn total_bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::EMPTY;
        for &root in &self.roots {
            self.subtree_bounds(root, &mut b);
        }
        b
    }

    fn subtree_bounds(&self, index: usize, acc: &mut BoundingBox) {
        *acc = acc.union(self.bounds(index));
        for &child in &self.nodes[index].children {
            self.subtree_bounds(child, acc);
        }
    }

    /// Materialize the current roots as an owned polygon tree.
    pub fn to_polygons(&self) -> Vec<Polygon> {
        self.roots.iter().map(|&i| self.build(i)).collect()
    }

    fn build(&self, index: usize) -> Polygon {
        let node = &self.nodes[index];
        Polygon {
            center: Ray::default(),
            points: node.points.clone(),
            is_hole: node.is_hole,
            style: node.style.clone(),
            children: node.children.iter().map(|&c| self.build(c)).collect(),
            hidden: false,
        }
    }
}
