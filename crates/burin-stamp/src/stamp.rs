//! The deferred-command shape builder.

use burin_geom::{Point, Polygon, Ray, Shape, ShapeAlignment, Style};
use burin_sequence::PatternContext;

use crate::bake::{execute, BakeState};
use crate::expand;
use crate::node::{self, Node, StampParams};
use crate::params::{
    BoneParams, CircleParams, EllipseParams, GridParams, Num, PolygonParams, RectangleParams,
    RoundedRectangleParams, StyleSpec, TangramParams,
};
use crate::resolver;
use crate::zones;

/// A deferred-command shape builder.
///
/// Fluent calls only record nodes; nothing executes until [`bake`]
/// (idempotent unless forced through [`rebake`]). Baking expands
/// macros, interprets the node list against a fresh bake state,
/// flattens the boolean accumulator into a polygon tree, applies
/// break-apart passes and style zones, and finally shifts everything
/// by the stamp's alignment offset.
///
/// Cloning a stamp copies the serialized node list, never the baked
/// result, so each clone re-bakes independently and re-draws its own
/// sequence values.
///
/// [`bake`]: Stamp::bake
/// [`rebake`]: Stamp::rebake
#[derive(Clone, Debug, Default)]
pub struct Stamp {
    center: Ray,
    alignment: ShapeAlignment,
    default_style: Option<StyleSpec>,
    /// Resolved style applied by a parent grid when this stamp is
    /// placed as an instance.
    instance_style: Option<Style>,
    hidden: bool,
    depth: u32,
    nodes: Vec<Node>,
    baked: bool,
    polys: Vec<Polygon>,
    baked_offset: Point,
    cursor: Ray,
}

impl Stamp {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stamp placed at a center ray with an alignment anchor.
    pub fn with_center(center: Ray, alignment: ShapeAlignment) -> Self {
        Self {
            center,
            alignment,
            ..Self::default()
        }
    }

    /// Rebuild a stamp from its serialized node list. Bad input
    /// degrades to an empty stamp (logged).
    pub fn from_string(data: &str) -> Self {
        Self {
            nodes: node::nodes_from_string(data),
            ..Self::default()
        }
    }

    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Serialize the node list to its canonical JSON form.
    pub fn to_string(&self) -> String {
        node::nodes_to_string(&self.nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> &mut Self {
        self.nodes = nodes;
        self.baked = false;
        self
    }

    /// The cursor as of the last bake.
    pub fn cursor(&self) -> Ray {
        self.cursor
    }

    /// The alignment offset applied by the last bake.
    pub fn baked_offset(&self) -> Point {
        self.baked_offset
    }

    pub fn alignment(&self) -> ShapeAlignment {
        self.alignment
    }

    pub(crate) fn set_alignment(&mut self, alignment: ShapeAlignment) {
        self.alignment = alignment;
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    /// Copy another stamp's recorded nodes, discarding any baked state.
    pub fn copy_from(&mut self, other: &Stamp) -> &mut Self {
        self.nodes = other.nodes.clone();
        self.baked = false;
        self
    }

    /// An independent copy built from the serialized node list. The
    /// clone never shares baked state with the original.
    pub fn clone_stamp(&self) -> Stamp {
        let mut clone = Stamp::from_string(&self.to_string());
        clone.center = self.center;
        clone.alignment = self.alignment;
        clone.default_style = self.default_style.clone();
        clone.hidden = self.hidden;
        clone.depth = self.depth;
        clone
    }

    // ========================================================================
    // Recording: state nodes
    // ========================================================================

    pub fn reset(&mut self) -> &mut Self {
        self.push(Node::Reset)
    }

    pub fn default_style(&mut self, style: StyleSpec) -> &mut Self {
        self.push(Node::DefaultStyle { style })
    }

    pub fn add(&mut self) -> &mut Self {
        self.push(Node::Add)
    }

    pub fn subtract(&mut self) -> &mut Self {
        self.push(Node::Subtract)
    }

    pub fn intersect(&mut self) -> &mut Self {
        self.push(Node::Intersect)
    }

    /// Data-driven mode switch: at or below zero subtracts, above
    /// zero unions.
    pub fn boolean(&mut self, value: impl Into<Num>) -> &mut Self {
        self.push(Node::Boolean {
            value: value.into(),
        })
    }

    pub fn break_apart(&mut self) -> &mut Self {
        self.push(Node::BreakApart)
    }

    // ========================================================================
    // Recording: cursor nodes
    // ========================================================================

    pub fn move_to(&mut self, x: impl Into<Num>, y: impl Into<Num>) -> &mut Self {
        self.push(Node::MoveTo {
            x: x.into(),
            y: y.into(),
        })
    }

    /// Offset the cursor by a vector rotated into its heading.
    pub fn move_by(&mut self, x: impl Into<Num>, y: impl Into<Num>) -> &mut Self {
        self.push(Node::Move {
            x: x.into(),
            y: y.into(),
        })
    }

    pub fn forward(&mut self, distance: impl Into<Num>) -> &mut Self {
        self.push(Node::Forward {
            distance: distance.into(),
        })
    }

    pub fn rotate_to(&mut self, degrees: impl Into<Num>) -> &mut Self {
        self.push(Node::RotateTo {
            degrees: degrees.into(),
        })
    }

    pub fn rotate(&mut self, degrees: impl Into<Num>) -> &mut Self {
        self.push(Node::Rotate {
            degrees: degrees.into(),
        })
    }

    /// Pop `steps` cursor snapshots.
    pub fn step_back(&mut self, steps: impl Into<Num>) -> &mut Self {
        self.push(Node::StepBack {
            steps: steps.into(),
        })
    }

    /// Advance a sequence for its side effect at this point of the
    /// program.
    pub fn set(&mut self, statement: impl Into<String>) -> &mut Self {
        self.push(Node::Set {
            statement: statement.into(),
        })
    }

    /// Crop the final result to the given bounds (stamp-local).
    pub fn crop(
        &mut self,
        x: impl Into<Num>,
        y: impl Into<Num>,
        width: impl Into<Num>,
        height: impl Into<Num>,
    ) -> &mut Self {
        self.push(Node::Crop {
            x: x.into(),
            y: y.into(),
            width: width.into(),
            height: height.into(),
        })
    }

    // ========================================================================
    // Recording: shape nodes
    // ========================================================================

    pub fn circle(&mut self, params: CircleParams) -> &mut Self {
        self.push(Node::Circle { params })
    }

    pub fn rectangle(&mut self, params: RectangleParams) -> &mut Self {
        self.push(Node::Rectangle { params })
    }

    pub fn ellipse(&mut self, params: EllipseParams) -> &mut Self {
        self.push(Node::Ellipse { params })
    }

    pub fn rounded_rectangle(&mut self, params: RoundedRectangleParams) -> &mut Self {
        self.push(Node::RoundedRectangle { params })
    }

    pub fn polygon(&mut self, params: PolygonParams) -> &mut Self {
        self.push(Node::Polygon { params })
    }

    pub fn bone(&mut self, params: BoneParams) -> &mut Self {
        self.push(Node::Bone { params })
    }

    pub fn tangram(&mut self, params: TangramParams) -> &mut Self {
        self.push(Node::Tangram { params })
    }

    /// Nest another stamp: one child instance per grid cell, baked
    /// against the same pattern context one depth level down.
    pub fn stamp(&mut self, sub: &Stamp, grid: GridParams) -> &mut Self {
        self.push(Node::SubStamp {
            params: StampParams {
                nodes: sub.nodes.clone(),
                grid,
            },
        })
    }

    /// Record a macro marker duplicating the preceding `steps` nodes
    /// `times` times at bake.
    pub fn repeat_last(&mut self, steps: usize, times: impl Into<Num>) -> &mut Self {
        self.push(Node::RepeatLast {
            steps,
            times: times.into(),
        })
    }

    fn push(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    // ========================================================================
    // Node-list edits
    // ========================================================================

    /// Remove every node carrying `tag`, shrinking the step counts of
    /// later macro markers to match.
    pub fn remove_tag(&mut self, tag: &str) -> &mut Self {
        let mut i = self.nodes.len();
        while i > 0 {
            i -= 1;
            if self.nodes[i].tag() == Some(tag) {
                self.nodes.remove(i);
                for node in &mut self.nodes[i..] {
                    if let Node::RepeatLast { steps, .. } = node {
                        *steps = steps.saturating_sub(1);
                    }
                }
            }
        }
        self
    }

    /// Set the skip predicate of every node carrying `tag`.
    pub fn skip_tag(&mut self, tag: &str, condition: impl Into<Num>) -> &mut Self {
        let condition = condition.into();
        for node in &mut self.nodes {
            if node.tag() == Some(tag) {
                if let Some(grid) = node.grid_mut() {
                    grid.skip = condition.clone();
                }
            }
        }
        self
    }

    /// Rewrite sequence references in recorded expressions from one
    /// alias to another.
    pub fn replace_variable(&mut self, old: &str, new: &str) -> &mut Self {
        let old_call = format!("{old}()");
        let new_call = format!("{new}()");
        for node in &mut self.nodes {
            node.visit_nums_mut(&mut |num| {
                if let Num::Expr(text) = num {
                    if text == old {
                        *text = new.to_string();
                    } else if *text == old_call {
                        *text = new_call.clone();
                    }
                }
            });
        }
        self
    }

    /// Append a copy of another stamp's node list.
    pub fn extend(&mut self, other: &Stamp) -> &mut Self {
        self.nodes.extend(other.nodes.iter().cloned());
        self
    }

    // ========================================================================
    // Baking
    // ========================================================================

    /// Bake if not already baked.
    pub fn bake(&mut self, ctx: &mut PatternContext) -> &mut Self {
        if !self.baked {
            self.rebake(ctx);
        }
        self
    }

    /// Run the full bake pipeline unconditionally: expand macros,
    /// execute nodes, crop, flatten, break apart, map style zones,
    /// apply the alignment offset.
    pub fn rebake(&mut self, ctx: &mut PatternContext) -> &mut Self {
        self.baked = true;

        let expanded = expand::expand(&self.nodes, ctx, self.depth);
        let mut state = BakeState::new(ctx, self.center, self.depth, self.default_style.clone());
        execute(&expanded, &mut state);

        if let Some(crop) = state.crop {
            if crop.width > 0.0 && crop.height > 0.0 {
                let mut region = crop;
                region.x += self.center.x;
                region.y += self.center.y;
                state.acc.intersect(&crate::clip::rect_region(region));
            }
        }

        let mut arena = state.acc.flatten();
        for _ in 0..state.break_aparts {
            arena.break_apart();
        }

        let depth = state.depth;
        let default_style = state
            .default_style
            .clone()
            .map(|spec| resolver::resolve_style(state.ctx, &spec, depth));
        zones::apply_style_zones(&mut arena, &mut state.zones, default_style.as_ref());

        let bounds = arena.total_bounds();
        let offset = if bounds.is_empty() {
            Point::ZERO
        } else {
            self.alignment.offset(bounds.width, bounds.height)
        };
        arena.translate_all(offset.x, offset.y);

        self.baked_offset = offset;
        self.cursor = state.cursor;
        self.polys = arena.to_polygons();
        self
    }

    /// The baked polygon tree, baking on first access.
    pub fn polygons(&mut self, ctx: &mut PatternContext) -> &[Polygon] {
        self.bake(ctx);
        &self.polys
    }

    /// The baked polygon tree without triggering a bake.
    pub fn baked_polygons(&self) -> &[Polygon] {
        &self.polys
    }

    pub fn is_baked(&self) -> bool {
        self.baked
    }
}

/// A baked stamp acts as a compound shape: no outline of its own, its
/// polygons as children placed through the stamp's center.
///
/// The shape view assumes the stamp was baked at the origin (the
/// nested-stamp path does this); the center then carries the full
/// placement.
impl Shape for Stamp {
    fn generate(&self) -> Vec<Ray> {
        Vec::new()
    }

    fn children(&self) -> Vec<Box<dyn Shape>> {
        self.polys
            .iter()
            .map(|p| {
                let mut poly = p.clone();
                poly.center.x += self.center.x;
                poly.center.y += self.center.y;
                poly.center.direction += self.center.direction;
                Box::new(poly) as Box<dyn Shape>
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
        self.instance_style.as_ref()
    }

    fn set_style(&mut self, style: Option<Style>) {
        self.instance_style = style;
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
