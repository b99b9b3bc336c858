//! Node execution against an explicit bake state.
//!
//! Phase two of the pipeline: the expanded node list is interpreted
//! left to right, mutating the cursor, the boolean mode, and the clip
//! accumulator in strict program order. Shape nodes resolve every
//! numeric parameter per grid cell and feed visible instances to the
//! clipper.

use std::f64::consts::TAU;

use burin_geom::{
    normalize_angle, to_radians, Bone, BoundingBox, Circle, Ellipse, Point, Polygon as GeomPolygon,
    Ray, Rectangle, RoundedRectangle, Shape, ShapeAlignment, TangramPiece, collect_rings,
};
use burin_sequence::PatternContext;

use crate::clip;
use crate::node::{Node, StampParams};
use crate::params::{
    BoneParams, CircleParams, EllipseParams, GridParams, Num, PolygonParams, RectangleParams,
    RoundedRectangleParams, StyleSpec, TangramParams,
};
use crate::resolver;
use crate::stamp::Stamp;
use crate::zones::StyleZone;

/// The boolean mode applied to subsequent shape nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BoolMode {
    #[default]
    Union,
    Subtract,
    Intersect,
}

/// Everything one bake mutates, kept off the stamp itself so execution
/// is a plain function of (nodes, state).
pub(crate) struct BakeState<'a> {
    pub ctx: &'a mut PatternContext,
    pub depth: u32,
    pub center: Ray,
    pub cursor: Ray,
    pub history: Vec<Ray>,
    pub mode: BoolMode,
    pub acc: clip::Accumulator,
    pub zones: Vec<StyleZone>,
    pub default_style: Option<StyleSpec>,
    pub break_aparts: u32,
    pub crop: Option<BoundingBox>,
}

impl<'a> BakeState<'a> {
    pub fn new(
        ctx: &'a mut PatternContext,
        center: Ray,
        depth: u32,
        default_style: Option<StyleSpec>,
    ) -> Self {
        Self {
            ctx,
            depth,
            center,
            cursor: Ray::default(),
            history: Vec::new(),
            mode: BoolMode::Union,
            acc: clip::Accumulator::new(),
            zones: Vec::new(),
            default_style,
            break_aparts: 0,
            crop: None,
        }
    }

    fn resolve(&mut self, num: &Num) -> f64 {
        resolver::resolve_num(self.ctx, num, self.depth)
    }

    fn resolve_count(&mut self, num: &Num) -> usize {
        resolver::resolve_count(self.ctx, num, self.depth)
    }

    fn push_cursor(&mut self) {
        self.history.push(self.cursor);
    }
}

pub(crate) fn execute(nodes: &[Node], state: &mut BakeState) {
    for node in nodes {
        exec_node(node, state);
    }
}

fn exec_node(node: &Node, state: &mut BakeState) {
    match node {
        Node::Reset => {
            state.cursor = Ray::default();
            state.history.clear();
            state.mode = BoolMode::Union;
            state.acc.clear();
            state.zones.clear();
            state.break_aparts = 0;
            state.crop = None;
        }
        Node::DefaultStyle { style } => state.default_style = Some(style.clone()),
        Node::Add => state.mode = BoolMode::Union,
        Node::Subtract => state.mode = BoolMode::Subtract,
        Node::Intersect => state.mode = BoolMode::Intersect,
        Node::Boolean { value } => {
            let v = state.resolve(value);
            state.mode = if v <= 0.0 {
                BoolMode::Subtract
            } else {
                BoolMode::Union
            };
        }
        Node::BreakApart => state.break_aparts += 1,
        Node::MoveTo { x, y } => {
            state.push_cursor();
            state.cursor.x = state.resolve(x);
            state.cursor.y = state.resolve(y);
        }
        Node::Move { x, y } => {
            state.push_cursor();
            let v = Point::new(state.resolve(x), state.resolve(y)).rotated(state.cursor.direction);
            state.cursor.x += v.x;
            state.cursor.y += v.y;
        }
        Node::Forward { distance } => {
            state.push_cursor();
            let d = state.resolve(distance);
            state.cursor.x += state.cursor.direction.sin() * d;
            state.cursor.y -= state.cursor.direction.cos() * d;
        }
        Node::RotateTo { degrees } => {
            state.push_cursor();
            state.cursor.direction = to_radians(state.resolve(degrees));
        }
        Node::Rotate { degrees } => {
            state.push_cursor();
            state.cursor.direction =
                normalize_angle(state.cursor.direction + to_radians(state.resolve(degrees)));
        }
        Node::StepBack { steps } => {
            let n = state.resolve_count(steps);
            for _ in 0..n {
                match state.history.pop() {
                    Some(c) => state.cursor = c,
                    None => break,
                }
            }
        }
        Node::Set { statement } => {
            // Advance the named sequence for its side effect; a plain
            // alias gets call parentheses appended.
            let call = if statement.contains("()") {
                statement.clone()
            } else {
                format!("{statement}()")
            };
            let depth = state.depth;
            state.ctx.resolve(&call, depth);
            state.push_cursor();
        }
        Node::Crop { x, y, width, height } => {
            state.crop = Some(BoundingBox::new(
                state.resolve(x),
                state.resolve(y),
                state.resolve(width),
                state.resolve(height),
            ));
        }
        Node::Circle { params } => exec_circle(state, params),
        Node::Rectangle { params } => exec_rectangle(state, params),
        Node::Ellipse { params } => exec_ellipse(state, params),
        Node::RoundedRectangle { params } => exec_rounded_rectangle(state, params),
        Node::Polygon { params } => exec_polygon(state, params),
        Node::Bone { params } => exec_bone(state, params),
        Node::Tangram { params } => exec_tangram(state, params),
        Node::SubStamp { params } => exec_substamp(state, params),
        // Markers are rewritten away during expansion; a leftover one
        // (expansion hit the node cap) is inert.
        Node::RepeatLast { .. } => {}
    }
}

// ============================================================================
// Grid emission
// ============================================================================

/// Emit one shape per grid cell and feed the batch to the clipper.
/// Every numeric parameter re-resolves per cell; grid dimensions and
/// spacing resolve once per node.
fn emit_grid<'a, F>(state: &mut BakeState<'a>, grid: &GridParams, mut build: F)
where
    F: FnMut(&mut BakeState<'a>, Ray, ShapeAlignment, usize) -> Option<Box<dyn Shape>>,
{
    let nx = state.resolve_count(&grid.num_x);
    let ny = state.resolve_count(&grid.num_y);
    let spx = state.resolve(&grid.spacing_x);
    let spy = state.resolve(&grid.spacing_y);
    let outline = state.resolve(&grid.outline_thickness);
    let gx = nx.saturating_sub(1) as f64 * spx * 0.5;
    let gy = ny.saturating_sub(1) as f64 * spy * 0.5;

    let mut shapes: Vec<Box<dyn Shape>> = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let ox = state.resolve(&grid.offset_x);
            let oy = state.resolve(&grid.offset_y);
            let angle = to_radians(state.resolve(&grid.angle));
            let align = ShapeAlignment::from_index(state.resolve(&grid.align) as i64);
            let divisions = state.resolve_count(&grid.divisions);
            let cell = Ray::new(
                spx * i as f64 - gx + ox,
                spy * j as f64 - gy + oy,
                angle,
            );
            let Some(mut shape) = build(state, cell, align, divisions) else {
                continue;
            };
            if state.resolve(&grid.skip) > 0.0 {
                shape.set_hidden(true);
            }
            if let Some(spec) = &grid.style {
                let style = resolver::resolve_style(state.ctx, spec, state.depth);
                shape.set_style(Some(style));
            }
            shapes.push(shape);
        }
    }
    make(state, shapes, outline);
}

/// Transform instances into world space, record style zones, and fold
/// each visible instance into the accumulator under the current mode.
pub(crate) fn make(state: &mut BakeState, shapes: Vec<Box<dyn Shape>>, outline_thickness: f64) {
    for mut shape in shapes {
        let mut c = shape.center();
        c.x += state.center.x + state.cursor.x;
        c.y += state.center.y + state.cursor.y;
        c.direction += state.center.direction + state.cursor.direction;
        shape.set_center(c);

        let visible = !shape.hidden();
        if visible && state.mode == BoolMode::Union {
            if let Some(style) = shape.style() {
                if !style.is_default() {
                    state.zones.push(StyleZone {
                        bounds: shape.bounding_box(),
                        style: style.clone(),
                    });
                }
            }
        }
        if !visible {
            continue;
        }
        let bounds = shape.bounding_box();
        if bounds.is_empty() || bounds.width == 0.0 || bounds.height == 0.0 {
            continue;
        }
        let rings = collect_rings(shape.as_ref());
        let Some(instance) = clip::self_union(&rings) else {
            continue;
        };

        match state.mode {
            BoolMode::Union => {
                if state.acc.is_empty() {
                    state.acc.seed(instance);
                } else {
                    if outline_thickness > 0.0 {
                        // Carve a gap so touching shapes keep visually
                        // separate outlines, then union the shape in.
                        if let Some(dilated) = clip::dilate(&instance, outline_thickness) {
                            state.acc.subtract(&dilated);
                        }
                    }
                    state.acc.union(&instance);
                }
            }
            BoolMode::Subtract => state.acc.subtract(&instance),
            BoolMode::Intersect => state.acc.intersect(&instance),
        }
    }
}

// ============================================================================
// Shape nodes
// ============================================================================

fn exec_circle(state: &mut BakeState, params: &CircleParams) {
    emit_grid(state, &params.grid, |state, cell, align, divisions| {
        let r = resolver::resolve_num(state.ctx, &params.radius, state.depth);
        let inner = resolver::resolve_num(state.ctx, &params.inner_radius, state.depth);
        let divisions = if divisions == 0 {
            Circle::DEFAULT_DIVISIONS
        } else {
            divisions
        };
        if inner > 0.0 && inner < r {
            Some(Box::new(annulus(cell, align, r, inner, divisions)))
        } else {
            let mut c = Circle::new(cell, r);
            c.divisions = divisions;
            c.alignment = align;
            Some(Box::new(c))
        }
    });
}

/// A ring: outer circle with a hole child, resolved by the even-odd
/// self-union.
fn annulus(cell: Ray, align: ShapeAlignment, radius: f64, inner: f64, divisions: usize) -> GeomPolygon {
    let offset = align.offset(radius * 2.0, radius * 2.0);
    let ring = |rad: f64| -> Vec<Ray> {
        (0..divisions)
            .map(|i| {
                let a = TAU * i as f64 / divisions as f64;
                Ray::new(rad * a.cos() + offset.x, rad * a.sin() + offset.y, 0.0)
            })
            .collect()
    };
    let mut hole = GeomPolygon::new(Ray::default(), ring(inner));
    hole.is_hole = true;
    let mut outer = GeomPolygon::new(cell, ring(radius));
    outer.children.push(hole);
    outer
}

fn exec_rectangle(state: &mut BakeState, params: &RectangleParams) {
    emit_grid(state, &params.grid, |state, cell, align, _| {
        let w = resolver::resolve_num(state.ctx, &params.width, state.depth);
        let h = resolver::resolve_num(state.ctx, &params.height, state.depth);
        let mut r = Rectangle::new(cell, w, h);
        r.alignment = align;
        Some(Box::new(r))
    });
}

fn exec_ellipse(state: &mut BakeState, params: &EllipseParams) {
    emit_grid(state, &params.grid, |state, cell, align, divisions| {
        let rx = resolver::resolve_num(state.ctx, &params.radius_x, state.depth);
        let ry = resolver::resolve_num(state.ctx, &params.radius_y, state.depth);
        let mut e = Ellipse::new(cell, rx, ry);
        if divisions > 0 {
            e.divisions = divisions;
        }
        e.alignment = align;
        Some(Box::new(e))
    });
}

fn exec_rounded_rectangle(state: &mut BakeState, params: &RoundedRectangleParams) {
    emit_grid(state, &params.grid, |state, cell, align, divisions| {
        let w = resolver::resolve_num(state.ctx, &params.width, state.depth);
        let h = resolver::resolve_num(state.ctx, &params.height, state.depth);
        let cr = resolver::resolve_num(state.ctx, &params.corner_radius, state.depth);
        let mut r = RoundedRectangle::new(cell, w, h, cr);
        if divisions > 0 {
            r.divisions = divisions;
        }
        r.alignment = align;
        Some(Box::new(r))
    });
}

fn exec_polygon(state: &mut BakeState, params: &PolygonParams) {
    if params.points.len() < 3 {
        return;
    }
    emit_grid(state, &params.grid, |_state, cell, _align, _| {
        let points = params
            .points
            .iter()
            .map(|p| Ray::new(p.x, p.y, 0.0))
            .collect();
        Some(Box::new(GeomPolygon::new(cell, points)))
    });
}

fn exec_bone(state: &mut BakeState, params: &BoneParams) {
    emit_grid(state, &params.grid, |state, cell, align, divisions| {
        let length = resolver::resolve_num(state.ctx, &params.length, state.depth);
        let top = resolver::resolve_num(state.ctx, &params.top_radius, state.depth);
        let bottom = resolver::resolve_num(state.ctx, &params.bottom_radius, state.depth);
        let mut b = Bone::new(cell, length, top, bottom);
        if divisions > 0 {
            b.divisions = divisions;
        }
        b.alignment = align;
        Some(Box::new(b))
    });
}

fn exec_tangram(state: &mut BakeState, params: &TangramParams) {
    emit_grid(state, &params.grid, |state, cell, align, _| {
        let w = resolver::resolve_num(state.ctx, &params.width, state.depth);
        let h = resolver::resolve_num(state.ctx, &params.height, state.depth);
        let piece = resolver::resolve_count(state.ctx, &params.piece, state.depth);
        let mut t = TangramPiece::new(cell, w, h, piece);
        t.alignment = align;
        Some(Box::new(t))
    });
}

fn exec_substamp(state: &mut BakeState, params: &StampParams) {
    if params.nodes.is_empty() {
        return;
    }
    emit_grid(state, &params.grid, |state, cell, align, _| {
        // The child bakes at the origin against the same context (one
        // nesting level deeper); placement happens through its center
        // like any other shape instance.
        let mut child = Stamp::from_nodes(params.nodes.clone());
        child.set_alignment(align);
        child.set_depth(state.depth + 1);
        child.bake(state.ctx);
        child.set_center(cell);
        Some(Box::new(child))
    });
}
