//! Builder parameters.
//!
//! Every numeric field is a [`Num`]: either a literal or an expression
//! string handed to the pattern context at execution time. Expressions
//! re-resolve once per grid cell, so a single builder call can draw a
//! non-uniform grid.

use serde::{Deserialize, Serialize};

use burin_geom::Point;

/// A numeric parameter: literal now, or expression later.
///
/// Serializes untagged, so node lists read as plain JSON numbers and
/// strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Num {
    Literal(f64),
    Expr(String),
}

impl Num {
    pub fn lit(value: f64) -> Self {
        Num::Literal(value)
    }

    pub fn expr(text: impl Into<String>) -> Self {
        Num::Expr(text.into())
    }

    /// The literal value, if this is one.
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Num::Literal(v) => Some(*v),
            Num::Expr(_) => None,
        }
    }
}

impl Default for Num {
    fn default() -> Self {
        Num::Literal(0.0)
    }
}

impl From<f64> for Num {
    fn from(v: f64) -> Self {
        Num::Literal(v)
    }
}

impl From<i32> for Num {
    fn from(v: i32) -> Self {
        Num::Literal(f64::from(v))
    }
}

impl From<&str> for Num {
    fn from(s: &str) -> Self {
        Num::Expr(s.to_string())
    }
}

impl From<String> for Num {
    fn from(s: String) -> Self {
        Num::Expr(s)
    }
}

/// An unresolved style: each attribute may itself be an expression
/// (typically a color-index sequence).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_thickness: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_pattern: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_scale: Option<Num>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hatch_angle: Option<Num>,
}

impl StyleSpec {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        for field in [
            &mut self.stroke_color,
            &mut self.stroke_thickness,
            &mut self.fill_color,
            &mut self.hatch_pattern,
            &mut self.hatch_scale,
            &mut self.hatch_angle,
        ]
        .into_iter()
        .flatten()
        {
            f(field);
        }
    }
}

/// The shared parameter contract of every shape-emitting call: local
/// rotation, vertex divisions, anchor alignment, grid repetition with
/// centered-grid spacing, per-cell offsets, a skip predicate, outline
/// carving, and an optional style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub angle: Num,
    /// Zero picks each primitive's natural vertex count.
    pub divisions: Num,
    /// Alignment index, row-major 0..=8 (4 = center).
    pub align: Num,
    pub num_x: Num,
    pub num_y: Num,
    pub spacing_x: Num,
    pub spacing_y: Num,
    pub offset_x: Num,
    pub offset_y: Num,
    /// Resolving above zero hides the instance: it still occupies its
    /// grid cell but is excluded from composition and style zones.
    pub skip: Num,
    pub outline_thickness: Num,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            angle: Num::default(),
            divisions: Num::default(),
            align: Num::lit(4.0),
            num_x: Num::lit(1.0),
            num_y: Num::lit(1.0),
            spacing_x: Num::default(),
            spacing_y: Num::default(),
            offset_x: Num::default(),
            offset_y: Num::default(),
            skip: Num::default(),
            outline_thickness: Num::default(),
            style: None,
            tag: None,
        }
    }
}

impl GridParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.angle);
        f(&mut self.divisions);
        f(&mut self.align);
        f(&mut self.num_x);
        f(&mut self.num_y);
        f(&mut self.spacing_x);
        f(&mut self.spacing_y);
        f(&mut self.offset_x);
        f(&mut self.offset_y);
        f(&mut self.skip);
        f(&mut self.outline_thickness);
        if let Some(style) = &mut self.style {
            style.visit_nums_mut(f);
        }
    }
}

macro_rules! shape_params {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
            #[serde(flatten)]
            pub grid: GridParams,
        }
    };
}

shape_params! {
    /// Circle, or a ring when `inner_radius` resolves above zero.
    CircleParams {
        radius: Num,
        inner_radius: Num,
    }
}

shape_params! {
    RectangleParams {
        width: Num,
        height: Num,
    }
}

shape_params! {
    EllipseParams {
        radius_x: Num,
        radius_y: Num,
    }
}

shape_params! {
    RoundedRectangleParams {
        width: Num,
        height: Num,
        corner_radius: Num,
    }
}

shape_params! {
    /// Free-form closed polygon from local vertices.
    PolygonParams {
        points: Vec<Point>,
    }
}

shape_params! {
    BoneParams {
        length: Num,
        top_radius: Num,
        bottom_radius: Num,
    }
}

shape_params! {
    /// One piece of the seven-piece square dissection.
    TangramParams {
        width: Num,
        height: Num,
        piece: Num,
    }
}

impl CircleParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.radius);
        f(&mut self.inner_radius);
        self.grid.visit_nums_mut(f);
    }
}

impl RectangleParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.width);
        f(&mut self.height);
        self.grid.visit_nums_mut(f);
    }
}

impl EllipseParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.radius_x);
        f(&mut self.radius_y);
        self.grid.visit_nums_mut(f);
    }
}

impl RoundedRectangleParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.width);
        f(&mut self.height);
        f(&mut self.corner_radius);
        self.grid.visit_nums_mut(f);
    }
}

impl PolygonParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        self.grid.visit_nums_mut(f);
    }
}

impl BoneParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.length);
        f(&mut self.top_radius);
        f(&mut self.bottom_radius);
        self.grid.visit_nums_mut(f);
    }
}

impl TangramParams {
    pub(crate) fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        f(&mut self.width);
        f(&mut self.height);
        f(&mut self.piece);
        self.grid.visit_nums_mut(f);
    }
}
