//! Resolving numeric parameters through the pattern context.

use burin_geom::Style;
use burin_sequence::PatternContext;

use crate::params::{Num, StyleSpec};

/// Resolve a parameter at its use site. Hex color literals (`#ff8800`
/// or `0xff8800`) bypass the expression interpreter; everything else
/// goes through [`PatternContext::resolve`].
pub fn resolve_num(ctx: &mut PatternContext, num: &Num, depth: u32) -> f64 {
    match num {
        Num::Literal(v) => *v,
        Num::Expr(text) => resolve_text(ctx, text, depth),
    }
}

fn resolve_text(ctx: &mut PatternContext, text: &str, depth: u32) -> f64 {
    let t = text.trim();
    let hex = t
        .strip_prefix('#')
        .or_else(|| t.strip_prefix("0x"))
        .or_else(|| t.strip_prefix("0X"));
    if let Some(hex) = hex {
        return match i64::from_str_radix(hex, 16) {
            Ok(v) => v as f64,
            Err(_) => {
                log::warn!("bad hex literal '{t}'; using 0");
                0.0
            }
        };
    }
    ctx.resolve(t, depth)
}

/// Resolve a parameter as a count: non-finite or negative values clamp
/// to zero.
pub fn resolve_count(ctx: &mut PatternContext, num: &Num, depth: u32) -> usize {
    let v = resolve_num(ctx, num, depth);
    if v.is_finite() && v > 0.0 {
        v as usize
    } else {
        0
    }
}

/// Resolve every attribute of a style spec.
pub fn resolve_style(ctx: &mut PatternContext, spec: &StyleSpec, depth: u32) -> Style {
    let mut resolve = |num: &Option<Num>| num.as_ref().map(|n| resolve_num(ctx, n, depth));
    Style {
        stroke_color: resolve(&spec.stroke_color),
        stroke_thickness: resolve(&spec.stroke_thickness),
        fill_color: resolve(&spec.fill_color),
        hatch_pattern: resolve(&spec.hatch_pattern),
        hatch_scale: resolve(&spec.hatch_scale),
        hatch_angle: resolve(&spec.hatch_angle),
    }
}
