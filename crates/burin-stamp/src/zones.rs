//! Style zones: post-hoc style assignment over the boolean result.
//!
//! While baking, every visibly-placed, non-default-styled shape in
//! union mode records a zone (its world bounds plus resolved style).
//! After flattening, zones stamp their style onto matching output
//! polygons. Zones are visited largest first and overwrite earlier
//! matches, so the smallest enclosing zone wins.

use burin_geom::{BoundingBox, Style};

use crate::arena::PolyArena;

/// Bounds matching slack: output rings sit slightly outside their
/// source shape after outline carving, so zones match within 1.1x.
pub const ZONE_TOLERANCE: f64 = 1.1;

/// A recorded style region.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleZone {
    pub bounds: BoundingBox,
    pub style: Style,
}

/// Assign zone styles to the arena's root polygons. Roots matched by
/// no zone receive the default style, when one is set.
pub(crate) fn apply_style_zones(
    arena: &mut PolyArena,
    zones: &mut Vec<StyleZone>,
    default_style: Option<&Style>,
) {
    zones.sort_by(|a, b| a.bounds.area().total_cmp(&b.bounds.area()));

    let roots: Vec<usize> = arena.roots().to_vec();
    let mut matched = vec![false; roots.len()];
    for zone in zones.iter().rev() {
        for (k, &root) in roots.iter().enumerate() {
            if zone
                .bounds
                .contains_box_within(arena.bounds(root), ZONE_TOLERANCE)
            {
                arena.set_style(root, Some(zone.style.clone()));
                matched[k] = true;
            }
        }
    }

    if let Some(default) = default_style {
        for (k, &root) in roots.iter().enumerate() {
            if !matched[k] {
                arena.set_style(root, Some(default.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::PolyNode;
    use burin_geom::Ray;

    fn ring(x: f64, y: f64, size: f64) -> Vec<Ray> {
        vec![
            Ray::new(x, y, 0.0),
            Ray::new(x + size, y, 0.0),
            Ray::new(x + size, y + size, 0.0),
            Ray::new(x, y + size, 0.0),
        ]
    }

    fn style(fill: f64) -> Style {
        Style {
            fill_color: Some(fill),
            ..Style::default()
        }
    }

    #[test]
    fn smallest_enclosing_zone_wins() {
        let mut arena = PolyArena::new();
        let big = arena.push(PolyNode::new(ring(0.0, 0.0, 100.0), false));
        let small = arena.push(PolyNode::new(ring(10.0, 10.0, 10.0), false));
        arena.add_root(big);
        arena.add_root(small);

        let mut zones = vec![
            StyleZone {
                bounds: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
                style: style(1.0),
            },
            StyleZone {
                bounds: BoundingBox::new(10.0, 10.0, 10.0, 10.0),
                style: style(2.0),
            },
        ];
        apply_style_zones(&mut arena, &mut zones, None);

        // Both polys fit the big zone; only the small poly fits the
        // small zone, and the small zone is applied last.
        assert_eq!(arena.node(big).style, Some(style(1.0)));
        assert_eq!(arena.node(small).style, Some(style(2.0)));
    }

    #[test]
    fn unmatched_roots_take_the_default_style() {
        let mut arena = PolyArena::new();
        let lone = arena.push(PolyNode::new(ring(500.0, 500.0, 10.0), false));
        arena.add_root(lone);

        let mut zones = vec![StyleZone {
            bounds: BoundingBox::new(0.0, 0.0, 50.0, 50.0),
            style: style(7.0),
        }];
        apply_style_zones(&mut arena, &mut zones, Some(&style(9.0)));
        assert_eq!(arena.node(lone).style, Some(style(9.0)));
    }

    #[test]
    fn tolerance_admits_slight_overhang() {
        let mut arena = PolyArena::new();
        let poly = arena.push(PolyNode::new(ring(-2.0, 0.0, 52.0), false));
        arena.add_root(poly);

        let mut zones = vec![StyleZone {
            bounds: BoundingBox::new(0.0, 0.0, 50.0, 50.0),
            style: style(3.0),
        }];
        apply_style_zones(&mut arena, &mut zones, None);
        assert_eq!(arena.node(poly).style, Some(style(3.0)));
    }
}
