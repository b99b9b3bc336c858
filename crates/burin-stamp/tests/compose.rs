//! End-to-end composition behavior: boolean modes, grids, macros,
//! cursor state, style zones.

use burin_geom::Polygon;
use burin_sequence::PatternContext;
use burin_stamp::{CircleParams, GridParams, Num, RectangleParams, Stamp, StyleSpec};

/// Net filled area of a polygon subtree: outline minus holes plus
/// nested islands.
fn net_area(poly: &Polygon) -> f64 {
    poly.area() - poly.children.iter().map(net_area).sum::<f64>()
}

fn total_area(polys: &[Polygon]) -> f64 {
    polys.iter().map(net_area).sum()
}

/// Area of a regular n-gon of the given circumradius (what a circle
/// primitive actually rasterizes to).
fn ngon_area(n: usize, r: f64) -> f64 {
    0.5 * n as f64 * r * r * (std::f64::consts::TAU / n as f64).sin()
}

fn square(size: f64) -> RectangleParams {
    RectangleParams {
        width: Num::lit(size),
        height: Num::lit(size),
        ..Default::default()
    }
}

#[test]
fn union_of_disjoint_circles_keeps_separate_polys() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    let mut params = CircleParams {
        radius: Num::lit(2.0),
        ..Default::default()
    };
    params.grid.num_x = Num::lit(3.0);
    params.grid.spacing_x = Num::lit(10.0);
    stamp.circle(params);

    assert_eq!(stamp.polygons(&mut ctx).len(), 3);
}

#[test]
fn boolean_subtract_carves_the_overlap() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rectangle(square(10.0));
    stamp.boolean(-1);
    stamp.circle(CircleParams {
        radius: Num::lit(3.0),
        ..Default::default()
    });

    let area = total_area(stamp.polygons(&mut ctx));
    // The circle sits fully inside the square, so the result loses
    // exactly the circle polygon's area.
    let expected = 100.0 - ngon_area(32, 3.0);
    assert!((area - expected).abs() < 1e-6, "area = {area}");
}

#[test]
fn subtract_mode_without_accumulator_is_a_noop() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.subtract();
    stamp.rectangle(square(10.0));

    assert!(stamp.polygons(&mut ctx).is_empty());
}

#[test]
fn intersect_keeps_the_overlap_only() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rectangle(square(10.0));
    stamp.intersect();
    let mut shifted = square(10.0);
    shifted.grid.offset_x = Num::lit(5.0);
    stamp.rectangle(shifted);

    let area = total_area(stamp.polygons(&mut ctx));
    assert!((area - 50.0).abs() < 1e-6, "area = {area}");
}

#[test]
fn grid_resolves_expressions_per_cell() {
    let mut ctx = PatternContext::new();
    let mut params = CircleParams {
        radius: Num::expr("repeat 1,2,3 as r"),
        ..Default::default()
    };
    params.grid.num_x = Num::lit(3.0);
    params.grid.spacing_x = Num::lit(20.0);
    let mut stamp = Stamp::new();
    stamp.circle(params);

    let polys: Vec<Polygon> = stamp.polygons(&mut ctx).to_vec();
    assert_eq!(polys.len(), 3);
    let mut areas: Vec<f64> = polys.iter().map(net_area).collect();
    areas.sort_by(|a, b| a.total_cmp(b));
    for (area, r) in areas.iter().zip([1.0, 2.0, 3.0]) {
        assert!((area - ngon_area(32, r)).abs() < 1e-6);
    }
}

#[test]
fn skipped_cells_occupy_spacing_but_emit_nothing() {
    let mut ctx = PatternContext::new();
    let mut params = CircleParams {
        radius: Num::lit(2.0),
        ..Default::default()
    };
    params.grid.num_x = Num::lit(2.0);
    params.grid.spacing_x = Num::lit(10.0);
    params.grid.skip = Num::expr("repeat 0,1 as sk");
    let mut stamp = Stamp::new();
    stamp.circle(params);

    let polys = stamp.polygons(&mut ctx);
    assert_eq!(polys.len(), 1);
    // The surviving circle sits in the left cell of a centered grid.
    let bounds = burin_geom::BoundingBox::of_points(polys[0].points.iter().map(|r| r.point()));
    assert!((bounds.center().x + 5.0).abs() < 1e-6);
}

#[test]
fn repeat_last_duplicates_trailing_steps() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.forward(10.0);
    stamp.circle(CircleParams {
        radius: Num::lit(2.0),
        ..Default::default()
    });
    stamp.repeat_last(2, 3);

    // 2 nodes expand into 8: four circles stepping up the canvas.
    assert_eq!(stamp.polygons(&mut ctx).len(), 4);
    let cursor = stamp.cursor();
    assert!((cursor.y + 40.0).abs() < 1e-6);
}

#[test]
fn outline_thickness_carves_a_gap_between_touching_shapes() {
    let mut ctx = PatternContext::new();

    // Two squares sharing an edge merge into one polygon.
    let mut plain = Stamp::new();
    plain.rectangle(square(10.0));
    let mut second = square(10.0);
    second.grid.offset_x = Num::lit(10.0);
    plain.rectangle(second);
    assert_eq!(plain.polygons(&mut ctx).len(), 1);

    // With an outline, the second shape carves clearance first.
    let mut outlined = Stamp::new();
    outlined.rectangle(square(10.0));
    let mut second = square(10.0);
    second.grid.offset_x = Num::lit(10.0);
    second.grid.outline_thickness = Num::lit(1.0);
    outlined.rectangle(second);
    assert_eq!(outlined.polygons(&mut ctx).len(), 2);
}

#[test]
fn cursor_ops_compose_and_step_back() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.move_to(5.0, 5.0);
    stamp.rotate_to(90.0);
    stamp.forward(10.0);
    stamp.bake(&mut ctx);

    let c = stamp.cursor();
    assert!((c.x - 15.0).abs() < 1e-6);
    assert!((c.y - 5.0).abs() < 1e-6);

    let mut stepped = Stamp::new();
    stepped.move_to(5.0, 5.0);
    stepped.rotate_to(90.0);
    stepped.forward(10.0);
    stepped.step_back(2);
    stepped.bake(&mut ctx);

    let c = stepped.cursor();
    assert!((c.x - 5.0).abs() < 1e-6);
    assert!((c.y - 5.0).abs() < 1e-6);
    assert_eq!(c.direction, 0.0);
}

#[test]
fn move_by_is_rotated_into_the_heading() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rotate_to(90.0);
    stamp.move_by(0.0, -1.0);
    stamp.bake(&mut ctx);

    // Heading 90 degrees turns local "up" into world +x.
    let c = stamp.cursor();
    assert!((c.x - 1.0).abs() < 1e-6);
    assert!(c.y.abs() < 1e-6);
}

#[test]
fn style_zones_assign_smallest_enclosing_zone() {
    let mut ctx = PatternContext::new();
    let style_a = StyleSpec {
        fill_color: Some(Num::lit(1.0)),
        ..Default::default()
    };
    let style_b = StyleSpec {
        fill_color: Some(Num::lit(2.0)),
        ..Default::default()
    };

    let mut stamp = Stamp::new();
    let mut big = square(100.0);
    big.grid.style = Some(style_a);
    stamp.rectangle(big);
    let mut small = square(20.0);
    small.grid.style = Some(style_b);
    small.grid.outline_thickness = Num::lit(2.0);
    stamp.rectangle(small);

    let polys: Vec<Polygon> = stamp.polygons(&mut ctx).to_vec();
    assert_eq!(polys.len(), 2);

    let small_poly = polys
        .iter()
        .min_by(|a, b| a.area().total_cmp(&b.area()))
        .unwrap();
    let big_poly = polys
        .iter()
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .unwrap();
    assert_eq!(small_poly.style.as_ref().unwrap().fill_color, Some(2.0));
    assert_eq!(big_poly.style.as_ref().unwrap().fill_color, Some(1.0));
}

#[test]
fn default_style_covers_unzoned_polys() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.default_style(StyleSpec {
        fill_color: Some(Num::lit(9.0)),
        ..Default::default()
    });
    stamp.rectangle(square(10.0));

    let polys = stamp.polygons(&mut ctx);
    assert_eq!(polys[0].style.as_ref().unwrap().fill_color, Some(9.0));
}

#[test]
fn break_apart_keeps_leaf_descendants_only() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rectangle(square(12.0));
    stamp.subtract();
    stamp.rectangle(square(8.0));
    stamp.break_apart();

    // The donut's only leaf is its hole ring; the grouping outer ring
    // is discarded.
    let polys = stamp.polygons(&mut ctx);
    assert_eq!(polys.len(), 1);
    assert!(polys[0].children.is_empty());
    assert!((polys[0].area() - 64.0).abs() < 1e-6);
}

#[test]
fn nested_stamps_place_child_polygons_per_cell() {
    let mut ctx = PatternContext::new();
    let mut child = Stamp::new();
    child.circle(CircleParams {
        radius: Num::lit(2.0),
        ..Default::default()
    });

    let grid = GridParams {
        num_x: Num::lit(2.0),
        spacing_x: Num::lit(10.0),
        ..Default::default()
    };
    let mut parent = Stamp::new();
    parent.stamp(&child, grid);

    let polys = parent.polygons(&mut ctx);
    assert_eq!(polys.len(), 2);
    let area = total_area(polys);
    assert!((area - 2.0 * ngon_area(32, 2.0)).abs() < 1e-6);
}

#[test]
fn crop_intersects_the_final_result() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rectangle(square(10.0));
    stamp.crop(0.0, -5.0, 5.0, 10.0);

    let area = total_area(stamp.polygons(&mut ctx));
    assert!((area - 50.0).abs() < 1e-6, "area = {area}");
}

#[test]
fn boolean_mode_from_sequence_expression() {
    let mut ctx = PatternContext::new();
    ctx.define("repeat 1,-1 as mode");

    let mut stamp = Stamp::new();
    stamp.boolean(Num::expr("mode()"));
    stamp.rectangle(square(10.0));
    stamp.boolean(Num::expr("mode()"));
    stamp.rectangle(square(6.0));

    // First draw unions, second subtracts.
    let area = total_area(stamp.polygons(&mut ctx));
    assert!((area - 64.0).abs() < 1e-6, "area = {area}");
}

#[test]
fn reset_discards_accumulated_state() {
    let mut ctx = PatternContext::new();
    let mut stamp = Stamp::new();
    stamp.rectangle(square(10.0));
    stamp.reset();
    stamp.rectangle(square(4.0));

    let area = total_area(stamp.polygons(&mut ctx));
    assert!((area - 16.0).abs() < 1e-6);
}
