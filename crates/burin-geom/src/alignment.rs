//! Shape anchoring.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Placement of a shape relative to its anchor point, as a 3x3 grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeAlignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl ShapeAlignment {
    /// Map a numeric index (row-major, 0 = TopLeft .. 8 = BottomRight)
    /// to an alignment. Out-of-range indices fall back to Center.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => ShapeAlignment::TopLeft,
            1 => ShapeAlignment::Top,
            2 => ShapeAlignment::TopRight,
            3 => ShapeAlignment::Left,
            4 => ShapeAlignment::Center,
            5 => ShapeAlignment::Right,
            6 => ShapeAlignment::BottomLeft,
            7 => ShapeAlignment::Bottom,
            8 => ShapeAlignment::BottomRight,
            _ => ShapeAlignment::Center,
        }
    }

    /// Offset to apply to content of the given size so it sits on the
    /// named side of its anchor. y-down: `Top` shifts content up (-y).
    pub fn offset(self, width: f64, height: f64) -> Point {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let x = match self {
            ShapeAlignment::TopLeft | ShapeAlignment::Left | ShapeAlignment::BottomLeft => -hw,
            ShapeAlignment::TopRight | ShapeAlignment::Right | ShapeAlignment::BottomRight => hw,
            _ => 0.0,
        };
        let y = match self {
            ShapeAlignment::TopLeft | ShapeAlignment::Top | ShapeAlignment::TopRight => -hh,
            ShapeAlignment::BottomLeft | ShapeAlignment::Bottom | ShapeAlignment::BottomRight => hh,
            _ => 0.0,
        };
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_has_no_offset() {
        assert_eq!(ShapeAlignment::Center.offset(10.0, 20.0), Point::ZERO);
    }

    #[test]
    fn corners_offset_by_half_extent() {
        let o = ShapeAlignment::TopLeft.offset(10.0, 20.0);
        assert_eq!(o, Point::new(-5.0, -10.0));
        let o = ShapeAlignment::BottomRight.offset(10.0, 20.0);
        assert_eq!(o, Point::new(5.0, 10.0));
    }

    #[test]
    fn from_index_wraps_to_center() {
        assert_eq!(ShapeAlignment::from_index(4), ShapeAlignment::Center);
        assert_eq!(ShapeAlignment::from_index(99), ShapeAlignment::Center);
        assert_eq!(ShapeAlignment::from_index(-1), ShapeAlignment::Center);
    }
}
