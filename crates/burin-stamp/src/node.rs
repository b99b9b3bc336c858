//! Command nodes.
//!
//! Fluent builder calls only record nodes; nothing executes until
//! bake. The node list is the single serialized form of a stamp, so
//! every variant round-trips through JSON.

use serde::{Deserialize, Serialize};

use crate::params::{
    BoneParams, CircleParams, EllipseParams, GridParams, Num, PolygonParams, RectangleParams,
    RoundedRectangleParams, StyleSpec, TangramParams,
};

/// Grid parameters plus the child node list of a nested stamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampParams {
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub grid: GridParams,
}

/// One recorded builder call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Node {
    Reset,
    DefaultStyle { style: StyleSpec },
    Add,
    Subtract,
    Intersect,
    /// Resolving at or below zero selects subtract mode, else union.
    Boolean { value: Num },
    BreakApart,
    MoveTo { x: Num, y: Num },
    Move { x: Num, y: Num },
    Forward { distance: Num },
    RotateTo { degrees: Num },
    Rotate { degrees: Num },
    StepBack { steps: Num },
    /// Advance a sequence for its side effect.
    Set { statement: String },
    Crop { x: Num, y: Num, width: Num, height: Num },
    Circle { params: CircleParams },
    Rectangle { params: RectangleParams },
    Ellipse { params: EllipseParams },
    RoundedRectangle { params: RoundedRectangleParams },
    Polygon { params: PolygonParams },
    Bone { params: BoneParams },
    Tangram { params: TangramParams },
    SubStamp { params: StampParams },
    /// Macro marker: duplicate the preceding `steps` nodes `times`
    /// times. Rewritten away before execution.
    RepeatLast { steps: usize, times: Num },
}

impl Node {
    /// The tag carried by shape-emitting nodes, if any.
    pub fn tag(&self) -> Option<&str> {
        self.grid().and_then(|g| g.tag.as_deref())
    }

    /// Shared grid parameters of shape-emitting nodes.
    pub fn grid(&self) -> Option<&GridParams> {
        match self {
            Node::Circle { params } => Some(&params.grid),
            Node::Rectangle { params } => Some(&params.grid),
            Node::Ellipse { params } => Some(&params.grid),
            Node::RoundedRectangle { params } => Some(&params.grid),
            Node::Polygon { params } => Some(&params.grid),
            Node::Bone { params } => Some(&params.grid),
            Node::Tangram { params } => Some(&params.grid),
            Node::SubStamp { params } => Some(&params.grid),
            _ => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut GridParams> {
        match self {
            Node::Circle { params } => Some(&mut params.grid),
            Node::Rectangle { params } => Some(&mut params.grid),
            Node::Ellipse { params } => Some(&mut params.grid),
            Node::RoundedRectangle { params } => Some(&mut params.grid),
            Node::Polygon { params } => Some(&mut params.grid),
            Node::Bone { params } => Some(&mut params.grid),
            Node::Tangram { params } => Some(&mut params.grid),
            Node::SubStamp { params } => Some(&mut params.grid),
            _ => None,
        }
    }

    /// Visit every numeric parameter of this node.
    pub fn visit_nums_mut(&mut self, f: &mut dyn FnMut(&mut Num)) {
        match self {
            Node::DefaultStyle { style } => style.visit_nums_mut(f),
            Node::Boolean { value } => f(value),
            Node::MoveTo { x, y } | Node::Move { x, y } => {
                f(x);
                f(y);
            }
            Node::Forward { distance } => f(distance),
            Node::RotateTo { degrees } | Node::Rotate { degrees } => f(degrees),
            Node::StepBack { steps } => f(steps),
            Node::Crop { x, y, width, height } => {
                f(x);
                f(y);
                f(width);
                f(height);
            }
            Node::Circle { params } => params.visit_nums_mut(f),
            Node::Rectangle { params } => params.visit_nums_mut(f),
            Node::Ellipse { params } => params.visit_nums_mut(f),
            Node::RoundedRectangle { params } => params.visit_nums_mut(f),
            Node::Polygon { params } => params.visit_nums_mut(f),
            Node::Bone { params } => params.visit_nums_mut(f),
            Node::Tangram { params } => params.visit_nums_mut(f),
            Node::SubStamp { params } => {
                params.grid.visit_nums_mut(f);
                for node in &mut params.nodes {
                    node.visit_nums_mut(f);
                }
            }
            Node::RepeatLast { times, .. } => f(times),
            _ => {}
        }
    }
}

/// Serialize a node list to its canonical JSON form.
pub fn nodes_to_string(nodes: &[Node]) -> String {
    serde_json::to_string(nodes).unwrap_or_else(|err| {
        log::error!("failed to serialize node list: {err}");
        "[]".to_string()
    })
}

/// Parse a node list, degrading to an empty list on bad input.
pub fn nodes_from_string(data: &str) -> Vec<Node> {
    serde_json::from_str(data).unwrap_or_else(|err| {
        log::error!("failed to parse node list: {err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_list_roundtrips() {
        let nodes = vec![
            Node::MoveTo {
                x: Num::lit(10.0),
                y: Num::expr("repeat 1,2 as y"),
            },
            Node::Circle {
                params: CircleParams {
                    radius: Num::lit(5.0),
                    ..Default::default()
                },
            },
            Node::RepeatLast {
                steps: 2,
                times: Num::lit(3.0),
            },
        ];
        let text = nodes_to_string(&nodes);
        assert_eq!(nodes_from_string(&text), nodes);
    }

    #[test]
    fn bad_input_degrades_to_empty() {
        assert!(nodes_from_string("not json").is_empty());
        assert!(nodes_from_string("{\"op\":\"wat\"}").is_empty());
    }

    #[test]
    fn tags_ride_on_shape_nodes() {
        let mut params = RectangleParams {
            width: Num::lit(4.0),
            height: Num::lit(4.0),
            ..Default::default()
        };
        params.grid.tag = Some("frame".into());
        let node = Node::Rectangle { params };
        assert_eq!(node.tag(), Some("frame"));
        assert_eq!(Node::Add.tag(), None);

        let text = nodes_to_string(&[node.clone()]);
        assert_eq!(nodes_from_string(&text), vec![node]);
    }

    #[test]
    fn nested_stamp_roundtrips() {
        let inner = vec![Node::Circle {
            params: CircleParams {
                radius: Num::lit(2.0),
                ..Default::default()
            },
        }];
        let node = Node::SubStamp {
            params: StampParams {
                nodes: inner,
                grid: GridParams::default(),
            },
        };
        let text = nodes_to_string(&[node.clone()]);
        assert_eq!(nodes_from_string(&text), vec![node]);
    }
}
