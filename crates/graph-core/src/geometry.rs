//! Connection curve geometry.
//!
//! The rendering layer is external; this module only computes where each
//! edge runs given current node positions and the fixed node footprint.

use crate::node::Node;

/// Node footprint used for port anchoring.
pub const NODE_WIDTH: f64 = 120.0;
/// Node footprint used for port anchoring.
pub const NODE_HEIGHT: f64 = 80.0;

/// A 2D point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A cubic curve from a source node's right-center to a destination
/// node's left-center, with control points at the horizontal midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPath {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl ConnectionPath {
    /// Compute the curve between two nodes at their current positions.
    pub fn between(source: &Node, dest: &Node) -> Self {
        let from = Point {
            x: source.x + NODE_WIDTH,
            y: source.y + NODE_HEIGHT / 2.0,
        };
        let to = Point {
            x: dest.x,
            y: dest.y + NODE_HEIGHT / 2.0,
        };
        let mid_x = (from.x + to.x) / 2.0;

        Self {
            from,
            ctrl1: Point { x: mid_x, y: from.y },
            ctrl2: Point { x: mid_x, y: to.y },
            to,
        }
    }

    /// SVG path data for this curve (`M … C …`).
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.from.x,
            self.from.y,
            self.ctrl1.x,
            self.ctrl1.y,
            self.ctrl2.x,
            self.ctrl2.y,
            self.to.x,
            self.to.y
        )
    }
}
