#![forbid(unsafe_code)]

use lockpad_core::geometry::{Point, Size};

use super::PatternConfig;
use super::path::NodeId;

/// One circular touch target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Identity, 1..=9 row-major.
    pub id: NodeId,
    /// Center in canvas-local pixels.
    pub center: Point,
    /// Drawn radius.
    pub radius: f64,
}

impl Node {
    /// Whether `point` lies strictly inside the hit region
    /// (`radius + tolerance`) around this node.
    ///
    /// Non-finite points never hit.
    #[inline]
    #[must_use]
    pub fn hits(&self, point: Point, tolerance: f64) -> bool {
        point.distance(self.center) < self.radius + tolerance
    }
}

/// The nine nodes of a pattern lock laid out for one surface size.
///
/// Margins are `size * margin_ratio` on each side; the remaining span is split
/// into two equal gaps per axis, so the grid is centered and scales with the
/// surface. A zero-sized surface collapses every node onto the origin, which
/// is degraded but not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternGrid {
    nodes: [Node; 9],
    tolerance: f64,
}

impl PatternGrid {
    /// Lay out the grid for `size`.
    #[must_use]
    pub fn new(size: Size, config: &PatternConfig) -> Self {
        let width = f64::from(size.width);
        let height = f64::from(size.height);
        let margin_x = width * config.margin_ratio;
        let margin_y = height * config.margin_ratio;
        let gap_x = (width - 2.0 * margin_x) / 2.0;
        let gap_y = (height - 2.0 * margin_y) / 2.0;

        let nodes = core::array::from_fn(|i| {
            let row = (i / 3) as u8;
            let col = (i % 3) as u8;
            Node {
                id: NodeId::at(row, col),
                center: Point::new(
                    margin_x + gap_x * f64::from(col),
                    margin_y + gap_y * f64::from(row),
                ),
                radius: config.node_radius,
            }
        });

        Self {
            nodes,
            tolerance: config.tolerance,
        }
    }

    /// All nodes in id order.
    #[must_use]
    pub fn nodes(&self) -> &[Node; 9] {
        &self.nodes
    }

    /// The node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Hit tolerance this grid was built with.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Every node whose hit region contains `point`, in id order.
    ///
    /// More than one node can match when the surface is small enough for
    /// hit regions to overlap.
    pub fn hits(&self, point: Point) -> impl Iterator<Item = &Node> + '_ {
        let tolerance = self.tolerance;
        self.nodes
            .iter()
            .filter(move |node| node.hits(point, tolerance))
    }

    /// The lowest-id node hit by `point`, if any.
    #[must_use]
    pub fn hit(&self, point: Point) -> Option<&Node> {
        self.hits(point).next()
    }
}
