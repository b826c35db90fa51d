#![forbid(unsafe_code)]

//! Pattern lock: a 3x3 grid of touch targets traced with one gesture.
//!
//! The module is split the same way the gesture is processed:
//!
//! - [`PatternGrid`] lays out nine [`Node`]s from the surface size and answers
//!   hit-test queries.
//! - [`PatternState`] is the pure state machine. It turns pointer phases into
//!   [`PatternEvent`]s and owns the [`Path`] being traced.
//! - [`PatternCanvas`] wires the two to a [`Surface`](lockpad_render::Surface),
//!   a haptics capability, and the completion callback.
//!
//! # Invariants
//!
//! 1. A grid has exactly nine nodes with ids 1..=9 in row-major order; node
//!    positions never change for the lifetime of a layout.
//! 2. A [`Path`] never contains the same node twice.
//! 3. Path order is the order in which nodes were first entered.
//! 4. Every pointer-up produces exactly one `Completed` event carrying an owned
//!    snapshot of the path, even if the path is empty.
//! 5. Move events outside an active gesture are ignored.
//!
//! # Hit testing
//!
//! A point `p` hits node `n` iff `distance(p, n.center) < n.radius + tolerance`.
//! The default tolerance (30px) dwarfs the node radius (4.5px) so the small
//! dots remain usable with a finger.

mod canvas;
mod grid;
mod path;
mod state;

use core::time::Duration;

use lockpad_core::haptics::DEFAULT_PULSE;
use lockpad_render::Rgba;

pub use canvas::{CompletionHandler, PatternCanvas};
pub use grid::{Node, PatternGrid};
pub use path::{NodeId, Path, PathError};
pub use state::{PatternEvent, PatternState};

/// Default extra hit radius around each node.
pub const DEFAULT_TOLERANCE: f64 = 30.0;

/// Default drawn radius of each node.
pub const DEFAULT_NODE_RADIUS: f64 = 4.5;

/// Default fraction of the surface left as margin on each side.
///
/// Roughly 50px on a 300px canvas.
pub const DEFAULT_MARGIN_RATIO: f64 = 0.1666;

/// Layout, hit-testing, and drawing parameters for a pattern canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternConfig {
    /// Extra hit radius added to each node's drawn radius (default: 30.0).
    pub tolerance: f64,
    /// Drawn radius of each node (default: 4.5).
    pub node_radius: f64,
    /// Margin on each side as a fraction of the surface size (default: 0.1666).
    pub margin_ratio: f64,
    /// Stroke width of unselected node outlines (default: 1.3).
    pub outline_width: f64,
    /// Stroke width of the connecting path (default: 4.0).
    pub path_width: f64,
    /// Color for nodes and path (default: white).
    pub color: Rgba,
    /// Vibration pulse when a node joins the path (default: 50ms).
    pub haptic_pulse: Duration,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            node_radius: DEFAULT_NODE_RADIUS,
            margin_ratio: DEFAULT_MARGIN_RATIO,
            outline_width: 1.3,
            path_width: 4.0,
            color: Rgba::WHITE,
            haptic_pulse: DEFAULT_PULSE,
        }
    }
}

impl PatternConfig {
    /// Set the hit tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the drawn node radius.
    #[must_use]
    pub fn with_node_radius(mut self, radius: f64) -> Self {
        self.node_radius = radius;
        self
    }

    /// Set the margin ratio.
    #[must_use]
    pub fn with_margin_ratio(mut self, ratio: f64) -> Self {
        self.margin_ratio = ratio;
        self
    }

    /// Set the drawing color.
    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the haptic pulse length.
    #[must_use]
    pub fn with_haptic_pulse(mut self, pulse: Duration) -> Self {
        self.haptic_pulse = pulse;
        self
    }

    /// Radius within which a point counts as touching a node.
    #[inline]
    #[must_use]
    pub fn hit_radius(&self) -> f64 {
        self.node_radius + self.tolerance
    }
}
