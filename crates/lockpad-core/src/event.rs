#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Hosts translate their native input (DOM mouse/touch events, synthetic test
//! input) into [`PointerEvent`] values before handing them to a widget.
//!
//! # Design Notes
//!
//! - Positions are canvas-local pixels (the host subtracts the surface origin).
//! - Mouse and touch collapse into the same three phases. The first touch of
//!   a multi-touch event is the one that drives the gesture.
//! - A release may carry no position: DOM `touchend` reports no active touches.

use crate::geometry::Point;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerPhase {
    /// Pointer pressed / touch started.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Pointer released / touch ended.
    Up,
}

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerSource {
    /// Mouse or pen.
    #[default]
    Mouse,
    /// Touch screen.
    Touch,
}

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    /// The phase of the interaction.
    pub phase: PointerPhase,
    /// Canvas-local position, if the host reported one.
    pub position: Option<Point>,
    /// The device that produced the event.
    pub source: PointerSource,
}

impl PointerEvent {
    /// Create a mouse event at `position`.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point) -> Self {
        Self {
            phase,
            position: Some(position),
            source: PointerSource::Mouse,
        }
    }

    /// Pointer pressed at `(x, y)`.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y))
    }

    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y))
    }

    /// Pointer released, position unknown.
    #[must_use]
    pub const fn up() -> Self {
        Self {
            phase: PointerPhase::Up,
            position: None,
            source: PointerSource::Mouse,
        }
    }

    /// Tag the event with a different source.
    #[must_use]
    pub const fn with_source(mut self, source: PointerSource) -> Self {
        self.source = source;
        self
    }

    /// Check if this event starts a gesture.
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.phase, PointerPhase::Down)
    }

    /// Check if this event ends a gesture.
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self.phase, PointerPhase::Up)
    }
}
