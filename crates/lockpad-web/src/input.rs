#![forbid(unsafe_code)]

//! JSON-friendly DOM pointer schema for `lockpad-web`.
//!
//! The web host hands over raw `clientX`/`clientY` values and the active touch
//! list. This module:
//! - maps DOM event type names (`mousedown`, `touchend`, ...) onto pointer
//!   phases,
//! - converts viewport coordinates to canvas-local pixels, and
//! - encodes events as JSON for record/replay.

use lockpad_core::event::{PointerEvent, PointerPhase, PointerSource};
use lockpad_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// One entry of a DOM `TouchList`, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Origin of the canvas bounding rect (`getBoundingClientRect().left/top`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasOrigin {
    pub left: f64,
    pub top: f64,
}

impl CanvasOrigin {
    #[must_use]
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// A pointer event as the DOM reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub phase: PointerPhase,
    #[serde(default)]
    pub source: PointerSource,
    /// `clientX` for mouse events; absent for touch events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_y: Option<f64>,
    /// Active touches, in DOM order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub touches: Vec<TouchPoint>,
}

impl PointerInput {
    /// A mouse event at viewport `(client_x, client_y)`.
    #[must_use]
    pub fn mouse(phase: PointerPhase, client_x: f64, client_y: f64) -> Self {
        Self {
            phase,
            source: PointerSource::Mouse,
            client_x: Some(client_x),
            client_y: Some(client_y),
            touches: Vec::new(),
        }
    }

    /// A touch event carrying the active touch list.
    #[must_use]
    pub fn touch(phase: PointerPhase, touches: Vec<TouchPoint>) -> Self {
        Self {
            phase,
            source: PointerSource::Touch,
            client_x: None,
            client_y: None,
            touches,
        }
    }

    /// Viewport position driving this event.
    ///
    /// The first touch wins over `client_x`/`client_y`. A `touchend` has no
    /// active touches and therefore no position.
    #[must_use]
    pub fn client_position(&self) -> Option<Point> {
        if let Some(first) = self.touches.first() {
            return Some(Point::new(first.client_x, first.client_y));
        }
        match (self.client_x, self.client_y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// Convert to a canvas-local [`PointerEvent`].
    #[must_use]
    pub fn normalize(&self, origin: CanvasOrigin) -> PointerEvent {
        PointerEvent {
            phase: self.phase,
            position: self
                .client_position()
                .map(|p| p.offset(-origin.left, -origin.top)),
            source: self.source,
        }
    }

    /// Encode as JSON for record/replay.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a previously encoded event JSON string.
    ///
    /// Errors occur if the JSON does not match the expected schema.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// DOM event types the pattern canvas listens to.
pub const DOM_EVENT_TYPES: [&str; 7] = [
    "mousedown",
    "mousemove",
    "mouseup",
    "touchstart",
    "touchmove",
    "touchend",
    "touchcancel",
];

/// Map a DOM event type name to a phase and source.
///
/// `touchcancel` ends the gesture like `touchend`. Unknown names map to
/// `None`.
#[must_use]
pub fn dom_event_phase(event_type: &str) -> Option<(PointerPhase, PointerSource)> {
    let mapped = match event_type {
        "mousedown" => (PointerPhase::Down, PointerSource::Mouse),
        "mousemove" => (PointerPhase::Move, PointerSource::Mouse),
        "mouseup" => (PointerPhase::Up, PointerSource::Mouse),
        "touchstart" => (PointerPhase::Down, PointerSource::Touch),
        "touchmove" => (PointerPhase::Move, PointerSource::Touch),
        "touchend" | "touchcancel" => (PointerPhase::Up, PointerSource::Touch),
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mouse_position_is_made_canvas_local() {
        let input = PointerInput::mouse(PointerPhase::Down, 130.0, 245.5);
        let event = input.normalize(CanvasOrigin::new(100.0, 200.0));
        assert_eq!(
            event,
            PointerEvent::down(30.0, 45.5).with_source(PointerSource::Mouse)
        );
    }

    #[test]
    fn first_touch_drives_the_gesture() {
        let input = PointerInput::touch(
            PointerPhase::Move,
            vec![TouchPoint::new(60.0, 70.0), TouchPoint::new(500.0, 500.0)],
        );
        let event = input.normalize(CanvasOrigin::new(10.0, 20.0));
        assert_eq!(event.position, Some(Point::new(50.0, 50.0)));
        assert_eq!(event.source, PointerSource::Touch);
        assert_eq!(event.phase, PointerPhase::Move);
    }

    #[test]
    fn touchend_without_touches_has_no_position() {
        let input = PointerInput::touch(PointerPhase::Up, Vec::new());
        let event = input.normalize(CanvasOrigin::new(10.0, 20.0));
        assert_eq!(event.position, None);
        assert!(event.is_up());
    }

    #[test]
    fn dom_names_map_to_phases() {
        assert_eq!(
            dom_event_phase("touchstart"),
            Some((PointerPhase::Down, PointerSource::Touch))
        );
        assert_eq!(
            dom_event_phase("mousemove"),
            Some((PointerPhase::Move, PointerSource::Mouse))
        );
        assert_eq!(
            dom_event_phase("touchcancel"),
            Some((PointerPhase::Up, PointerSource::Touch))
        );
        assert_eq!(dom_event_phase("click"), None);
        assert!(DOM_EVENT_TYPES.iter().all(|t| dom_event_phase(t).is_some()));
    }

    #[test]
    fn json_shape_is_compact() {
        let input = PointerInput::mouse(PointerPhase::Down, 1.0, 2.0);
        assert_eq!(
            input.to_json_string().unwrap(),
            r#"{"phase":"down","source":"mouse","client_x":1.0,"client_y":2.0}"#
        );

        let touch = PointerInput::touch(PointerPhase::Up, Vec::new());
        assert_eq!(
            touch.to_json_string().unwrap(),
            r#"{"phase":"up","source":"touch"}"#
        );
    }

    #[test]
    fn json_decodes_with_defaults() {
        let input = PointerInput::from_json_str(
            r#"{"phase":"move","touches":[{"client_x":5.0,"client_y":6.0}]}"#,
        )
        .unwrap();
        assert_eq!(input.source, PointerSource::Mouse);
        assert_eq!(input.client_position(), Some(Point::new(5.0, 6.0)));

        assert!(PointerInput::from_json_str(r#"{"phase":"drag"}"#).is_err());
    }
}
