#![forbid(unsafe_code)]

use std::fmt;

use lockpad_core::event::PointerEvent;
use lockpad_core::geometry::Point;
use lockpad_core::haptics::{Haptics, NoHaptics};
use lockpad_render::{Stroke, Surface};

use super::PatternConfig;
use super::grid::PatternGrid;
use super::path::Path;
use super::state::{PatternEvent, PatternState};

/// Callback invoked with an owned snapshot of the path on every pointer-up.
pub type CompletionHandler = Box<dyn FnMut(Path)>;

/// A pattern-lock widget bound to one drawing surface.
///
/// The canvas owns its surface, lays out a [`PatternGrid`] from the surface
/// size, and redraws after every pointer event. Nodes joining the path
/// trigger a haptic pulse; pointer-up hands the finished path to the
/// completion handler.
///
/// The completion handler cannot reach back into the canvas. Callers that
/// want to clear the pattern after a failed attempt use the path returned
/// from [`pointer_up`](Self::pointer_up) and then call
/// [`reset`](Self::reset).
pub struct PatternCanvas<S: Surface> {
    surface: S,
    config: PatternConfig,
    grid: PatternGrid,
    state: PatternState,
    haptics: Box<dyn Haptics>,
    on_complete: Option<CompletionHandler>,
}

impl<S: Surface> fmt::Debug for PatternCanvas<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCanvas")
            .field("size", &self.surface.size())
            .field("path", &self.state.path().to_string())
            .field("drawing", &self.state.is_drawing())
            .field("has_handler", &self.on_complete.is_some())
            .finish()
    }
}

impl<S: Surface> PatternCanvas<S> {
    /// Bind a canvas to `surface` and draw the idle grid.
    pub fn new(surface: S, config: PatternConfig) -> Self {
        let grid = PatternGrid::new(surface.size(), &config);
        let mut canvas = Self {
            surface,
            config,
            grid,
            state: PatternState::new(),
            haptics: Box::new(NoHaptics),
            on_complete: None,
        };
        canvas.render();
        canvas
    }

    /// Bind a canvas with default parameters and a completion handler.
    pub fn init(surface: S, on_complete: impl FnMut(Path) + 'static) -> Self {
        Self::new(surface, PatternConfig::default()).on_complete(on_complete)
    }

    /// Use `haptics` for node-entry pulses.
    #[must_use]
    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    /// Set the completion handler.
    #[must_use]
    pub fn on_complete(mut self, handler: impl FnMut(Path) + 'static) -> Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    /// Replace or remove the completion handler.
    pub fn set_on_complete(&mut self, handler: Option<CompletionHandler>) {
        self.on_complete = handler;
    }

    /// Start a gesture. `None` means the host could not locate the pointer.
    pub fn pointer_down(&mut self, position: Option<Point>) {
        let events = self.state.pointer_down(&self.grid, position);
        self.apply(events);
    }

    /// Extend the current gesture. Ignored while idle.
    pub fn pointer_move(&mut self, position: Point) {
        let events = self.state.pointer_move(&self.grid, position);
        self.apply(events);
    }

    /// End the gesture, notify the handler, and return the same snapshot.
    pub fn pointer_up(&mut self) -> Path {
        let path = self.state.pointer_up();
        self.apply(vec![PatternEvent::Completed(path.clone())]);
        path
    }

    /// Dispatch a normalized pointer event.
    ///
    /// Returns the completed path for pointer-up events.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<Path> {
        let events = self.state.process(&self.grid, event);
        let completed = events.iter().find_map(|e| match e {
            PatternEvent::Completed(path) => Some(path.clone()),
            _ => None,
        });
        self.apply(events);
        completed
    }

    /// Clear the path, return to idle, and redraw.
    pub fn reset(&mut self) {
        self.state.reset();
        lockpad_core::debug!("pattern reset");
        self.render();
    }

    /// Recompute the grid from the surface's current size.
    ///
    /// Any gesture in progress is abandoned and the path cleared, since node
    /// ids would otherwise refer to positions that no longer exist.
    pub fn relayout(&mut self) {
        self.grid = PatternGrid::new(self.surface.size(), &self.config);
        lockpad_core::debug!(
            width = self.surface.size().width,
            height = self.surface.size().height,
            "pattern grid relayout"
        );
        self.reset();
    }

    /// Redraw the current state onto the surface.
    ///
    /// Selected nodes are filled; the rest are outlined. When the path is
    /// non-empty a polyline joins its nodes in order and, while a gesture is
    /// in progress, continues to the pointer.
    pub fn render(&mut self) {
        let color = self.config.color;
        let outline = Stroke::new(color, self.config.outline_width);
        let path = self.state.path();
        let span = lockpad_core::debug_span!("pattern_render", selected = path.len());
        let _guard = span.enter();

        self.surface.clear();
        for node in self.grid.nodes() {
            if path.contains(node.id) {
                self.surface.fill_circle(node.center, node.radius, color);
            } else {
                self.surface.stroke_circle(node.center, node.radius, outline);
            }
        }

        if !path.is_empty() {
            let mut points: Vec<Point> = path.iter().map(|id| self.grid.node(id).center).collect();
            points.extend(self.state.pointer());
            self.surface
                .stroke_polyline(&points, Stroke::new(color, self.config.path_width));
        }
    }

    /// The path traced so far.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.state.path()
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    /// Current layout.
    #[must_use]
    pub fn grid(&self) -> &PatternGrid {
        &self.grid
    }

    /// Parameters this canvas was built with.
    #[must_use]
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface, e.g. to resize it before
    /// [`relayout`](Self::relayout).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unbind and return the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Pulse haptics, redraw, then hand completed paths to the handler.
    ///
    /// The final frame is on the surface before the handler runs.
    fn apply(&mut self, events: Vec<PatternEvent>) {
        let mut completed = Vec::new();
        for event in events {
            match event {
                PatternEvent::Started => {
                    lockpad_core::trace!("pattern gesture started");
                }
                PatternEvent::NodeEntered(id) => {
                    lockpad_core::trace!(node = id.get(), "pattern node entered");
                    self.haptics.pulse(self.config.haptic_pulse);
                }
                PatternEvent::Completed(path) => {
                    lockpad_core::debug!(len = path.len(), "pattern completed");
                    completed.push(path);
                }
            }
        }
        self.render();
        if let Some(handler) = self.on_complete.as_mut() {
            for path in completed {
                handler(path);
            }
        }
    }
}
