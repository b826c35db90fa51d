#![forbid(unsafe_code)]

use lockpad_core::event::{PointerEvent, PointerPhase};
use lockpad_core::geometry::Point;

use super::grid::PatternGrid;
use super::path::{NodeId, Path};

/// What a pointer event did to the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternEvent {
    /// A gesture began; any previous path was discarded.
    Started,
    /// A node joined the path.
    NodeEntered(NodeId),
    /// The gesture ended. Carries an owned snapshot of the final path.
    Completed(Path),
}

/// Pointer-driven state machine for one pattern gesture.
///
/// Two states: idle and drawing. Down always enters drawing, up always
/// returns to idle, and moves only act while drawing. The path survives the
/// transition back to idle so the finished pattern stays visible until the
/// next gesture or an explicit [`reset`](Self::reset).
#[derive(Debug, Clone, Default)]
pub struct PatternState {
    path: Path,
    drawing: bool,
    pointer: Option<Point>,
}

impl PatternState {
    /// Idle, with an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a normalized pointer event.
    pub fn process(&mut self, grid: &PatternGrid, event: &PointerEvent) -> Vec<PatternEvent> {
        let mut out = Vec::with_capacity(2);
        match event.phase {
            PointerPhase::Down => self.on_down(grid, event.position, &mut out),
            PointerPhase::Move => {
                if let Some(position) = event.position {
                    self.on_move(grid, position, &mut out);
                }
            }
            PointerPhase::Up => self.on_up(&mut out),
        }
        out
    }

    /// Begin a gesture at `position`.
    ///
    /// The path is cleared, then every node hit by the press point is added
    /// in id order. A press without a position starts a gesture that has not
    /// touched anything yet.
    pub fn pointer_down(&mut self, grid: &PatternGrid, position: Option<Point>) -> Vec<PatternEvent> {
        let mut out = Vec::with_capacity(2);
        self.on_down(grid, position, &mut out);
        out
    }

    /// Extend the gesture to `position`. Ignored while idle.
    pub fn pointer_move(&mut self, grid: &PatternGrid, position: Point) -> Vec<PatternEvent> {
        let mut out = Vec::new();
        self.on_move(grid, position, &mut out);
        out
    }

    /// End the gesture and return an owned snapshot of the path.
    ///
    /// Also valid while idle, in which case the snapshot is whatever the last
    /// gesture left behind. Through [`process`](Self::process) this is always
    /// exactly one [`PatternEvent::Completed`].
    pub fn pointer_up(&mut self) -> Path {
        self.drawing = false;
        self.pointer = None;
        self.path.clone()
    }

    /// Return to idle with an empty path.
    pub fn reset(&mut self) {
        self.path.clear();
        self.drawing = false;
        self.pointer = None;
    }

    /// The path traced so far.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a gesture is in progress.
    #[inline]
    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Last known pointer position while drawing.
    #[inline]
    #[must_use]
    pub const fn pointer(&self) -> Option<Point> {
        self.pointer
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl PatternState {
    fn on_down(&mut self, grid: &PatternGrid, position: Option<Point>, out: &mut Vec<PatternEvent>) {
        self.path.clear();
        self.drawing = true;
        self.pointer = position;
        out.push(PatternEvent::Started);
        if let Some(position) = position {
            self.collect_hits(grid, position, out);
        }
    }

    fn on_move(&mut self, grid: &PatternGrid, position: Point, out: &mut Vec<PatternEvent>) {
        if !self.drawing {
            return;
        }
        self.pointer = Some(position);
        self.collect_hits(grid, position, out);
    }

    fn on_up(&mut self, out: &mut Vec<PatternEvent>) {
        out.push(PatternEvent::Completed(self.pointer_up()));
    }

    fn collect_hits(&mut self, grid: &PatternGrid, position: Point, out: &mut Vec<PatternEvent>) {
        for node in grid.hits(position) {
            if self.path.push(node.id) {
                out.push(PatternEvent::NodeEntered(node.id));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lockpad_core::geometry::Size;

    use super::*;
    use crate::pattern::PatternConfig;

    fn grid() -> PatternGrid {
        PatternGrid::new(Size::new(300, 300), &PatternConfig::default())
    }

    fn center(g: &PatternGrid, n: u8) -> Point {
        g.node(NodeId::new(n).unwrap()).center
    }

    fn ids(state: &PatternState) -> Vec<u8> {
        state.path().to_ids()
    }

    #[test]
    fn down_on_node_starts_and_enters() {
        let g = grid();
        let mut s = PatternState::new();
        let c = center(&g, 5);
        let events = s.process(&g, &PointerEvent::down(c.x, c.y));
        assert_eq!(
            events,
            vec![
                PatternEvent::Started,
                PatternEvent::NodeEntered(NodeId::new(5).unwrap())
            ]
        );
        assert!(s.is_drawing());
        assert_eq!(s.pointer(), Some(c));
    }

    #[test]
    fn down_off_grid_starts_empty() {
        let g = grid();
        let mut s = PatternState::new();
        let events = s.pointer_down(&g, Some(Point::new(100.0, 100.0)));
        assert_eq!(events, vec![PatternEvent::Started]);
        assert!(s.path().is_empty());
        assert!(s.is_drawing());
    }

    #[test]
    fn down_without_position_touches_nothing() {
        let g = grid();
        let mut s = PatternState::new();
        assert_eq!(s.pointer_down(&g, None), vec![PatternEvent::Started]);
        assert!(s.is_drawing());
        assert_eq!(s.pointer(), None);
    }

    #[test]
    fn moves_extend_in_entry_order() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 5)));
        s.pointer_move(&g, center(&g, 9));
        s.pointer_move(&g, center(&g, 6));
        assert_eq!(ids(&s), vec![5, 9, 6]);
    }

    #[test]
    fn revisiting_a_node_is_ignored() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 1)));
        s.pointer_move(&g, center(&g, 2));
        let events = s.pointer_move(&g, center(&g, 1));
        assert!(events.is_empty());
        assert_eq!(ids(&s), vec![1, 2]);
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let g = grid();
        let mut s = PatternState::new();
        assert!(s.pointer_move(&g, center(&g, 5)).is_empty());
        assert!(s.path().is_empty());
        assert_eq!(s.pointer(), None);
    }

    #[test]
    fn move_without_position_is_ignored() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 5)));
        let event = PointerEvent {
            position: None,
            ..PointerEvent::moved(0.0, 0.0)
        };
        assert!(s.process(&g, &event).is_empty());
        assert_eq!(s.pointer(), Some(center(&g, 5)));
    }

    #[test]
    fn up_completes_with_snapshot_and_keeps_path() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 5)));
        s.pointer_move(&g, center(&g, 9));
        let events = s.process(&g, &PointerEvent::up());
        let expected = Path::from_ids([5, 9]).unwrap();
        assert_eq!(events, vec![PatternEvent::Completed(expected.clone())]);
        assert!(!s.is_drawing());
        assert_eq!(s.pointer(), None);
        assert_eq!(s.path(), &expected);
    }

    #[test]
    fn up_while_idle_still_completes() {
        let g = grid();
        let mut s = PatternState::new();
        let events = s.process(&g, &PointerEvent::up());
        assert_eq!(events, vec![PatternEvent::Completed(Path::new())]);
    }

    #[test]
    fn new_gesture_discards_old_path() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 1)));
        s.pointer_move(&g, center(&g, 2));
        s.pointer_up();
        s.pointer_down(&g, Some(center(&g, 9)));
        assert_eq!(ids(&s), vec![9]);
    }

    #[test]
    fn reset_returns_to_idle() {
        let g = grid();
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(center(&g, 1)));
        s.reset();
        assert!(!s.is_drawing());
        assert!(s.path().is_empty());
        assert_eq!(s.pointer(), None);
    }

    #[test]
    fn overlapping_hits_enter_in_id_order() {
        let g = PatternGrid::new(Size::new(30, 30), &PatternConfig::default());
        let mut s = PatternState::new();
        s.pointer_down(&g, Some(Point::new(15.0, 15.0)));
        assert_eq!(ids(&s), (1..=9).collect::<Vec<u8>>());
    }
}
