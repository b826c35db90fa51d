#![forbid(unsafe_code)]

//! The immediate-mode drawing surface.
//!
//! [`Surface`] is deliberately narrow: it covers exactly the primitives a
//! browser 2D canvas offers for arcs and lines, so the web host can forward
//! every call without translation.

use lockpad_core::geometry::{Point, Size};

use crate::color::Rgba;

/// Line style for outlines and polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Rgba,
    /// Line width in pixels.
    pub width: f64,
}

impl Stroke {
    /// Create a stroke.
    #[must_use]
    pub const fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }
}

/// A 2D immediate-mode drawing context with known pixel dimensions.
pub trait Surface {
    /// Pixel dimensions of the surface.
    fn size(&self) -> Size;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a full circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    /// Outline a full circle.
    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke);

    /// Stroke connected segments through `points` in order.
    ///
    /// Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        (**self).fill_circle(center, radius, color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        (**self).stroke_circle(center, radius, stroke);
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        (**self).stroke_polyline(points, stroke);
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        (**self).fill_circle(center, radius, color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        (**self).stroke_circle(center, radius, stroke);
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        (**self).stroke_polyline(points, stroke);
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// The surface was cleared.
    Clear,
    /// A filled circle.
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    /// An outlined circle.
    StrokeCircle {
        center: Point,
        radius: f64,
        stroke: Stroke,
    },
    /// A stroked polyline.
    Polyline { points: Vec<Point>, stroke: Stroke },
}

/// A surface that records draw calls instead of producing pixels.
///
/// Only the operations since the most recent [`clear`](Surface::clear) are
/// visible; earlier ones were erased and are discarded.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingSurface {
    /// Create a recorder reporting the given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Operations drawn since the last clear (starting with `Clear` if any).
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of times the surface has been cleared, i.e. frames drawn.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.clears
    }

    /// Centers of all filled circles in the current frame.
    #[must_use]
    pub fn filled_centers(&self) -> Vec<Point> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    /// Centers of all outlined circles in the current frame.
    #[must_use]
    pub fn outlined_centers(&self) -> Vec<Point> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokeCircle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    /// Polylines in the current frame.
    #[must_use]
    pub fn polylines(&self) -> Vec<&[Point]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polyline { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Change the reported dimensions.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Size::new(width, height);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE_1: Stroke = Stroke::new(Rgba::WHITE, 1.0);

    #[test]
    fn clear_discards_previous_frame() {
        let mut s = RecordingSurface::new(10, 10);
        s.clear();
        s.fill_circle(Point::new(1.0, 1.0), 2.0, Rgba::WHITE);
        s.clear();
        assert_eq!(s.ops(), &[DrawOp::Clear]);
        assert_eq!(s.frames(), 2);
    }

    #[test]
    fn short_polylines_are_dropped() {
        let mut s = RecordingSurface::new(10, 10);
        s.stroke_polyline(&[], WHITE_1);
        s.stroke_polyline(&[Point::ORIGIN], WHITE_1);
        assert!(s.polylines().is_empty());

        s.stroke_polyline(&[Point::ORIGIN, Point::new(5.0, 5.0)], WHITE_1);
        assert_eq!(s.polylines().len(), 1);
    }

    #[test]
    fn center_queries_split_by_kind() {
        let mut s = RecordingSurface::new(10, 10);
        s.fill_circle(Point::new(1.0, 1.0), 1.0, Rgba::WHITE);
        s.stroke_circle(Point::new(2.0, 2.0), 1.0, WHITE_1);
        assert_eq!(s.filled_centers(), vec![Point::new(1.0, 1.0)]);
        assert_eq!(s.outlined_centers(), vec![Point::new(2.0, 2.0)]);
    }

    #[test]
    fn mut_ref_forwards() {
        let mut s = RecordingSurface::new(4, 3);
        {
            let mut r: &mut RecordingSurface = &mut s;
            assert_eq!(Surface::size(&r), Size::new(4, 3));
            Surface::clear(&mut r);
        }
        assert_eq!(s.frames(), 1);
    }
}
