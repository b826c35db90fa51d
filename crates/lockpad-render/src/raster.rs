#![forbid(unsafe_code)]

//! Software rasterizer for headless rendering.
//!
//! [`PixelSurface`] implements [`Surface`] on a row-major pixel grid with no
//! anti-aliasing: a pixel is either painted with a color or left empty. It is
//! coarse on purpose; it exists so that rendering can be inspected without a
//! browser.
//!
//! # Example
//!
//! ```ignore
//! use lockpad_render::raster::PixelSurface;
//!
//! let mut surface = PixelSurface::new(60, 60);
//! // ... hand it to a widget, then:
//! println!("{}", surface.to_ascii(3));
//! ```

use lockpad_core::geometry::{Point, Size};

use crate::color::Rgba;
use crate::surface::{Stroke, Surface};

/// An in-memory pixel grid implementing [`Surface`].
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Row-major, `None` = untouched.
    pixels: Vec<Option<Rgba>>,
}

impl PixelSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![None; len],
        }
    }

    /// Color at `(x, y)`, or `None` if untouched or out of bounds.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        self.index(x, y).and_then(|i| self.pixels[i])
    }

    /// Check if a pixel is painted.
    #[must_use]
    pub fn is_set(&self, x: i64, y: i64) -> bool {
        self.get(x, y).is_some()
    }

    /// Number of painted pixels.
    #[must_use]
    pub fn painted(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// Downsample into a character grid, one char per `cell x cell` block.
    ///
    /// A block containing any painted pixel becomes `#`, otherwise `.`.
    #[must_use]
    pub fn to_ascii(&self, cell: u32) -> String {
        let cell = cell.max(1);
        let cols = self.width.div_ceil(cell);
        let rows = self.height.div_ceil(cell);
        let mut out = String::with_capacity(((cols + 1) * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let lit = (0..cell).any(|dy| {
                    (0..cell).any(|dx| {
                        self.is_set(
                            i64::from(col * cell + dx),
                            i64::from(row * cell + dy),
                        )
                    })
                });
                out.push(if lit { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = Some(color);
        }
    }

    /// Paint every pixel whose center lies within `radius` of `center`.
    fn disc(&mut self, center: Point, radius: f64, color: Rgba) {
        if !center.is_finite() || !(radius >= 0.0) {
            return;
        }
        let min_x = (center.x - radius).floor() as i64;
        let max_x = (center.x + radius).ceil() as i64;
        let min_y = (center.y - radius).floor() as i64;
        let max_y = (center.y + radius).ceil() as i64;
        for y in min_y.max(0)..=max_y.min(i64::from(self.height) - 1) {
            for x in min_x.max(0)..=max_x.min(i64::from(self.width) - 1) {
                let px = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if px.distance(center) <= radius {
                    self.plot(x, y, color);
                }
            }
        }
    }

    /// Bresenham line between integer endpoints.
    fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i64 = if x0 < x1 { 1 } else { -1 };
        let sy: i64 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            self.plot(cx, cy, color);

            if cx == x1 && cy == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }

    /// Circle outline using the midpoint algorithm.
    fn ring(&mut self, cx: i64, cy: i64, radius: i64, color: Rgba) {
        if radius <= 0 {
            self.plot(cx, cy, color);
            return;
        }

        let mut x = radius;
        let mut y = 0;
        let mut d = 1 - radius;

        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.plot(px, py, color);
            }
            y += 1;
            if d < 0 {
                d += 2 * y + 1;
            } else {
                x -= 1;
                d += 2 * (y - x) + 1;
            }
        }
    }

    /// Circle outline by distance test over the whole surface.
    ///
    /// Used when the circle is too large or too far away for the midpoint
    /// walk, whose cost grows with the radius.
    fn ring_scan(&mut self, center: Point, radius: f64, color: Rgba) {
        for y in 0..i64::from(self.height) {
            for x in 0..i64::from(self.width) {
                let d = Point::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
                if (d - radius).abs() <= 0.5 {
                    self.plot(x, y, color);
                }
            }
        }
    }

    /// Bounds that segments are clipped to: the surface grown by `margin`.
    fn clip_bounds(&self, margin: f64) -> (Point, Point) {
        (
            Point::new(-margin, -margin),
            Point::new(
                f64::from(self.width) + margin,
                f64::from(self.height) + margin,
            ),
        )
    }
}

/// Round to the nearest pixel, saturating non-finite input to 0.
fn px(v: f64) -> i64 {
    if v.is_finite() { v.round() as i64 } else { 0 }
}

/// Clip segment `a`-`b` to the box `lo..=hi` (Liang-Barsky).
///
/// Returns `None` when nothing of the segment lies inside or an endpoint is
/// not finite.
fn clip_segment(a: Point, b: Point, lo: Point, hi: Point) -> Option<(Point, Point)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, a.x - lo.x),
        (dx, hi.x - a.x),
        (-dy, a.y - lo.y),
        (dy, hi.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    let start = Point::new(a.x + dx * t0, a.y + dy * t0);
    let end = Point::new(a.x + dx * t1, a.y + dy * t1);
    (start.is_finite() && end.is_finite()).then_some((start, end))
}

impl Surface for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.disc(center, radius, color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, stroke: Stroke) {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let nearest = Point::new(center.x.clamp(0.0, w), center.y.clamp(0.0, h));
        let farthest = Point::new(
            if center.x < w / 2.0 { w } else { 0.0 },
            if center.y < h / 2.0 { h } else { 0.0 },
        );
        if radius + 1.0 < center.distance(nearest) || radius - 1.0 > center.distance(farthest) {
            return;
        }
        let span = w + h;
        if radius <= span && center.x.abs() <= 2.0 * span && center.y.abs() <= 2.0 * span {
            self.ring(px(center.x), px(center.y), px(radius), stroke.color);
        } else {
            self.ring_scan(center, radius, stroke.color);
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: Stroke) {
        let half = stroke.width / 2.0;
        let span = f64::from(self.width) + f64::from(self.height);
        let (lo, hi) = self.clip_bounds(half.clamp(0.0, span) + 1.0);
        for pair in points.windows(2) {
            let Some((a, b)) = clip_segment(pair[0], pair[1], lo, hi) else {
                continue;
            };
            self.line(px(a.x), px(a.y), px(b.x), px(b.y), stroke.color);
            if half > 0.5 {
                // Thicken by stamping discs along the segment.
                let steps = a.distance(b).ceil().max(1.0) as usize;
                for i in 0..=steps {
                    let t = i as f64 / steps as f64;
                    let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
                    self.disc(p, half, stroke.color);
                }
            }
        }
    }
}
