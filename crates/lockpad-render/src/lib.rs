#![forbid(unsafe_code)]

//! Render kernel: colors, strokes, and drawing surfaces.
//!
//! # Role in lockpad
//! Widgets draw through the [`surface::Surface`] trait, a small immediate-mode
//! 2D context (clear, filled/outlined circles, stroked polylines) that maps
//! one-to-one onto a browser `CanvasRenderingContext2d`.
//!
//! Two host-independent implementations live here:
//! - [`surface::RecordingSurface`] keeps an ordered log of draw operations,
//!   which is how widget rendering is asserted in tests.
//! - [`raster::PixelSurface`] rasterizes into an in-memory pixel grid for
//!   headless snapshots.

pub mod color;
pub mod raster;
pub mod surface;

pub use color::Rgba;
pub use surface::{DrawOp, RecordingSurface, Stroke, Surface};
