#![forbid(unsafe_code)]

//! Core: geometry, pointer events, and platform capabilities.
//!
//! # Role in lockpad
//! `lockpad-core` is the input layer. It owns the canonical pointer event
//! types that every host (browser, test harness) normalizes into, the
//! floating-point geometry used for hit testing, and the optional platform
//! capabilities (haptics) a widget may call into best-effort.
//!
//! # How it fits in the system
//! `lockpad-widgets` consumes [`event::PointerEvent`] values and drives the
//! pattern controller. The render crate (`lockpad-render`) depends only on
//! [`geometry`], so `lockpad-core` is the shared vocabulary between input and
//! drawing.

pub mod event;
pub mod geometry;
pub mod haptics;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
