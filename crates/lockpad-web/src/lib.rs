#![forbid(unsafe_code)]

//! Browser host for lockpad.
//!
//! - [`input`] turns DOM mouse/touch events into canvas-local pointer events.
//!   It has no browser dependency and is tested natively.
//! - On `wasm32`, `PatternLockWeb` binds a pattern canvas to a `<canvas>`
//!   element and `LockScreenWeb` drives the lock flow over `localStorage`.

pub mod input;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    CanvasSurface, LocalStorageStore, LockScreenWeb, PatternLockWeb, VibrateHaptics,
};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PatternLockWeb;

#[cfg(not(target_arch = "wasm32"))]
impl PatternLockWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
