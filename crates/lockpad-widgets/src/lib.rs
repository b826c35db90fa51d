#![forbid(unsafe_code)]

//! Input widgets for lockpad.
//!
//! - [`pattern`]: the 3x3 pattern-lock canvas controller.
//! - [`pin_pad`]: fixed-length PIN keypad state and masked display.

pub mod pattern;
pub mod pin_pad;

pub use pattern::{
    CompletionHandler, Node, NodeId, Path, PathError, PatternCanvas, PatternConfig, PatternEvent,
    PatternGrid, PatternState,
};
pub use pin_pad::{DEFAULT_PIN_LENGTH, DigitCell, PinPad};
