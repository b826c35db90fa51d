#![forbid(unsafe_code)]

//! Lockpad public facade crate.
//!
//! Re-exports the pattern and PIN widgets, the lock-screen flow, and the
//! storage boundary, plus a top-level [`Error`] that any of them converts
//! into.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use lockpad_core::event::{PointerEvent, PointerPhase, PointerSource};
pub use lockpad_core::geometry::{Point, Size};
pub use lockpad_core::haptics::{DEFAULT_PULSE, Haptics, NoHaptics};

// --- Render re-exports -----------------------------------------------------

pub use lockpad_render::raster::PixelSurface;
pub use lockpad_render::{DrawOp, RecordingSurface, Rgba, Stroke, Surface};

// --- Widget re-exports -----------------------------------------------------

pub use lockpad_widgets::{
    DigitCell, NodeId, Path, PathError, PatternCanvas, PatternConfig, PatternGrid, PinPad,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use lockpad_runtime::FileStore;
pub use lockpad_runtime::{
    KeyValueStore, LockConfig, LockError, LockScreen, MemoryStore, SavedPassword,
    SavedPasswords, Screen, StorageError, StorageKeys, VaultError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for lockpad apps.
#[derive(Debug)]
pub enum Error {
    /// The lock flow rejected an action.
    Lock(LockError),
    /// Saved-password list failure.
    Vault(VaultError),
    /// Persistence failure outside the lock flow.
    Storage(StorageError),
    /// A pattern path could not be built.
    Path(PathError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock(err) => write!(f, "{err}"),
            Self::Vault(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Path(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lock(err) => Some(err),
            Self::Vault(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Path(err) => Some(err),
        }
    }
}

impl From<LockError> for Error {
    fn from(err: LockError) -> Self {
        Self::Lock(err)
    }
}

impl From<VaultError> for Error {
    fn from(err: VaultError) -> Self {
        Self::Vault(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Self::Path(err)
    }
}

/// Standard result type for lockpad APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, KeyValueStore, LockConfig, LockScreen, MemoryStore, Path, PatternCanvas,
        PatternConfig, PinPad, Point, PointerEvent, Result, SavedPasswords, Screen, Surface,
    };

    pub use crate::{core, render, runtime, widgets};
}

pub use lockpad_core as core;
pub use lockpad_render as render;
pub use lockpad_runtime as runtime;
pub use lockpad_widgets as widgets;
