#![forbid(unsafe_code)]

//! Lockpad Runtime
//!
//! Screen logic around the input widgets.
//!
//! # Key Components
//!
//! - [`LockScreen`] - Enroll a PIN or pattern, then verify it on later visits
//! - [`SavedPasswords`] - Persisted list of named credentials
//! - [`KeyValueStore`] - The single persistence boundary, with [`MemoryStore`]
//!   and (behind `state-persistence`) [`FileStore`]
//! - [`LockConfig`] - PIN length, minimum pattern length, storage keys
//!
//! # Role in lockpad
//! `lockpad-runtime` is the policy layer. Widgets in `lockpad-widgets` report
//! raw input (a finished pattern path, a keypad press); the runtime decides
//! what that input means, reads and writes the store, and tells the host which
//! screen to show next.

pub mod config;
pub mod lock;
pub mod storage;
pub mod vault;

pub use config::{DEFAULT_MIN_PATTERN_LEN, LockConfig, StorageKeys};
pub use lock::{LockError, LockResult, LockScreen, Screen};
#[cfg(feature = "state-persistence")]
pub use storage::FileStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult, load_json, save_json};
pub use vault::{SavedPassword, SavedPasswords, VaultError, VaultResult};
