#![forbid(unsafe_code)]

//! Lock-screen configuration.

use serde::{Deserialize, Serialize};

use lockpad_widgets::DEFAULT_PIN_LENGTH;

/// Default minimum number of nodes in an enrolled pattern.
pub const DEFAULT_MIN_PATTERN_LEN: usize = 4;

/// Storage keys for each persisted secret.
///
/// The defaults match the keys used by the browser build, so an existing
/// `localStorage` profile keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Enrolled PIN, stored as a plain digit string (default: `userPin`).
    pub pin: String,
    /// Enrolled pattern, stored as a JSON array of node ids (default: `userPattern`).
    pub pattern: String,
    /// Saved-password list, stored as a JSON array (default: `savedPasswords`).
    pub passwords: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            pin: "userPin".into(),
            pattern: "userPattern".into(),
            passwords: "savedPasswords".into(),
        }
    }
}

/// Policy for enrolling and verifying secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Exact number of digits in a PIN (default: 4).
    pub pin_length: usize,
    /// Minimum number of nodes in an enrolled pattern (default: 4).
    pub min_pattern_len: usize,
    /// Where secrets live in the store.
    pub keys: StorageKeys,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            pin_length: DEFAULT_PIN_LENGTH,
            min_pattern_len: DEFAULT_MIN_PATTERN_LEN,
            keys: StorageKeys::default(),
        }
    }
}

impl LockConfig {
    /// Set the PIN length.
    #[must_use]
    pub fn with_pin_length(mut self, len: usize) -> Self {
        self.pin_length = len;
        self
    }

    /// Set the minimum pattern length.
    #[must_use]
    pub fn with_min_pattern_len(mut self, len: usize) -> Self {
        self.min_pattern_len = len;
        self
    }

    /// Set the storage keys.
    #[must_use]
    pub fn with_keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }
}
