#![forbid(unsafe_code)]

//! Saved-password list.
//!
//! Entries are persisted as one JSON array under a single key, in the shape
//! the browser build writes:
//!
//! ```json
//! [{"id": 1700000000000, "name": "example.com", "password": "hunter2"}]
//! ```
//!
//! Ids are millisecond timestamps. Two entries created within the same
//! millisecond would collide, so a new id is bumped past the largest one in
//! use.

use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Characters shown before a password preview is cut off.
pub const PREVIEW_CHARS: usize = 13;

/// Names that look like a domain, optionally with scheme and path.
static LINK_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    RegexBuilder::new(r"^(https?://)?([a-z0-9-]+\.)+[a-z]{2,}(/\S*)?$")
        .case_insensitive(true)
        .build()
        .ok()
});

/// One stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPassword {
    /// Creation time in milliseconds since the Unix epoch; unique per list.
    pub id: u64,
    /// Label, often a site address.
    pub name: String,
    /// The secret itself.
    pub password: String,
}

impl SavedPassword {
    /// The password cut to its first 13 characters, with `...` appended when
    /// anything was cut.
    #[must_use]
    pub fn masked_preview(&self) -> String {
        let mut chars = self.password.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    /// An `https` link when the name looks like a site address.
    #[must_use]
    pub fn link(&self) -> Option<String> {
        let pattern = LINK_PATTERN.as_ref()?;
        if !pattern.is_match(&self.name) {
            return None;
        }
        let lower = self.name.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(self.name.clone())
        } else {
            Some(format!("https://{}", self.name))
        }
    }
}

/// Errors from the saved-password list.
#[derive(Debug)]
pub enum VaultError {
    /// No entry has this id.
    NotFound(u64),
    /// The store failed.
    Storage(StorageError),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::NotFound(id) => write!(f, "no saved password with id {id}"),
            VaultError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VaultError::Storage(e) => Some(e),
            VaultError::NotFound(_) => None,
        }
    }
}

impl From<StorageError> for VaultError {
    fn from(e: StorageError) -> Self {
        VaultError::Storage(e)
    }
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Millisecond clock used to mint ids.
pub type Clock = Box<dyn Fn() -> u64>;

fn system_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// The saved-password list, mirrored in memory and written through to the
/// store on every change.
pub struct SavedPasswords<S: KeyValueStore> {
    store: S,
    key: String,
    entries: Vec<SavedPassword>,
    clock: Clock,
}

impl<S: KeyValueStore> fmt::Debug for SavedPasswords<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedPasswords")
            .field("store", &self.store.name())
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<S: KeyValueStore> SavedPasswords<S> {
    /// Load the list stored under `key`.
    ///
    /// A missing or undecodable value yields an empty list; only backend
    /// failures are errors.
    pub fn load(store: S, key: impl Into<String>) -> VaultResult<Self> {
        let key = key.into();
        let entries = match load_json::<Vec<SavedPassword>, _>(&store, &key) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(StorageError::Serialization(msg)) => {
                tracing::warn!(key = %key, error = %msg, "saved passwords are corrupt, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(key = %key, entries = entries.len(), "saved passwords loaded");
        Ok(Self {
            store,
            key,
            entries,
            clock: Box::new(system_millis),
        })
    }

    /// Mint ids from `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> u64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Append an entry and return its id.
    pub fn add(&mut self, name: impl Into<String>, password: impl Into<String>) -> VaultResult<u64> {
        let next = self.entries.iter().map(|e| e.id).max().map_or(0, |m| m.saturating_add(1));
        let id = (self.clock)().max(next);
        self.entries.push(SavedPassword {
            id,
            name: name.into(),
            password: password.into(),
        });
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        tracing::info!(id, "password saved");
        Ok(id)
    }

    /// Replace the name and password of entry `id`.
    pub fn update(
        &mut self,
        id: u64,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> VaultResult<()> {
        let index = self.index_of(id)?;
        let previous = std::mem::replace(
            &mut self.entries[index],
            SavedPassword {
                id,
                name: name.into(),
                password: password.into(),
            },
        );
        if let Err(e) = self.persist() {
            self.entries[index] = previous;
            return Err(e);
        }
        tracing::info!(id, "password updated");
        Ok(())
    }

    /// Delete entry `id` and return it.
    pub fn remove(&mut self, id: u64) -> VaultResult<SavedPassword> {
        let index = self.index_of(id)?;
        let removed = self.entries.remove(index);
        if let Err(e) = self.persist() {
            self.entries.insert(index, removed);
            return Err(e);
        }
        tracing::info!(id, "password removed");
        Ok(removed)
    }

    /// Entry `id`, if present.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&SavedPassword> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[SavedPassword] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn index_of(&self, id: u64) -> VaultResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(VaultError::NotFound(id))
    }

    fn persist(&self) -> VaultResult<()> {
        save_json(&self.store, &self.key, &self.entries)?;
        Ok(())
    }
}
