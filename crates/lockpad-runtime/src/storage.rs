#![forbid(unsafe_code)]

//! Key-value persistence for lock secrets and saved passwords.
//!
//! Every screen reads and writes durable state through one injected
//! [`KeyValueStore`] instead of touching a global storage object.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          LockScreen / SavedPasswords                          │
//! │   - Own their keys (see LockConfig::keys)                     │
//! │   - Encode values as JSON via load_json / save_json           │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     KeyValueStore                             │
//! │   - MemoryStore: in-memory (testing, ephemeral)               │
//! │   - FileStore: JSON document (requires state-persistence)     │
//! │   - LocalStorageStore: browser localStorage (lockpad-web)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: Storage failures never panic; operations return `Result`.
//! 2. **Atomic writes**: File storage uses write-rename pattern to prevent corruption.
//! 3. **String values**: Stores hold plain strings, matching browser `localStorage`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, store unaffected |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error; callers may treat as absent |
//! | `StorageError::Unavailable` | Quota, private mode, poisoned lock, unknown file version | Returns error, file untouched |

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// A value could not be encoded or decoded.
    Serialization(String),
    /// The backend refused the operation.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_) | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A durable string-to-string map.
///
/// Methods take `&self`; implementations use interior mutability so that one
/// store can be shared by several screens. There is no `Send`/`Sync` bound
/// because the browser's `localStorage` handle is neither.
pub trait KeyValueStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

macro_rules! forward_store {
    ($($ty:ty),*) => {$(
        impl<T: KeyValueStore + ?Sized> KeyValueStore for $ty {
            fn name(&self) -> &str {
                (**self).name()
            }

            fn get(&self, key: &str) -> StorageResult<Option<String>> {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: &str) -> StorageResult<()> {
                (**self).set(key, value)
            }

            fn remove(&self, key: &str) -> StorageResult<()> {
                (**self).remove(key)
            }

            fn is_available(&self) -> bool {
                (**self).is_available()
            }
        }
    )*};
}

forward_store!(&T, Box<T>, Rc<T>, Arc<T>);

/// Decode the JSON value stored under `key`.
///
/// Absent keys yield `Ok(None)`; malformed JSON yields
/// [`StorageError::Serialization`].
pub fn load_json<T, S>(store: &S, key: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as compact JSON and store it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for testing and ephemeral sessions.
///
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_store {
    use super::*;
    use serde::Deserialize;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk document.
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                entries: HashMap::new(),
            }
        }
    }

    /// File-backed store using one JSON document.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "userPattern": "[1,5,9,6]"
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// Every mutation rewrites the whole document:
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        /// Create a store at the given path.
        ///
        /// The file does not need to exist; it will be created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Create a store at the default location for the application.
        ///
        /// Uses `$XDG_STATE_HOME/lockpad/{app_name}/store.json`, falling back
        /// to `~/.local/state`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = dirs_or_fallback();
            let path = base.join("lockpad").join(app_name).join("store.json");
            Self { path }
        }

        /// Location of the backing document.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn load(&self) -> StorageResult<StoreFile> {
            if !self.path.exists() {
                return Ok(StoreFile::new());
            }

            let reader = BufReader::new(File::open(&self.path)?);
            let file: StoreFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse store file: {e}"))
            })?;

            // An unknown version is never read as empty or rewritten.
            if file.format_version != StoreFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = file.format_version,
                    expected = StoreFile::FORMAT_VERSION,
                    path = %self.path.display(),
                    "store file format version mismatch, refusing access"
                );
                return Err(StorageError::Unavailable(format!(
                    "unsupported store format version {} (expected {})",
                    file.format_version,
                    StoreFile::FORMAT_VERSION
                )));
            }
            Ok(file)
        }

        fn save(&self, file: &StoreFile) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize store: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = file.entries.len(),
                "saved store file"
            );
            Ok(())
        }
    }

    /// Get state directory, falling back to current dir if unavailable.
    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl KeyValueStore for FileStore {
        fn name(&self) -> &str {
            "FileStore"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.load()?.entries.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut file = self.load()?;
            file.entries.insert(key.to_owned(), value.to_owned());
            self.save(&file)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut file = self.load()?;
            if file.entries.remove(key).is_some() {
                self.save(&file)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            if let Some(parent) = self.path.parent() {
                if !parent.exists() {
                    return fs::create_dir_all(parent).is_ok();
                }
                let marker = parent.join(".lockpad_test_write");
                if fs::write(&marker, b"test").is_ok() {
                    let _ = fs::remove_file(&marker);
                    return true;
                }
            }
            false
        }
    }

    impl fmt::Debug for FileStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStore")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_store::FileStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basic_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v1"));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_with_entries() {
        let store = MemoryStore::with_entries([("userPin", "1234")]);
        assert_eq!(store.get("userPin").unwrap().as_deref(), Some("1234"));
        assert_eq!(format!("{store:?}"), "MemoryStore { entries: 1 }");
    }

    #[test]
    fn forwarding_impls_share_state() {
        let store = Rc::new(MemoryStore::new());
        let alias = Rc::clone(&store);
        alias.set("a", "1").unwrap();
        assert_eq!((&*store).get("a").unwrap().as_deref(), Some("1"));

        let boxed: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        boxed.set("b", "2").unwrap();
        assert_eq!(boxed.name(), "MemoryStore");
    }

    #[test]
    fn json_helpers_round_trip() {
        let store = MemoryStore::new();
        save_json(&store, "ids", &[1u8, 5, 9]).unwrap();
        assert_eq!(store.get("ids").unwrap().as_deref(), Some("[1,5,9]"));
        let back: Option<Vec<u8>> = load_json(&store, "ids").unwrap();
        assert_eq!(back, Some(vec![1, 5, 9]));
        let missing: Option<Vec<u8>> = load_json(&store, "nope").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn load_json_reports_garbage() {
        let store = MemoryStore::with_entries([("ids", "not json")]);
        let err = load_json::<Vec<u8>, _>(&store, "ids").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn storage_error_display() {
        let io = StorageError::Io(std::io::Error::other("disk gone"));
        assert_eq!(io.to_string(), "I/O error: disk gone");
        assert!(std::error::Error::source(&io).is_some());

        let ser = StorageError::Serialization("bad".into());
        assert_eq!(ser.to_string(), "serialization error: bad");
        assert!(std::error::Error::source(&ser).is_none());

        let un = StorageError::Unavailable("quota".into());
        assert_eq!(un.to_string(), "storage unavailable: quota");
    }

    #[cfg(feature = "state-persistence")]
    mod file {
        use super::*;

        #[test]
        fn file_store_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");

            let store = FileStore::new(&path);
            store.set("userPin", "1234").unwrap();
            store.set("userPattern", "[1,2,3,6]").unwrap();

            let reopened = FileStore::new(&path);
            assert_eq!(reopened.get("userPin").unwrap().as_deref(), Some("1234"));
            assert_eq!(
                reopened.get("userPattern").unwrap().as_deref(),
                Some("[1,2,3,6]")
            );
            assert!(!path.with_extension("json.tmp").exists());
        }

        #[test]
        fn file_store_missing_file_is_empty() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStore::new(dir.path().join("absent.json"));
            assert_eq!(store.get("anything").unwrap(), None);
            store.remove("anything").unwrap();
            assert!(!store.path().exists());
        }

        #[test]
        fn file_store_creates_parent_dirs() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("a").join("b").join("store.json");
            let store = FileStore::new(&path);
            assert!(store.is_available());
            store.set("k", "v").unwrap();
            assert!(path.exists());
        }

        #[test]
        fn file_store_remove_persists() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");
            let store = FileStore::new(&path);
            store.set("k", "v").unwrap();
            store.remove("k").unwrap();
            assert_eq!(FileStore::new(&path).get("k").unwrap(), None);
        }

        #[test]
        fn file_store_rejects_corrupt_document() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");
            std::fs::write(&path, "{ not json").unwrap();
            let err = FileStore::new(&path).get("k").unwrap_err();
            assert!(matches!(err, StorageError::Serialization(_)));
        }

        #[test]
        fn file_store_refuses_unknown_format_version() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("store.json");
            let original =
                r#"{"format_version": 2, "entries": {"savedPasswords": "[{\"id\":1}]"}}"#;
            std::fs::write(&path, original).unwrap();

            let store = FileStore::new(&path);
            assert!(matches!(
                store.get("savedPasswords"),
                Err(StorageError::Unavailable(_))
            ));
            let err = store.set("userPin", "1234").unwrap_err();
            assert_eq!(
                err.to_string(),
                "storage unavailable: unsupported store format version 2 (expected 1)"
            );
            assert!(store.remove("savedPasswords").is_err());

            assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        }
    }
}
