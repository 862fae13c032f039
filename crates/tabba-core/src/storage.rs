//! Persistence of the current tab, its name and the library.
//!
//! State lives in a string-keyed store under three independent keys:
//!
//! | key         | value                                   |
//! |-------------|-----------------------------------------|
//! | `tabData`   | JSON `{ "guitar": Part, "bass": Part }` |
//! | `tabName`   | the tab name as plain text              |
//! | `savedTabs` | JSON `{ name: { "guitar", "bass" } }`   |
//!
//! Reads never fail: a missing or corrupt key falls back to its default.
//! Writes are fire-and-forget: a failure is logged and otherwise ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tabba_buffer::DeviceClass;

use crate::config::Config;
use crate::tab::{Library, Parts, DEFAULT_TAB_NAME};
use crate::CoreResult;

pub const TAB_DATA_KEY: &str = "tabData";
pub const TAB_NAME_KEY: &str = "tabName";
pub const SAVED_TABS_KEY: &str = "savedTabs";

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

/// A string-keyed, string-valued store.
pub trait KeyValueStore {
    /// Reads a key. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store directory.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;

        // Write to a temporary file first, then rename (atomic write)
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value.as_bytes())?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// In-memory store.
///
/// ## Learning: Interior Mutability
///
/// `KeyValueStore::set` takes `&self`, like a browser's storage object.
/// `RefCell` moves the borrow check to runtime so the map can still be
/// mutated; the store is single-threaded, so that check never contends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Everything that survives between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedState {
    pub tab_data: Parts,
    pub tab_name: String,
    pub saved_tabs: Library,
}

impl SavedState {
    /// First-run state: blank parts, the default name, an empty library.
    pub fn defaults(device: DeviceClass, tab_name: impl Into<String>) -> Self {
        Self {
            tab_data: Parts::blank(device),
            tab_name: tab_name.into(),
            saved_tabs: Library::new(),
        }
    }
}

/// Loads and saves [`SavedState`] through a [`KeyValueStore`].
pub struct Persistence<S: KeyValueStore> {
    store: S,
    device: DeviceClass,
    default_name: String,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Wraps a store. `device` sets the width of default rows.
    pub fn new(store: S, device: DeviceClass) -> Self {
        Self {
            store,
            device,
            default_name: DEFAULT_TAB_NAME.to_string(),
        }
    }

    /// Overrides the name used when none is stored.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the saved state, substituting defaults for anything missing
    /// or unreadable.
    pub fn load(&self) -> SavedState {
        let tab_data = self
            .read_json(TAB_DATA_KEY)
            .unwrap_or_else(|| Parts::blank(self.device));

        let tab_name = self
            .read(TAB_NAME_KEY)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.default_name.clone());

        let saved_tabs = self.read_json(SAVED_TABS_KEY).unwrap_or_default();

        SavedState {
            tab_data,
            tab_name,
            saved_tabs,
        }
    }

    /// Writes all three keys. Failures are logged, never returned.
    pub fn save(&self, state: &SavedState) {
        self.write_json(TAB_DATA_KEY, &state.tab_data);
        self.write(TAB_NAME_KEY, &state.tab_name);
        self.write_json(SAVED_TABS_KEY, &state.saved_tabs);
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Failed to read stored value: {}", e);
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "Ignoring corrupt stored JSON: {}", e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "Failed to persist: {}", e);
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write(key, &json),
            Err(e) => tracing::warn!(key, "Failed to encode state: {}", e),
        }
    }
}

impl Persistence<FileStore> {
    /// Opens the file store named by the config.
    pub fn open(config: &Config) -> CoreResult<Self> {
        let dir = config.storage_dir()?;
        let store = FileStore::open(&dir)?;
        tracing::debug!("Opened tab store at {}", dir.display());
        Ok(Self::new(store, config.editor.device)
            .with_default_name(config.editor.default_tab_name.clone()))
    }
}
