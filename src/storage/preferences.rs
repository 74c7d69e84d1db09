//! String-list preference store backing the dashboard controls.
//!
//! The browser original kept these lists in localStorage; here they sit
//! behind a narrow load/save interface so the API layer never touches files
//! directly. Every value is a list of strings — the theme and auto-scroll
//! flags are single-element lists under the same interface.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

/// Well names the user has hidden from the unified table.
pub const HIDDEN_WELLS_KEY: &str = "hiddenWellNames";

/// Stock item names the user has hidden from the footer cards.
pub const HIDDEN_STOCK_KEY: &str = "hiddenStockItems";

/// Theme choice (`dark` / `light`).
pub const THEME_KEY: &str = "theme";

/// Auto-scroll enabled flag (`true` / `false`).
pub const AUTO_SCROLL_KEY: &str = "autoScroll";

/// Every key the dashboard is allowed to persist.
pub const KNOWN_KEYS: &[&str] = &[HIDDEN_WELLS_KEY, HIDDEN_STOCK_KEY, THEME_KEY, AUTO_SCROLL_KEY];

/// Preference store errors
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("unknown preference key: {0}")]
    UnknownKey(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Trait for pluggable preference backends
///
/// Implementations must be thread-safe (Send + Sync) for shared access
/// across async tasks.
pub trait PreferenceStore: Send + Sync {
    /// Load the string list for `key`. Missing keys yield an empty list.
    fn load(&self, key: &str) -> Result<Vec<String>, PreferenceError>;

    /// Replace the string list for `key`.
    fn save(&self, key: &str, values: &[String]) -> Result<(), PreferenceError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

fn ensure_known(key: &str) -> Result<(), PreferenceError> {
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(PreferenceError::UnknownKey(key.to_string()))
    }
}

// ============================================================================
// In-Memory Store (tests, ephemeral deployments)
// ============================================================================

/// In-memory preference store. Not durable — state lost on restart.
pub struct InMemoryPrefs {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryPrefs {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPrefs {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for InMemoryPrefs {
    fn load(&self, key: &str) -> Result<Vec<String>, PreferenceError> {
        ensure_known(key)?;
        let entries = self
            .entries
            .read()
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, values: &[String]) -> Result<(), PreferenceError> {
        ensure_known(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), values.to_vec());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}

// ============================================================================
// JSON File Store
// ============================================================================

/// File-backed store: one JSON object `{ "key": ["values"] }` per deployment.
///
/// Writes go through a sibling temp file and a rename, so a crash mid-write
/// leaves the previous file intact.
pub struct JsonFilePrefs {
    path: PathBuf,
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl JsonFilePrefs {
    /// Open the store, loading existing preferences. A missing file starts
    /// empty; an unreadable or corrupt file is logged and also starts empty,
    /// matching how the browser original recovered from bad localStorage.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, Vec<String>>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Corrupt preferences file — starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read preferences file — starting empty");
                HashMap::new()
            }
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, Vec<String>>) -> Result<(), PreferenceError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|e| PreferenceError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| PreferenceError::Storage(e.to_string()))?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePrefs {
    fn load(&self, key: &str) -> Result<Vec<String>, PreferenceError> {
        ensure_known(key)?;
        let entries = self
            .entries
            .read()
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    fn save(&self, key: &str, values: &[String]) -> Result<(), PreferenceError> {
        ensure_known(key)?;
        let mut entries = self
            .entries
            .write()
            .map_err(|e| PreferenceError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), values.to_vec());
        self.persist(&entries)
    }

    fn backend_name(&self) -> &'static str {
        "JsonFile"
    }
}
