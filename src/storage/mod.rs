//! Preference persistence for dashboard controls.

pub mod preferences;

pub use preferences::{
    InMemoryPrefs, JsonFilePrefs, PreferenceError, PreferenceStore, AUTO_SCROLL_KEY,
    HIDDEN_STOCK_KEY, HIDDEN_WELLS_KEY, KNOWN_KEYS, THEME_KEY,
};
