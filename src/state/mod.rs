//! Persistent user preferences.
//!
//! The advisor owns no data model of its own; the only state that outlives
//! a check cycle is the pair of "warn me" toggles the user can switch off.

pub mod preferences;

pub use preferences::{
    FilePreferences, MemoryPreferences, PreferenceStore, Preferences, KNOWN_KEYS,
    SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION,
};
