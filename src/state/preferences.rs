//! User preferences persistence.
//!
//! This module provides the [`PreferenceStore`] seam the advisor reads its
//! "warn me" toggles through, a YAML-file backed [`FilePreferences`] for the
//! CLI, and an in-memory [`MemoryPreferences`] for tests and embedding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AdvisorError, Result};

/// Warn when the installed runtime is older than the registry's tag.
pub const SHOW_CORE_TOOLS_WARNING: &str = "showCoreToolsWarning";

/// Offer to install the runtime when it is missing.
pub const SHOW_FUNC_INSTALLATION: &str = "showFuncInstallation";

/// Every preference key the advisor reads.
pub const KNOWN_KEYS: &[&str] = &[SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION];

/// Key-value store for boolean preferences.
///
/// Unset keys read as `true`: every prompt is enabled until the user
/// explicitly opts out.
pub trait PreferenceStore {
    /// Read a preference.
    fn get(&self, key: &str) -> bool;

    /// Write a preference.
    fn set(&mut self, key: &str, value: bool) -> Result<()>;
}

/// Saved preference flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Explicitly set flags.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl Preferences {
    /// Get a flag, defaulting to `true`.
    pub fn get(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(true)
    }

    /// Set a flag.
    pub fn set(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }
}

/// Preferences persisted as YAML on disk.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    prefs: Preferences,
}

impl FilePreferences {
    /// Default location: `<config dir>/func-advisor/settings.yml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("func-advisor").join("settings.yml"))
    }

    /// Load preferences from `path`; a missing file yields defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                prefs: Preferences::default(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let prefs: Preferences =
            serde_yaml::from_str(&content).map_err(|e| AdvisorError::Settings {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { path, prefs })
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The loaded flags.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Forget every explicitly set flag.
    pub fn reset(&mut self) -> Result<()> {
        self.prefs = Preferences::default();
        self.save()
    }

    /// Save preferences to disk using atomic write.
    ///
    /// Uses the write-to-temp-then-rename pattern to prevent corruption.
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = serde_yaml::to_string(&self.prefs).map_err(|e| AdvisorError::Settings {
            path: self.path.clone(),
            message: format!("Failed to serialize preferences: {}", e),
        })?;

        let temp_path = self.path.with_extension("yml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> bool {
        self.prefs.get(key)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        tracing::debug!("Setting preference {} = {}", key, value);
        self.prefs.set(key, value);
        self.save()
    }
}

/// Preferences held in memory, recording every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    prefs: Preferences,
    writes: Vec<(String, bool)>,
}

impl MemoryPreferences {
    /// Create a store with every flag enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one flag preset.
    pub fn with(mut self, key: &str, value: bool) -> Self {
        self.prefs.set(key, value);
        self
    }

    /// Every `set` call made through the [`PreferenceStore`] trait, in order.
    pub fn writes(&self) -> &[(String, bool)] {
        &self.writes
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> bool {
        self.prefs.get(key)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<()> {
        self.prefs.set(key, value);
        self.writes.push((key.to_string(), value));
        Ok(())
    }
}
