//! Advisor configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `<config dir>/func-advisor/config.yml`
//! 3. `FUNC_ADVISOR_*` environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! # Example
//!
//! ```
//! use func_advisor::config::AdvisorConfig;
//!
//! let config: AdvisorConfig = serde_yaml::from_str("timeout_secs: 3").unwrap();
//! assert_eq!(config.timeout_secs, 3);
//! assert_eq!(config.registry_url, "https://aka.ms/W2mvv3");
//! ```

pub mod loader;

pub use loader::{apply_env, config_dir, default_config_path, load_config, load_config_from};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::advisor::probe::FUNC_COMMAND;
use crate::advisor::remote::DIST_TAGS_URL;
use crate::advisor::RuntimeChannel;

/// Default HTTP timeout for the registry lookup.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Advisor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Distribution tag document.
    pub registry_url: String,
    /// Registry request timeout in seconds.
    pub timeout_secs: u64,
    /// Channel installed by the first-run prompt.
    pub install_channel: RuntimeChannel,
    /// Runtime executable.
    pub func_command: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            registry_url: DIST_TAGS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            install_channel: RuntimeChannel::Preview,
            func_command: FUNC_COMMAND.to_string(),
        }
    }
}

impl AdvisorConfig {
    /// The registry timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
