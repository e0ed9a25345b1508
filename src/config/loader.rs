//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AdvisorError, Result};

use super::AdvisorConfig;

/// Overrides `registry_url`.
pub const ENV_REGISTRY_URL: &str = "FUNC_ADVISOR_REGISTRY_URL";
/// Overrides `timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "FUNC_ADVISOR_TIMEOUT_SECS";
/// Overrides `install_channel`.
pub const ENV_INSTALL_CHANNEL: &str = "FUNC_ADVISOR_INSTALL_CHANNEL";

/// `<config dir>/func-advisor`, if the platform has a config directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("func-advisor"))
}

/// `<config dir>/func-advisor/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.yml"))
}

/// Load the config file at `path`, or defaults when it does not exist.
pub fn load_config_from(path: &Path) -> Result<AdvisorConfig> {
    if !path.exists() {
        tracing::debug!("No config file at {}", path.display());
        return Ok(AdvisorConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AdvisorConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| AdvisorError::Settings {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration from `path` (or the default location) and apply the
/// process environment.
pub fn load_config(path: Option<&Path>) -> Result<AdvisorConfig> {
    let config = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_config_from(&path)?,
        None => AdvisorConfig::default(),
    };
    apply_env(config, |key| std::env::var(key).ok())
}

/// Apply `FUNC_ADVISOR_*` overrides read through `lookup`.
pub fn apply_env<F>(mut config: AdvisorConfig, lookup: F) -> Result<AdvisorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_REGISTRY_URL).filter(|v| !v.trim().is_empty()) {
        config.registry_url = url;
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.timeout_secs = raw.trim().parse().map_err(|_| invalid_env(ENV_TIMEOUT_SECS, &raw))?;
    }

    if let Some(raw) = lookup(ENV_INSTALL_CHANNEL) {
        config.install_channel = raw.parse().map_err(|_| invalid_env(ENV_INSTALL_CHANNEL, &raw))?;
    }

    Ok(config)
}

fn invalid_env(key: &str, value: &str) -> AdvisorError {
    AdvisorError::Settings {
        path: PathBuf::from(format!("${}", key)),
        message: format!("invalid value '{}'", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::RuntimeChannel;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.yml")).unwrap();
        assert_eq!(config, AdvisorConfig::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(load_config_from(&path).unwrap(), AdvisorConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(
            &path,
            "registry_url: http://localhost:9000/tags\ntimeout_secs: 2\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.registry_url, "http://localhost:9000/tags");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn malformed_file_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "timeout_secs: [soon]\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.yml"));
    }

    #[test]
    fn env_overrides_file() {
        let config = apply_env(
            AdvisorConfig::default(),
            env(&[
                (ENV_REGISTRY_URL, "http://mirror/tags"),
                (ENV_TIMEOUT_SECS, "30"),
                (ENV_INSTALL_CHANNEL, "stable"),
            ]),
        )
        .unwrap();

        assert_eq!(config.registry_url, "http://mirror/tags");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.install_channel, RuntimeChannel::Stable);
    }

    #[test]
    fn blank_registry_override_is_ignored() {
        let config = apply_env(AdvisorConfig::default(), env(&[(ENV_REGISTRY_URL, " ")])).unwrap();
        assert_eq!(config.registry_url, AdvisorConfig::default().registry_url);
    }

    #[test]
    fn invalid_env_values_are_errors() {
        assert!(apply_env(AdvisorConfig::default(), env(&[(ENV_TIMEOUT_SECS, "ten")])).is_err());
        assert!(
            apply_env(AdvisorConfig::default(), env(&[(ENV_INSTALL_CHANNEL, "nightly")])).is_err()
        );
    }

    #[test]
    fn explicit_path_is_used() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.yml");
        fs::write(&path, "func_command: func-preview\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.func_command, "func-preview");
    }
}
