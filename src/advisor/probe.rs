//! Local runtime version probe.
//!
//! Runs the runtime's banner (`func` with no arguments), pulls the version
//! out of the `Azure Functions Core Tools (x.y.z)` line, and parses it.
//! Every failure collapses to `None`; the reason is logged at debug level.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::shell::CommandRunner;

use super::version::{normalize, parse_version};

/// Default name of the runtime executable.
pub const FUNC_COMMAND: &str = "func";

/// Matches the banner line carrying the runtime version.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:.*)Azure Functions Core Tools (.*)").expect("VERSION_LINE must compile")
});

/// Extract the raw version string from the runtime banner.
///
/// Parentheses are stripped from the capture and whitespace trimmed; no
/// other cleanup happens.
pub fn extract_version(output: &str) -> Option<String> {
    let captures = VERSION_LINE.captures(output)?;
    let raw = captures.get(1)?.as_str().replace(['(', ')'], "");
    Some(raw.trim().to_string())
}

/// Extract, normalize and parse the version from the runtime banner.
pub fn parse_local_version(output: &str) -> Option<Version> {
    let raw = extract_version(output)?;
    let fixed = normalize(&raw);
    let version = parse_version(&fixed);
    if version.is_none() {
        tracing::debug!("Runtime reported a non-semver version '{}'", fixed);
    }
    version
}

/// Discovers the installed runtime's version.
pub struct LocalVersionProbe<'a> {
    runner: &'a dyn CommandRunner,
    command: &'a str,
}

impl<'a> LocalVersionProbe<'a> {
    /// Probe the default `func` executable.
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self::with_command(runner, FUNC_COMMAND)
    }

    /// Probe a specific runtime executable.
    pub fn with_command(runner: &'a dyn CommandRunner, command: &'a str) -> Self {
        Self { runner, command }
    }

    /// The installed version, or `None` if it cannot be determined.
    pub fn probe(&self) -> Option<Version> {
        match self.runner.output(self.command, &[]) {
            Ok(output) => {
                let version = parse_local_version(&output);
                if version.is_none() {
                    tracing::debug!("No version line in output of '{}'", self.command);
                }
                version
            }
            Err(e) => {
                tracing::debug!("Runtime probe failed: {}", e);
                None
            }
        }
    }

    /// Whether `func --version` runs and exits successfully.
    pub fn is_installed(&self) -> bool {
        let installed = self.runner.succeeds(self.command, &["--version"]);
        tracing::debug!("Runtime installed: {}", installed);
        installed
    }
}
