//! Platform detection and desktop integration.

use std::fmt;

use crate::error::Result;

use super::command::CommandRunner;

/// Operating system family, as far as package manager support is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Parse a platform from a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// Program and leading arguments used to open a URL in the default browser.
    fn opener(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Platform::MacOs => Some(("open", &[])),
            Platform::Linux => Some(("xdg-open", &[])),
            Platform::Windows => Some(("cmd", &["/c", "start", ""])),
            Platform::Other => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// Open a documentation link in the user's browser.
///
/// Returns `Ok(false)` when the platform has no known opener.
pub fn open_url(runner: &dyn CommandRunner, platform: Platform, url: &str) -> Result<bool> {
    let Some((program, leading)) = platform.opener() else {
        tracing::debug!("No URL opener for platform {}", platform);
        return Ok(false);
    };

    let mut args: Vec<&str> = leading.to_vec();
    args.push(url);
    runner.output(program, &args)?;
    Ok(true)
}

/// Check if running in a CI environment.
///
/// Used to auto-detect CI and force non-interactive mode in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`, `TF_BUILD`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
        || std::env::var("TF_BUILD").is_ok()
}
