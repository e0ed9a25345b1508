//! Package manager resolution.
//!
//! Each platform has an ordered list of candidate managers. The first one
//! whose detection command succeeds is used to install the runtime.

use std::fmt;

use crate::shell::{display_command, CommandRunner, Platform};

/// Package name of the runtime in both npm and Homebrew.
pub const PACKAGE_NAME: &str = "azure-functions-core-tools";

/// A package manager able to install the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Brew,
}

impl PackageManager {
    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Brew => "brew",
        }
    }

    /// Detection arguments.
    ///
    /// When the runtime is already installed the manager is only usable if
    /// it owns the installed package; otherwise any working install will do.
    pub fn detection_args(&self, already_installed: bool) -> &'static [&'static str] {
        match (self, already_installed) {
            (PackageManager::Brew, true) => &["ls", PACKAGE_NAME],
            (PackageManager::Npm, true) => &["ls", "-g", PACKAGE_NAME],
            (_, false) => &["--version"],
        }
    }

    /// Whether this manager's detection command succeeds.
    pub fn detect(&self, runner: &dyn CommandRunner, already_installed: bool) -> bool {
        let args = self.detection_args(already_installed);
        match runner.run(self.program(), args) {
            Ok(result) if result.success => true,
            Ok(result) => {
                tracing::debug!(
                    "'{}' exited with {:?}",
                    display_command(self.program(), args),
                    result.exit_code
                );
                false
            }
            Err(e) => {
                tracing::debug!("{} not usable: {}", self, e);
                false
            }
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Brew => write!(f, "Homebrew"),
        }
    }
}

/// Picks a package manager from a platform's candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerResolver {
    candidates: Vec<PackageManager>,
}

impl PackageManagerResolver {
    /// Candidates for a platform, in priority order.
    ///
    /// Linux has none, so nothing is ever offered there.
    pub fn for_platform(platform: Platform) -> Self {
        let candidates = match platform {
            Platform::Linux => vec![],
            Platform::MacOs => vec![PackageManager::Brew, PackageManager::Npm],
            Platform::Windows | Platform::Other => vec![PackageManager::Npm],
        };
        Self { candidates }
    }

    /// Candidates for the running platform.
    pub fn current() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Candidates in priority order.
    pub fn candidates(&self) -> &[PackageManager] {
        &self.candidates
    }

    /// The first candidate whose detection succeeds.
    pub fn resolve(
        &self,
        runner: &dyn CommandRunner,
        already_installed: bool,
    ) -> Option<PackageManager> {
        let found = self
            .candidates
            .iter()
            .copied()
            .find(|manager| manager.detect(runner, already_installed));
        tracing::debug!(
            "Package manager (already installed: {}): {:?}",
            already_installed,
            found
        );
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    #[test]
    fn candidates_per_platform() {
        assert!(PackageManagerResolver::for_platform(Platform::Linux)
            .candidates()
            .is_empty());
        assert_eq!(
            PackageManagerResolver::for_platform(Platform::MacOs).candidates(),
            &[PackageManager::Brew, PackageManager::Npm]
        );
        assert_eq!(
            PackageManagerResolver::for_platform(Platform::Windows).candidates(),
            &[PackageManager::Npm]
        );
        assert_eq!(
            PackageManagerResolver::for_platform(Platform::Other).candidates(),
            &[PackageManager::Npm]
        );
    }

    #[test]
    fn macos_falls_back_to_npm_when_brew_fails() {
        let runner = MockRunner::new();
        runner.fail("brew ls azure-functions-core-tools", 1);
        runner.respond("npm ls -g azure-functions-core-tools", "/usr/local/lib\n");

        let resolver = PackageManagerResolver::for_platform(Platform::MacOs);
        assert_eq!(resolver.resolve(&runner, true), Some(PackageManager::Npm));
        assert_eq!(
            runner.calls(),
            vec![
                "brew ls azure-functions-core-tools",
                "npm ls -g azure-functions-core-tools"
            ]
        );
    }

    #[test]
    fn macos_prefers_brew() {
        let runner = MockRunner::new();
        runner.respond("brew --version", "Homebrew 4.2.0\n");
        runner.respond("npm --version", "10.2.0\n");

        let resolver = PackageManagerResolver::for_platform(Platform::MacOs);
        assert_eq!(resolver.resolve(&runner, false), Some(PackageManager::Brew));
        assert!(!runner.was_called("npm --version"));
    }

    #[test]
    fn not_installed_uses_version_probe() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");

        let resolver = PackageManagerResolver::for_platform(Platform::Windows);
        assert_eq!(resolver.resolve(&runner, false), Some(PackageManager::Npm));
        assert_eq!(runner.calls(), vec!["npm --version"]);
    }

    #[test]
    fn linux_never_probes() {
        let runner = MockRunner::new();
        runner.respond("npm --version", "10.2.0\n");

        let resolver = PackageManagerResolver::for_platform(Platform::Linux);
        assert_eq!(resolver.resolve(&runner, false), None);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn nothing_detected_is_none() {
        let runner = MockRunner::new();
        let resolver = PackageManagerResolver::for_platform(Platform::MacOs);
        assert_eq!(resolver.resolve(&runner, true), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(PackageManager::Brew.to_string(), "Homebrew");
        assert_eq!(PackageManager::Npm.program(), "npm");
    }
}
