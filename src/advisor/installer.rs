//! Runtime installation through a package manager.
//!
//! An [`InstallPlan`] lists the commands for a `(manager, channel)` pair.
//! [`install`] runs them in order, streaming every output line into the UI,
//! and stops at the first command that fails.

use std::fmt;

use crate::error::{AdvisorError, Result};
use crate::shell::{display_command, CommandRunner};
use crate::ui::UserInterface;

use super::package_manager::{PackageManager, PACKAGE_NAME};
use super::version::RuntimeChannel;

/// Homebrew tap publishing the runtime formula.
pub const BREW_TAP: &str = "azure/functions";

/// One command of an install plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStep {
    /// Executable.
    pub program: &'static str,
    /// Arguments.
    pub args: Vec<String>,
}

impl InstallStep {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Arguments as string slices.
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_command(self.program, &self.arg_refs()))
    }
}

/// Commands that install the runtime for a manager and channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub manager: PackageManager,
    pub channel: RuntimeChannel,
    pub steps: Vec<InstallStep>,
}

impl InstallPlan {
    /// Build the plan for `(manager, channel)`.
    ///
    /// Homebrew ships a single formula, so the channel does not change its
    /// commands.
    pub fn new(manager: PackageManager, channel: RuntimeChannel) -> Self {
        let preview_spec = format!("{}@core", PACKAGE_NAME);
        let steps = match (manager, channel) {
            (PackageManager::Npm, RuntimeChannel::Stable) => {
                vec![InstallStep::new("npm", &["install", "-g", PACKAGE_NAME])]
            }
            (PackageManager::Npm, RuntimeChannel::Preview) => vec![InstallStep::new(
                "npm",
                &["install", "-g", preview_spec.as_str(), "--unsafe-perm", "true"],
            )],
            (PackageManager::Brew, _) => vec![
                InstallStep::new("brew", &["tap", BREW_TAP]),
                InstallStep::new("brew", &["install", PACKAGE_NAME]),
            ],
        };

        Self {
            manager,
            channel,
            steps,
        }
    }

    /// The commands, one per line.
    pub fn describe(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.to_string()).collect()
    }
}

/// Run the install plan for `(manager, channel)`.
pub fn install(
    runner: &dyn CommandRunner,
    manager: PackageManager,
    channel: RuntimeChannel,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let plan = InstallPlan::new(manager, channel);

    for step in &plan.steps {
        let command = step.to_string();
        tracing::info!("Running {}", command);
        ui.output_line(&format!("> {}", command));

        let result = runner.run_streaming(step.program, &step.arg_refs(), &mut |line| {
            ui.output_line(line.text());
        })?;

        if !result.success {
            tracing::debug!("'{}' failed with {:?}", command, result.exit_code);
            return Err(AdvisorError::CommandFailed {
                command,
                code: result.exit_code,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;

    #[test]
    fn npm_plans_per_channel() {
        assert_eq!(
            InstallPlan::new(PackageManager::Npm, RuntimeChannel::Stable).describe(),
            vec!["npm install -g azure-functions-core-tools"]
        );
        assert_eq!(
            InstallPlan::new(PackageManager::Npm, RuntimeChannel::Preview).describe(),
            vec!["npm install -g azure-functions-core-tools@core --unsafe-perm true"]
        );
    }

    #[test]
    fn brew_plan_ignores_channel() {
        let stable = InstallPlan::new(PackageManager::Brew, RuntimeChannel::Stable);
        let preview = InstallPlan::new(PackageManager::Brew, RuntimeChannel::Preview);
        assert_eq!(stable.steps, preview.steps);
        assert_eq!(
            stable.describe(),
            vec![
                "brew tap azure/functions",
                "brew install azure-functions-core-tools"
            ]
        );
    }

    #[test]
    fn install_streams_output() {
        let runner = MockRunner::new();
        runner.respond("brew tap azure/functions", "==> Tapping azure/functions\n");
        runner.respond(
            "brew install azure-functions-core-tools",
            "==> Installing azure-functions-core-tools\n==> Summary\n",
        );
        let mut ui = MockUI::new();

        install(&runner, PackageManager::Brew, RuntimeChannel::Stable, &mut ui).unwrap();

        assert_eq!(
            ui.output(),
            &[
                "> brew tap azure/functions".to_string(),
                "==> Tapping azure/functions".to_string(),
                "> brew install azure-functions-core-tools".to_string(),
                "==> Installing azure-functions-core-tools".to_string(),
                "==> Summary".to_string(),
            ]
        );
    }

    #[test]
    fn install_stops_at_first_failure() {
        let runner = MockRunner::new();
        runner.fail("brew tap azure/functions", 1);
        let mut ui = MockUI::new();

        let err = install(&runner, PackageManager::Brew, RuntimeChannel::Stable, &mut ui)
            .unwrap_err();

        assert!(matches!(
            err,
            AdvisorError::CommandFailed { code: Some(1), .. }
        ));
        assert!(!runner.was_called("brew install azure-functions-core-tools"));
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = install(&runner, PackageManager::Npm, RuntimeChannel::Stable, &mut ui)
            .unwrap_err();
        assert!(err.to_string().contains("npm install -g"));
    }
}
