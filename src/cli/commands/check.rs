//! Check command implementation.
//!
//! The `func-advisor check` command runs one upgrade check cycle, optionally
//! preceded by the first-run install prompt.

use crate::advisor::remote::LATEST_RUNTIME_ERROR;
use crate::advisor::{
    CheckOutcome, CheckReport, HttpTagSource, RuntimeVersionAdvisor, TagSource, UpgradeResult,
};
use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::shell::{CommandRunner, SystemRunner};
use crate::state::{FilePreferences, PreferenceStore, SHOW_CORE_TOOLS_WARNING};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    ctx: CommandContext,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(ctx: CommandContext, args: CheckArgs) -> Self {
        Self { ctx, args }
    }

    /// Run the cycle against explicit collaborators.
    pub fn run(
        &self,
        runner: &dyn CommandRunner,
        tags: &dyn TagSource,
        preferences: &mut dyn PreferenceStore,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = {
            let mut advisor = RuntimeVersionAdvisor::new(runner, tags, preferences, ui)
                .with_platform(self.ctx.platform)
                .with_func_command(&self.ctx.config.func_command)
                .with_install_channel(self.ctx.config.install_channel);

            if self.args.install_check {
                advisor.ensure_installed(false);
            }
            advisor.check()
        };

        describe(&report, ui);
        Ok(CommandResult::success())
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = SystemRunner::new();
        let tags = HttpTagSource::new(&self.ctx.config.registry_url, self.ctx.config.timeout())?;
        let mut preferences = FilePreferences::load(self.ctx.settings_path())?;
        self.run(&runner, &tags, &mut preferences, ui)
    }
}

/// Tell the user where the cycle stopped.
fn describe(report: &CheckReport, ui: &mut dyn UserInterface) {
    match &report.outcome {
        CheckOutcome::Disabled => ui.message(&format!(
            "Update warnings are off (turn them on with `func-advisor settings --enable {}`)",
            SHOW_CORE_TOOLS_WARNING
        )),
        CheckOutcome::NotInstalled => ui.warning("Azure Functions Core Tools not found"),
        CheckOutcome::UnknownChannel { local } => ui.message(&format!(
            "Azure Functions Core Tools {} is not on a known release channel",
            local
        )),
        CheckOutcome::RegistryUnavailable { local } => {
            let reason = report
                .telemetry
                .property(LATEST_RUNTIME_ERROR)
                .unwrap_or("unknown error");
            ui.warning(&format!(
                "Could not look up the latest version for {}: {}",
                local, reason
            ));
        }
        CheckOutcome::UpToDate { local, .. } => {
            ui.success(&format!("Azure Functions Core Tools {} is up to date", local))
        }
        CheckOutcome::Upgrade { result, .. } => match result {
            UpgradeResult::Silenced => ui.message("You will not be warned about updates again"),
            UpgradeResult::InstallFailed { reason } => ui.error(reason),
            UpgradeResult::Installed | UpgradeResult::Dismissed => {}
        },
        CheckOutcome::Failed { reason } => ui.warning(&format!("Check failed: {}", reason)),
    }
}
