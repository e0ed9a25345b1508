//! Install command implementation.
//!
//! The `func-advisor install` command runs the first-run install prompt on
//! demand. `--dry-run` prints what would be run instead.

use crate::advisor::{
    HttpTagSource, InstallPlan, PackageManagerResolver, RuntimeChannel, RuntimeVersionAdvisor,
    TagSource,
};
use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::shell::{CommandRunner, SystemRunner};
use crate::state::{FilePreferences, PreferenceStore, SHOW_FUNC_INSTALLATION};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The install command implementation.
pub struct InstallCommand {
    ctx: CommandContext,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(ctx: CommandContext, args: InstallArgs) -> Self {
        Self { ctx, args }
    }

    /// Run the install flow against explicit collaborators.
    pub fn run(
        &self,
        runner: &dyn CommandRunner,
        tags: &dyn TagSource,
        preferences: &mut dyn PreferenceStore,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let channel = self.args.channel.unwrap_or(self.ctx.config.install_channel);

        if self.args.dry_run {
            return Ok(self.dry_run(runner, channel, ui));
        }

        let installed = RuntimeVersionAdvisor::new(runner, tags, preferences, ui)
            .with_platform(self.ctx.platform)
            .with_func_command(&self.ctx.config.func_command)
            .with_install_channel(channel)
            .ensure_installed(self.args.force);

        if installed {
            ui.success("Azure Functions Core Tools is installed");
        } else if !self.args.force && !preferences.get(SHOW_FUNC_INSTALLATION) {
            ui.message(&format!(
                "Install prompt is off (use --force, or `func-advisor settings --enable {}`)",
                SHOW_FUNC_INSTALLATION
            ));
        } else {
            ui.message("Azure Functions Core Tools is not installed");
        }
        Ok(CommandResult::success())
    }

    fn dry_run(
        &self,
        runner: &dyn CommandRunner,
        channel: RuntimeChannel,
        ui: &mut dyn UserInterface,
    ) -> CommandResult {
        let resolver = PackageManagerResolver::for_platform(self.ctx.platform);
        match resolver.resolve(runner, false) {
            Some(manager) => {
                ui.show_header(&format!("Install {} runtime with {}", channel, manager));
                for line in InstallPlan::new(manager, channel).describe() {
                    ui.message(&format!("  {}", line));
                }
            }
            None => ui.warning(&format!(
                "No supported package manager found on {}",
                self.ctx.platform
            )),
        }
        CommandResult::success()
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = SystemRunner::new();
        let tags = HttpTagSource::new(&self.ctx.config.registry_url, self.ctx.config.timeout())?;
        let mut preferences = FilePreferences::load(self.ctx.settings_path())?;
        self.run(&runner, &tags, &mut preferences, ui)
    }
}
