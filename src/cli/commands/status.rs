//! Status command implementation.
//!
//! The `func-advisor status` command reports what a check cycle would see
//! without prompting or installing anything.

use serde::Serialize;

use crate::advisor::remote::LATEST_RUNTIME_ERROR;
use crate::advisor::{
    decide, HttpTagSource, LocalVersionProbe, PackageManagerResolver, RemoteVersionLookup,
    RuntimeChannel, TagSource,
};
use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::shell::{CommandRunner, Platform, SystemRunner};
use crate::state::{FilePreferences, PreferenceStore, SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION};
use crate::telemetry::ActionContext;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Snapshot of the runtime and its registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStatus {
    pub platform: String,
    pub local_version: Option<String>,
    pub channel: Option<RuntimeChannel>,
    pub latest_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_error: Option<String>,
    pub package_manager: Option<String>,
    pub update_available: bool,
    pub show_core_tools_warning: bool,
    pub show_func_installation: bool,
}

impl RuntimeStatus {
    /// Gather the status through the given collaborators.
    pub fn collect(
        runner: &dyn CommandRunner,
        tags: &dyn TagSource,
        preferences: &dyn PreferenceStore,
        platform: Platform,
        func_command: &str,
    ) -> Self {
        let local = LocalVersionProbe::with_command(runner, func_command).probe();
        let channel = local
            .as_ref()
            .and_then(|v| crate::advisor::classify(v.major).channel());

        let mut ctx = ActionContext::new("status");
        let latest = channel.and_then(|c| RemoteVersionLookup::new(tags).fetch(c, &mut ctx));

        let update_available = match (&local, &latest, channel) {
            (Some(local), Some(latest), Some(channel)) => {
                decide(local, latest, channel).is_some()
            }
            _ => false,
        };

        let manager = PackageManagerResolver::for_platform(platform).resolve(runner, local.is_some());

        Self {
            platform: platform.to_string(),
            local_version: local.map(|v| v.to_string()),
            channel,
            latest_version: latest.map(|v| v.to_string()),
            registry_error: ctx.property(LATEST_RUNTIME_ERROR).map(String::from),
            package_manager: manager.map(|m| m.to_string()),
            update_available,
            show_core_tools_warning: preferences.get(SHOW_CORE_TOOLS_WARNING),
            show_func_installation: preferences.get(SHOW_FUNC_INSTALLATION),
        }
    }

    /// Print for humans.
    pub fn render(&self, ui: &mut dyn UserInterface) {
        ui.show_header("Azure Functions Core Tools");

        match (&self.local_version, self.channel) {
            (Some(version), Some(channel)) => {
                ui.message(&format!("  Installed:       {} ({})", version, channel))
            }
            (Some(version), None) => {
                ui.message(&format!("  Installed:       {} (unknown channel)", version))
            }
            (None, _) => ui.message("  Installed:       not found"),
        }

        match (&self.latest_version, &self.registry_error) {
            (Some(latest), _) => ui.message(&format!("  Latest:          {}", latest)),
            (None, Some(error)) => ui.message(&format!("  Latest:          unavailable ({})", error)),
            (None, None) => ui.message("  Latest:          -"),
        }

        ui.message(&format!(
            "  Package manager: {}",
            self.package_manager.as_deref().unwrap_or("none")
        ));
        ui.message(&format!("  Platform:        {}", self.platform));
        ui.message(&format!(
            "  Prompts:         update {}, install {}",
            on_off(self.show_core_tools_warning),
            on_off(self.show_func_installation)
        ));

        if self.update_available {
            if let Some(latest) = &self.latest_version {
                ui.warning(&format!(
                    "Update available: run `func-advisor check` to install {}",
                    latest
                ));
            }
        }
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// The status command implementation.
pub struct StatusCommand {
    ctx: CommandContext,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(ctx: CommandContext, args: StatusArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let runner = SystemRunner::new();
        let tags = HttpTagSource::new(&self.ctx.config.registry_url, self.ctx.config.timeout())?;
        let preferences = FilePreferences::load(self.ctx.settings_path())?;

        let collect = || {
            RuntimeStatus::collect(
                &runner,
                &tags,
                &preferences,
                self.ctx.platform,
                &self.ctx.config.func_command,
            )
        };

        // Keep stdout clean for JSON consumers.
        if self.args.json {
            let json = serde_json::to_string_pretty(&collect()).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        let mut spinner = ui.start_spinner("Checking Azure Functions Core Tools...");
        let status = collect();
        spinner.finish_success("Done");
        status.render(ui);

        Ok(CommandResult::success())
    }
}
