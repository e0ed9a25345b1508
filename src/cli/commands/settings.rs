//! Settings command implementation.
//!
//! The `func-advisor settings` command shows and changes the "don't ask
//! again" flags written by the prompts.

use crate::cli::args::SettingsArgs;
use crate::error::Result;
use crate::state::{FilePreferences, PreferenceStore, KNOWN_KEYS};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Prompt key for the reset confirmation.
pub const RESET_PROMPT_KEY: &str = "reset_settings";

/// The settings command implementation.
pub struct SettingsCommand {
    ctx: CommandContext,
    args: SettingsArgs,
}

impl SettingsCommand {
    /// Create a new settings command.
    pub fn new(ctx: CommandContext, args: SettingsArgs) -> Self {
        Self { ctx, args }
    }

    /// Apply the requested changes to `preferences` and print the result.
    pub fn run(
        &self,
        preferences: &mut FilePreferences,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        if self.args.reset {
            let prompt = Prompt::confirm(RESET_PROMPT_KEY, "Turn every prompt back on?", true);
            if ui.prompt(&prompt)?.as_bool().unwrap_or(false) {
                preferences.reset()?;
                ui.success("Preferences reset");
            } else {
                ui.message("Preferences left unchanged");
            }
        }

        for key in &self.args.enable {
            preferences.set(key, true)?;
        }
        for key in &self.args.disable {
            preferences.set(key, false)?;
        }

        ui.show_header("Prompts");
        for key in KNOWN_KEYS {
            let state = if preferences.get(key) { "on" } else { "off" };
            ui.message(&format!("  {:<22} {}", key, state));
        }
        ui.message(&format!("\n  Stored in {}", preferences.path().display()));

        Ok(CommandResult::success())
    }
}

impl Command for SettingsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut preferences = FilePreferences::load(self.ctx.settings_path())?;
        self.run(&mut preferences, ui)
    }
}
