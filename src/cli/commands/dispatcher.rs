//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{CheckArgs, Cli, Commands};
use crate::config::{load_config, AdvisorConfig};
use crate::error::Result;
use crate::shell::Platform;
use crate::state::FilePreferences;
use crate::ui::UserInterface;

/// Used when the platform has no config directory.
const FALLBACK_SETTINGS_FILE: &str = ".func-advisor-settings.yml";

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Resolved configuration.
    pub config: AdvisorConfig,
    /// Preferences file.
    pub settings_path: PathBuf,
    /// Platform used for package manager resolution.
    pub platform: Platform,
}

impl CommandContext {
    /// Resolve configuration from files, environment and global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = load_config(cli.config.as_deref())?;
        if let Some(url) = &cli.registry_url {
            config.registry_url = url.clone();
        }
        if let Some(command) = &cli.func_command {
            config.func_command = command.clone();
        }

        let settings_path = cli
            .settings
            .clone()
            .or_else(FilePreferences::default_path)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_SETTINGS_FILE));

        Ok(Self {
            config,
            settings_path,
            platform: Platform::current(),
        })
    }

    /// The preferences file.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// The resolved command context.
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    ///
    /// With no subcommand, runs the install check followed by the upgrade
    /// check.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match &cli.command {
            Some(Commands::Check(args)) => {
                super::check::CheckCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Install(args)) => {
                super::install::InstallCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Status(args)) => {
                super::status::StatusCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Settings(args)) => {
                super::settings::SettingsCommand::new(ctx, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => {
                let args = CheckArgs {
                    install_check: true,
                };
                super::check::CheckCommand::new(ctx, args).execute(ui)
            }
        }
    }
}
