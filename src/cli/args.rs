//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::advisor::RuntimeChannel;
use crate::state::{SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION};

/// func-advisor - Keep Azure Functions Core Tools installed and up to date.
#[derive(Debug, Parser)]
#[command(name = "func-advisor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides <config dir>/func-advisor/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the preferences file (overrides <config dir>/func-advisor/settings.yml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Distribution tag registry URL
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    /// Runtime executable to probe
    #[arg(long, global = true)]
    pub func_command: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never show interactive prompts (answers come from FUNC_ADVISOR_PROMPT_* variables)
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check for a newer runtime and offer to update (default if no command specified)
    Check(CheckArgs),

    /// Offer to install the runtime if it is missing
    Install(InstallArgs),

    /// Show installed and published runtime versions
    Status(StatusArgs),

    /// Show or change which prompts are enabled
    Settings(SettingsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Offer to install the runtime first if it is missing
    #[arg(long)]
    pub install_check: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Prompt even if the install prompt was turned off; the prompt cannot be dismissed
    #[arg(short, long)]
    pub force: bool,

    /// Channel to install (stable or preview)
    #[arg(long)]
    pub channel: Option<RuntimeChannel>,

    /// Print the install commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `settings` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SettingsArgs {
    /// Turn a prompt back on
    #[arg(long, value_name = "KEY", value_parser = [SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION])]
    pub enable: Vec<String>,

    /// Turn a prompt off
    #[arg(long, value_name = "KEY", value_parser = [SHOW_CORE_TOOLS_WARNING, SHOW_FUNC_INSTALLATION])]
    pub disable: Vec<String>,

    /// Turn every prompt back on
    #[arg(long)]
    pub reset: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
