//! Command-line interface for func-advisor.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CheckArgs, Cli, Commands, CompletionsArgs, InstallArgs, SettingsArgs, StatusArgs,
};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};
