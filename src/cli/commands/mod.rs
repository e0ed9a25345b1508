//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that touch the runtime
//! also expose a `run` method taking their collaborators explicitly, so the
//! flows can be exercised without spawning processes or reaching the network.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod settings;
pub mod status;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};
pub use status::RuntimeStatus;
