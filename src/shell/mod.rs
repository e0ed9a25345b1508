//! Subprocess execution and platform integration.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{display_command, CommandResult, CommandRunner, OutputLine, SystemRunner};
pub use mock::MockRunner;
pub use platform::{is_ci, open_url, Platform};
