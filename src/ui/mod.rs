//! User interaction.
//!
//! This module provides:
//! - [`UserInterface`] trait, the seam every dialog goes through
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! A warning dialog with buttons is a [`Prompt`] of type
//! [`PromptType::Select`]; dismissing it yields [`PromptResult::Dismissed`].
//!
//! # Example
//!
//! ```
//! use func_advisor::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Azure Functions Core Tools");
//! ui.success("Up to date");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, Theme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Append a line to the output channel shown while installing.
    fn output_line(&mut self, line: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for scripted answers and env overrides).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// Build a warning dialog offering `options`.
    pub fn select(key: &str, question: &str, options: Vec<PromptOption>, modal: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Select { options, modal },
            default: None,
        }
    }

    /// Build a yes/no confirmation.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        }
    }

    /// The options of a select prompt; empty for other prompt types.
    pub fn options(&self) -> &[PromptOption] {
        match &self.prompt_type {
            PromptType::Select { options, .. } => options,
            PromptType::Confirm => &[],
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Select one from a list of options.
    ///
    /// A modal select blocks until an option is chosen; a non-modal one can
    /// be dismissed.
    Select {
        options: Vec<PromptOption>,
        modal: bool,
    },
}

/// An option in a select prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    /// Create an option.
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// Selected option value.
    String(String),
    /// The prompt was closed without choosing anything.
    Dismissed,
}

impl PromptResult {
    /// Get as string; empty when dismissed.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Dismissed => String::new(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the selected value if an option was chosen.
    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("install".into()).as_string(), "install");
        assert_eq!(PromptResult::Dismissed.as_string(), "");
    }

    #[test]
    fn prompt_result_as_bool() {
        assert_eq!(PromptResult::Bool(true).as_bool(), Some(true));
        assert_eq!(PromptResult::String("test".to_string()).as_bool(), None);
        assert_eq!(PromptResult::Dismissed.as_bool(), None);
    }

    #[test]
    fn prompt_result_selected() {
        assert_eq!(
            PromptResult::String("learn_more".into()).selected(),
            Some("learn_more")
        );
        assert_eq!(PromptResult::Dismissed.selected(), None);
        assert_eq!(PromptResult::Bool(true).selected(), None);
    }

    #[test]
    fn select_prompt_stores_options() {
        let prompt = Prompt::select(
            "upgrade_runtime",
            "Update?",
            vec![
                PromptOption::new("Update", "install"),
                PromptOption::new("Learn more", "learn_more"),
            ],
            false,
        );
        assert_eq!(prompt.options().len(), 2);
        assert_eq!(prompt.options()[0].value, "install");
        assert!(matches!(
            prompt.prompt_type,
            PromptType::Select { modal: false, .. }
        ));
    }

    #[test]
    fn confirm_prompt_has_default_and_no_options() {
        let prompt = Prompt::confirm("reset_settings", "Reset?", false);
        assert_eq!(prompt.default.as_deref(), Some("false"));
        assert!(prompt.options().is_empty());
    }
}
