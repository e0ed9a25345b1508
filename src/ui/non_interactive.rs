//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{AdvisorError, Result};

use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
const PROMPT_ENV_PREFIX: &str = "FUNC_ADVISOR_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `FUNC_ADVISOR_PROMPT_<KEY>` environment
/// variables, then from the prompt default. Each variable answers its key
/// once; a prompt shown again falls back to the default. A dialog with
/// neither is dismissed; a modal one is an error, since nobody can answer it.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer_for(&mut self, prompt: &Prompt) -> Option<String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        self.env_overrides
            .remove(&env_key)
            .or_else(|| prompt.default.clone())
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn output_line(&mut self, line: &str) {
        if self.mode.shows_command_output() {
            println!("  │ {}", line);
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self.answer_for(prompt);

        match &prompt.prompt_type {
            PromptType::Confirm => match answer {
                Some(value) => Ok(PromptResult::Bool(matches!(
                    value.to_lowercase().as_str(),
                    "true" | "yes" | "y" | "1"
                ))),
                None => Err(AdvisorError::Prompt {
                    message: format!(
                        "Cannot prompt for '{}' in non-interactive mode (no default value)",
                        prompt.key
                    ),
                }),
            },
            PromptType::Select { options, modal } => {
                if self.mode.shows_status() {
                    eprintln!("⚠ {}", prompt.question);
                }
                match answer {
                    Some(value) if options.iter().any(|o| o.value == value) => {
                        Ok(PromptResult::String(value))
                    }
                    Some(value) => Err(AdvisorError::Prompt {
                        message: format!("'{}' is not an option for '{}'", value, prompt.key),
                    }),
                    None if *modal => Err(AdvisorError::Prompt {
                        message: format!(
                            "Cannot answer '{}' in non-interactive mode (set {}{})",
                            prompt.key,
                            PROMPT_ENV_PREFIX,
                            prompt.key.to_uppercase()
                        ),
                    }),
                    None => Ok(PromptResult::Dismissed),
                }
            }
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints its final status.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("  ✓ {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("  ✗ {}", msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("  ○ {}", msg);
    }
}
