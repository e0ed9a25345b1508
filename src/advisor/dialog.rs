//! Dialog buttons shared by the upgrade and install flows.

use crate::error::{AdvisorError, Result};
use crate::ui::{PromptOption, PromptResult};

/// Documentation for out-of-date runtimes.
pub const OUTDATED_DOCS_URL: &str = "https://aka.ms/azFuncOutdated";

/// Installation instructions.
pub const INSTALL_DOCS_URL: &str = "https://aka.ms/Dqur4e";

/// A button the user can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Install,
    LearnMore,
    DontWarnAgain,
    SkipForNow,
    Cancel,
}

impl DialogChoice {
    /// Stable identifier, used for scripted answers.
    pub fn value(&self) -> &'static str {
        match self {
            DialogChoice::Install => "install",
            DialogChoice::LearnMore => "learn_more",
            DialogChoice::DontWarnAgain => "dont_warn_again",
            DialogChoice::SkipForNow => "skip_for_now",
            DialogChoice::Cancel => "cancel",
        }
    }

    /// Default button label.
    pub fn label(&self) -> &'static str {
        match self {
            DialogChoice::Install => "Install",
            DialogChoice::LearnMore => "Learn more",
            DialogChoice::DontWarnAgain => "Don't warn again",
            DialogChoice::SkipForNow => "Skip for now",
            DialogChoice::Cancel => "Cancel",
        }
    }

    /// Parse a button identifier.
    pub fn from_value(value: &str) -> Option<Self> {
        [
            DialogChoice::Install,
            DialogChoice::LearnMore,
            DialogChoice::DontWarnAgain,
            DialogChoice::SkipForNow,
            DialogChoice::Cancel,
        ]
        .into_iter()
        .find(|c| c.value() == value)
    }

    /// Button with the default label.
    pub fn option(&self) -> PromptOption {
        PromptOption::new(self.label(), self.value())
    }

    /// Button with a custom label.
    pub fn option_labeled(&self, label: &str) -> PromptOption {
        PromptOption::new(label, self.value())
    }
}

/// Interpret a dialog answer.
///
/// `Ok(None)` means the dialog was dismissed. An answer that is not one of
/// the buttons offered is an error.
pub fn answer(result: &PromptResult, offered: &[DialogChoice]) -> Result<Option<DialogChoice>> {
    let value = match result {
        PromptResult::Dismissed => return Ok(None),
        PromptResult::String(value) => value,
        PromptResult::Bool(_) => {
            return Err(AdvisorError::Prompt {
                message: "expected a button, got a yes/no answer".to_string(),
            })
        }
    };

    match DialogChoice::from_value(value) {
        Some(choice) if offered.contains(&choice) => Ok(Some(choice)),
        _ => Err(AdvisorError::Prompt {
            message: format!("'{}' was not one of the offered buttons", value),
        }),
    }
}
