//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

use crate::error::{AdvisorError, Result};

use super::{Prompt, PromptOption, PromptResult, PromptType};

/// Convert dialoguer errors to AdvisorError.
fn map_dialoguer_err(e: dialoguer::Error) -> AdvisorError {
    AdvisorError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Select { options, modal } => prompt_select(prompt, options, *modal, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_ref()
        .map(|s| s.to_lowercase() == "true" || s == "y" || s == "yes")
        .unwrap_or(true);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_select(
    prompt: &Prompt,
    options: &[PromptOption],
    modal: bool,
    term: &Term,
) -> Result<PromptResult> {
    if options.is_empty() {
        return Err(AdvisorError::Prompt {
            message: format!("Prompt '{}' has no options", prompt.key),
        });
    }

    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let theme = prompt_theme();
    let select = Select::with_theme(&theme)
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx);

    // Esc / q closes a non-modal dialog the way clicking it away would
    let selection = if modal {
        Some(select.interact_on(term).map_err(map_dialoguer_err)?)
    } else {
        select.interact_on_opt(term).map_err(map_dialoguer_err)?
    };

    Ok(match selection {
        Some(index) => PromptResult::String(options[index].value.clone()),
        None => PromptResult::Dismissed,
    })
}
