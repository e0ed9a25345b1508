//! Telemetry wrapper for advisor actions.
//!
//! Every user-facing flow runs inside [`run_with_telemetry`]: the flow records
//! named properties on an [`ActionContext`] as it goes, and the wrapper emits
//! one structured `tracing` event when it finishes. Errors never escape the
//! wrapper; they are logged and handed back inside the [`ActionOutcome`].

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Tracing target for telemetry events.
pub const TELEMETRY_TARGET: &str = "func_advisor::telemetry";

/// Properties collected while an action runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContext {
    name: String,
    properties: BTreeMap<String, String>,
    /// Log failures at `warn` instead of `error`; set by background checks
    /// whose failures the user should not be bothered with.
    pub suppress_error_display: bool,
}

impl ActionContext {
    /// Create an empty context for the named action.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// The action name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a property, replacing any earlier value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.properties.insert(key.to_string(), value.into());
    }

    /// Read a recorded property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All recorded properties.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

/// What happened when an action ran.
#[derive(Debug)]
pub struct ActionOutcome<T> {
    /// The action's value, if it completed.
    pub value: Option<T>,
    /// The error message, if it failed.
    pub error: Option<String>,
    /// Properties recorded by the action.
    pub context: ActionContext,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl<T> ActionOutcome<T> {
    /// Whether the action completed without error.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `action`, record its properties, and swallow its error.
pub fn run_with_telemetry<T, F>(name: &str, action: F) -> ActionOutcome<T>
where
    F: FnOnce(&mut ActionContext) -> Result<T>,
{
    let mut context = ActionContext::new(name);
    let start = Instant::now();
    let result = action(&mut context);
    let duration = start.elapsed();

    let (value, error) = match result {
        Ok(value) => {
            tracing::debug!(
                target: TELEMETRY_TARGET,
                action = name,
                result = "Succeeded",
                duration_ms = duration.as_millis() as u64,
                properties = ?context.properties,
            );
            (Some(value), None)
        }
        Err(e) => {
            let message = e.to_string();
            if context.suppress_error_display {
                tracing::warn!(
                    target: TELEMETRY_TARGET,
                    action = name,
                    result = "Failed",
                    error = %message,
                    properties = ?context.properties,
                );
            } else {
                tracing::error!(
                    target: TELEMETRY_TARGET,
                    action = name,
                    result = "Failed",
                    error = %message,
                    properties = ?context.properties,
                );
            }
            (None, Some(message))
        }
    };

    ActionOutcome {
        value,
        error,
        context,
        duration,
    }
}
