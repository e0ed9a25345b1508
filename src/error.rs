//! Error types for func-advisor operations.
//!
//! This module defines [`AdvisorError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe and lookup failures are not errors: they collapse to `None`
//!   at the component boundary and are only logged
//! - Use `AdvisorError` for failures that reach the CLI or the telemetry wrapper
//! - Use `anyhow::Error` (via `AdvisorError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for func-advisor operations.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// A subprocess could not be spawned or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// The distribution tag registry could not be queried.
    #[error("Failed to query registry {url}: {message}")]
    Registry { url: String, message: String },

    /// The preferences or config file could not be read or written.
    #[error("Settings error at {path}: {message}")]
    Settings { path: PathBuf, message: String },

    /// A prompt could not be shown or returned an unexpected answer.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for func-advisor operations.
pub type Result<T> = std::result::Result<T, AdvisorError>;
