//! func-advisor - Keep Azure Functions Core Tools installed and up to date.
//!
//! The advisor probes the locally installed `func` runtime, compares it with
//! the newest release published on the same channel, and offers to install
//! or upgrade it through npm or Homebrew.
//!
//! # Modules
//!
//! - [`advisor`] - Version probing, lookup, decision, and the two prompt flows
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading from file and environment
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Subprocess execution and platform integration
//! - [`state`] - Persisted "don't ask again" preferences
//! - [`telemetry`] - Action wrapper recording properties and swallowing errors
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use func_advisor::advisor::{decide, RuntimeChannel};
//! use semver::Version;
//!
//! let local = Version::parse("2.0.1-beta.25").unwrap();
//! let remote = Version::parse("2.7.1").unwrap();
//! let rec = decide(&local, &remote, RuntimeChannel::Preview).unwrap();
//! assert_eq!(rec.remote, remote);
//! ```

pub mod advisor;
pub mod cli;
pub mod config;
pub mod error;
pub mod shell;
pub mod state;
pub mod telemetry;
pub mod ui;

pub use error::{AdvisorError, Result};
