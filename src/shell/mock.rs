//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything.
//! Each command line is answered from a queue of scripted results; a command
//! with no script behaves like a program that is not installed.
//!
//! # Example
//!
//! ```
//! use func_advisor::shell::{CommandRunner, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.respond("npm --version", "10.2.0\n");
//! runner.fail("brew --version", 127);
//!
//! assert!(runner.succeeds("npm", &["--version"]));
//! assert!(!runner.succeeds("brew", &["--version"]));
//! assert!(!runner.succeeds("func", &["--version"]));
//! assert!(runner.was_called("brew --version"));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::error::{AdvisorError, Result};

use super::command::{display_command, CommandResult, CommandRunner, OutputLine};

/// Command runner that answers from scripted results.
#[derive(Debug, Default)]
pub struct MockRunner {
    scripts: RefCell<HashMap<String, VecDeque<CommandResult>>>,
    fallbacks: RefCell<HashMap<String, CommandResult>>,
    calls: RefCell<Vec<String>>,
}

impl MockRunner {
    /// Create a runner where every command is missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with a successful run printing `stdout`.
    ///
    /// The answer is reused for every later call unless more answers are queued.
    pub fn respond(&self, command: &str, stdout: &str) {
        self.push(
            command,
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO),
        );
    }

    /// Answer `command` with a failed run exiting with `code`.
    pub fn fail(&self, command: &str, code: i32) {
        self.push(
            command,
            CommandResult::failure(Some(code), String::new(), String::new(), Duration::ZERO),
        );
    }

    /// Queue a full result for `command`.
    pub fn push(&self, command: &str, result: CommandResult) {
        self.fallbacks
            .borrow_mut()
            .insert(command.to_string(), result.clone());
        self.scripts
            .borrow_mut()
            .entry(command.to_string())
            .or_default()
            .push_back(result);
    }

    /// All command lines that were run, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Check whether a command line was run.
    pub fn was_called(&self, command: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == command)
    }

    fn answer(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        let command = display_command(program, args);
        self.calls.borrow_mut().push(command.clone());

        let queued = self
            .scripts
            .borrow_mut()
            .get_mut(&command)
            .and_then(|queue| queue.pop_front());
        if let Some(result) = queued {
            return Ok(result);
        }
        if let Some(result) = self.fallbacks.borrow().get(&command) {
            return Ok(result.clone());
        }

        Err(AdvisorError::CommandFailed {
            command,
            code: None,
        })
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        self.answer(program, args)
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult> {
        let result = self.answer(program, args)?;
        for line in result.stdout.lines() {
            on_line(OutputLine::Stdout(line.to_string()));
        }
        for line in result.stderr.lines() {
            on_line(OutputLine::Stderr(line.to_string()));
        }
        Ok(result)
    }
}
