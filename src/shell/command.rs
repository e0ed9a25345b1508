//! Subprocess execution.
//!
//! Every external program the advisor touches (`func`, `npm`, `brew`, the
//! URL opener) goes through the [`CommandRunner`] trait so that the probe,
//! resolver and installer can be driven by a scripted runner in tests.

use crate::error::{AdvisorError, Result};
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The text of the line regardless of which stream produced it.
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(line) | OutputLine::Stderr(line) => line,
        }
    }
}

/// Render a program and its arguments the way a user would type them.
pub fn display_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs external programs.
///
/// `run` returns `Err` only when the program could not be started; a
/// non-zero exit is reported through [`CommandResult::success`].
pub trait CommandRunner {
    /// Run a program to completion, capturing its output.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult>;

    /// Run a program, handing each output line to `on_line` as it arrives.
    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult>;

    /// Run a program and return its stdout, treating a non-zero exit as an error.
    fn output(&self, program: &str, args: &[&str]) -> Result<String> {
        let result = self.run(program, args)?;
        if result.success {
            Ok(result.stdout)
        } else {
            Err(AdvisorError::CommandFailed {
                command: display_command(program, args),
                code: result.exit_code,
            })
        }
    }

    /// Check whether a program runs and exits successfully.
    fn succeeds(&self, program: &str, args: &[&str]) -> bool {
        self.run(program, args)
            .map(|r| r.success)
            .unwrap_or(false)
    }
}

/// [`CommandRunner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    pub fn new() -> Self {
        Self
    }

    /// Build the process for a program.
    ///
    /// On Windows, package managers ship as `.cmd` shims that `CreateProcess`
    /// cannot start directly, so everything goes through `cmd /C`.
    fn command(program: &str, args: &[&str]) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(program).args(args);
            cmd
        } else {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult> {
        let start = Instant::now();
        let command = display_command(program, args);
        tracing::debug!("Running: {}", command);

        let output = Self::command(program, args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                tracing::debug!("Failed to start '{}': {}", command, e);
                AdvisorError::CommandFailed {
                    command: command.clone(),
                    code: None,
                }
            })?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult> {
        let start = Instant::now();
        let command = display_command(program, args);
        tracing::debug!("Running (streaming): {}", command);

        let spawn_failed = || AdvisorError::CommandFailed {
            command: command.clone(),
            code: None,
        };

        let mut child = Self::command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|_| spawn_failed())?;

        let stdout = child.stdout.take().ok_or_else(spawn_failed)?;
        let stderr = child.stderr.take().ok_or_else(spawn_failed)?;

        let (tx, rx) = mpsc::channel();
        let tx_stdout = tx.clone();
        let tx_stderr = tx;

        let stdout_handle = thread::spawn(move || {
            let reader = BufReader::new(stdout);
            let mut output = String::new();
            for line in reader.lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx_stdout.send(OutputLine::Stdout(line));
            }
            output
        });

        let stderr_handle = thread::spawn(move || {
            let reader = BufReader::new(stderr);
            let mut output = String::new();
            for line in reader.lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx_stderr.send(OutputLine::Stderr(line));
            }
            output
        });

        for line in rx {
            on_line(line);
        }

        let stdout_output = stdout_handle.join().unwrap_or_default();
        let stderr_output = stderr_handle.join().unwrap_or_default();

        let status = child.wait().map_err(|_| spawn_failed())?;
        let duration = start.elapsed();

        if status.success() {
            Ok(CommandResult::success(
                stdout_output,
                stderr_output,
                duration,
            ))
        } else {
            Ok(CommandResult::failure(
                status.code(),
                stdout_output,
                stderr_output,
                duration,
            ))
        }
    }
}
