//! External process execution.
//!
//! Every call to `security` and `aws` goes through [`CommandRunner`] so the
//! flow can be driven by scripted output in tests.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Stdout followed by stderr
    pub combined: String,
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub success: bool,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn success(combined: impl Into<String>) -> Self {
        Self {
            combined: combined.into(),
            status: Some(0),
            success: true,
        }
    }

    #[cfg(test)]
    pub fn failure(code: i32, combined: impl Into<String>) -> Self {
        Self {
            combined: combined.into(),
            status: Some(code),
            success: false,
        }
    }

    /// Short description of why the process failed, e.g. "exit status 1".
    pub fn failure_reason(&self) -> String {
        match self.status {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Runs `program` with `args` to completion and captures its output.
    ///
    /// Returns `Err` only when the process could not be started.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Whether `program` can be found on the search path.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!(program, arg_count = args.len(), "spawning command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", program))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = format!("{}{}", stdout, stderr);

        debug!(
            program,
            status = ?output.status.code(),
            bytes = combined.len(),
            "command finished"
        );

        Ok(CommandOutput {
            combined,
            status: output.status.code(),
            success: output.status.success(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Builds an owned argument vector from string literals and formatted values.
pub fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

#[cfg(test)]
#[path = "tests/fake_runner.rs"]
pub mod fake;
