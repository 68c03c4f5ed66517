//! External command execution shared foundation
//!
//! This module provides:
//! - A command line description that renders itself for diagnostics
//! - A runner trait so version sources can be exercised without real tools
//! - The system runner: one attempt, bounded by a timeout, child killed on expiry

use crate::error::SourceError;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for external commands (20 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory, inherited when absent
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    /// Create a command line with arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Set the working directory (builder pattern)
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Trait for running external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and return its standard output
    async fn run(&self, command: &CommandLine) -> Result<String, SourceError>;
}

/// Runner that executes real processes
#[derive(Debug, Clone)]
pub struct SystemCommandRunner {
    timeout: Duration,
}

impl SystemCommandRunner {
    /// Create a runner with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a runner with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Timeout applied to every command
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, command: &CommandLine) -> Result<String, SourceError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(ref dir) = command.cwd {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %command, "running");

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| spawn_error(command, e))?,
            Err(_) => return Err(SourceError::timeout(command.to_string(), self.timeout)),
        };

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command: command.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| SourceError::invalid_output(command.to_string(), e.to_string()))
    }
}

fn spawn_error(command: &CommandLine, source: std::io::Error) -> SourceError {
    if source.kind() == std::io::ErrorKind::NotFound {
        SourceError::ProgramNotFound {
            program: command.program.clone(),
        }
    } else {
        SourceError::Spawn {
            command: command.to_string(),
            source,
        }
    }
}
