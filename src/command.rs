//! Subprocess execution.
//!
//! The dependency-tree detector talks to the package manager through the
//! [`CommandRunner`] trait so it can be swapped out in tests.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout and stderr joined by a newline.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion.
    ///
    /// A non-zero exit is not an error; only a failure to start the process is.
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput>;

    /// Returns true if `program` can be found on the `PATH`.
    async fn exists(&self, program: &str) -> bool;
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args).kill_on_drop(true);
        if let Some(ref cwd) = spec.cwd {
            command.current_dir(cwd);
        }

        let output = command.output().await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            // Killed by a signal: no code, report a generic failure
            exit_code: output.status.code().unwrap_or(1),
        })
    }

    async fn exists(&self, program: &str) -> bool {
        let locator = if cfg!(target_os = "windows") { "where" } else { "which" };

        match Command::new(locator).arg(program).output().await {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}
