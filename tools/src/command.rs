//! Platform command execution
//!
//! `ping` and the `ip` table listings go through [`CommandRunner`] so the
//! diagnostics can be driven by canned output in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status was zero
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` to completion. Errors only when it cannot be spawned;
    /// a non-zero exit is reported through `CommandOutput::success`.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Spawns real processes
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(program, ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute {program}"))?;

        debug!(program, status = %output.status, "Command finished");

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
