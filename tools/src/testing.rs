//! Scripted command runner for tests

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::command::{CommandOutput, CommandRunner};

enum Script {
    Output(CommandOutput),
    SpawnError(String),
}

/// Replays canned command output.
///
/// Scripts are keyed by the full command line (`"ip route"`) or by the
/// program name alone (`"ping"`); the full line wins. Unscripted commands
/// fail as if they could not be spawned.
pub struct ScriptedRunner {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, command: &str, output: CommandOutput) -> Self {
        self.scripts.insert(command.to_string(), Script::Output(output));
        self
    }

    pub fn on_spawn_error(mut self, command: &str, error: &str) -> Self {
        self.scripts
            .insert(command.to_string(), Script::SpawnError(error.to_string()));
        self
    }

    /// Command lines run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for ScriptedRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());

        match self.scripts.get(&line).or_else(|| self.scripts.get(program)) {
            Some(Script::Output(output)) => Ok(output.clone()),
            Some(Script::SpawnError(error)) => bail!("{error}"),
            None => bail!("no scripted output for `{line}`"),
        }
    }
}

/// A command that exited zero
pub fn succeeded(stdout: &str) -> CommandOutput {
    CommandOutput {
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A command that exited non-zero
pub fn exited_with_error(stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        success: false,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}
