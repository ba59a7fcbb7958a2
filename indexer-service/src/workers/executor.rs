use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::Instant;

/// Captured result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Runs an external program to completion.
///
/// A non-zero exit is not an error at this level: it comes back as a
/// `CommandOutput` with `success == false`. Only failing to start or wait on
/// the process is a `RunnerError`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError>;
}

/// `CommandRunner` backed by real child processes.
///
/// No timeout is applied; the child runs for as long as it takes.
#[derive(Clone, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for CommandExecutor {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(program = %program, args = ?args, "Executing command");

        let output = cmd.output().await.map_err(|source| RunnerError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.success {
            tracing::debug!(
                program = %program,
                output_size = output.stdout.len(),
                "Command succeeded"
            );
        } else {
            tracing::error!(
                program = %program,
                args = ?args,
                status = %output.status,
                stderr = %result.stderr,
                "Command failed"
            );
        }

        Ok(result)
    }
}

/// Scripted `CommandRunner` for tests.
///
/// Responses are keyed by the first argument (the subcommand). Unscripted
/// subcommands succeed with `"<subcommand> ok\n"` on stdout. Every
/// invocation is recorded as `[program, args...]` along with the (tokio)
/// instant it started.
#[derive(Default)]
pub struct MockCommandRunner {
    responses: Mutex<HashMap<String, Result<CommandOutput, String>>>,
    calls: Mutex<Vec<(Instant, Vec<String>)>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output returned for `subcommand`.
    pub fn with_output(self, subcommand: &str, output: CommandOutput) -> Self {
        self.lock_responses()
            .insert(subcommand.to_string(), Ok(output));
        self
    }

    /// Make `subcommand` exit unsuccessfully with `stderr`.
    pub fn failing(self, subcommand: &str, stderr: &str) -> Self {
        self.with_output(subcommand, CommandOutput::failure(stderr))
    }

    /// Make `subcommand` fail to spawn, with `message` as the OS error text.
    pub fn unspawnable(self, subcommand: &str, message: &str) -> Self {
        self.lock_responses()
            .insert(subcommand.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.lock_calls()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// Start instant of each invocation, in order.
    pub fn call_instants(&self) -> Vec<Instant> {
        self.lock_calls().iter().map(|(at, _)| *at).collect()
    }

    /// Subcommands invoked so far, in order.
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.get(1).cloned())
            .collect()
    }

    fn lock_responses(&self) -> MutexGuard<'_, HashMap<String, Result<CommandOutput, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<(Instant, Vec<String>)>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunnerError> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.lock_calls().push((Instant::now(), call));

        let subcommand = args.first().copied().unwrap_or_default();

        tracing::info!(program = %program, args = ?args, "[MOCK] Command would be executed");

        match self.lock_responses().get(subcommand).cloned() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(RunnerError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            }),
            None => Ok(CommandOutput::success(format!("{} ok\n", subcommand))),
        }
    }
}
