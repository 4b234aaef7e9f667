//! Child process execution.
//!
//! Stages describe what to run as an [`Invocation`]; a [`ProcessRunner`]
//! runs it to completion and captures both output streams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// A fully described child process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    /// Stage name for logs.
    pub name: String,

    /// Executable to run.
    pub program: PathBuf,

    /// Arguments, without the program itself.
    pub args: Vec<String>,

    /// Variables added on top of the inherited environment.
    pub envs: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            envs: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    /// Program plus arguments, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageOutput {
    /// Stage name.
    pub stage_name: String,

    /// Exit code; -1 when the process was killed by a signal.
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the process reported success.
    pub success: bool,
}

impl StageOutput {
    /// Whether this stage passed (exit code 0).
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }
}

/// Runs invocations to completion.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation and wait for it to exit. There is no timeout.
    async fn run(&self, invocation: &Invocation) -> HarnessResult<StageOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, invocation: &Invocation) -> HarnessResult<StageOutput> {
        if invocation.program.as_os_str().is_empty() {
            return Err(HarnessError::EmptyInvocation(invocation.name.clone()));
        }

        debug!(stage = %invocation.name, command = %invocation.command_line(), "Spawning");
        let start = Instant::now();

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(&invocation.envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let spawn_err = |source| HarnessError::Spawn {
            program: invocation.program.to_string_lossy().into_owned(),
            source,
        };
        let child = command.spawn().map_err(spawn_err)?;
        let output = child.wait_with_output().await.map_err(spawn_err)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);

        Ok(StageOutput {
            stage_name: invocation.name.clone(),
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
            success: output.status.success(),
        })
    }
}
