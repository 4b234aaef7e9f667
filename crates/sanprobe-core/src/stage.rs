//! Compile, link and execute stages of a trial.
//!
//! Invocation construction is kept separate from running so the exact
//! argument lists and child environment can be checked without a toolchain.
//! Compile and link differ only in mode flag and input/output artifact; the
//! location reaches the compiler through the child environment, never as a
//! flag.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::location::Location;
use crate::pattern::ProbeMarker;
use crate::runner::{Invocation, ProcessRunner, StageOutput};
use crate::verify::{inspect_probe, ProbeStatus};

/// Result of a successful compile-only invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompileResult {
    pub output: StageOutput,
    pub probe: ProbeStatus,
}

impl CompileResult {
    pub fn diagnostics(&self) -> &str {
        &self.output.stderr
    }

    pub fn probe_triggered(&self) -> bool {
        self.probe.is_triggered()
    }
}

/// Result of a successful link invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkResult {
    pub output: StageOutput,
}

impl LinkResult {
    pub fn diagnostics(&self) -> &str {
        &self.output.stderr
    }
}

/// Captured run of the produced executable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,

    /// The program's stderr, where sanitizer reports appear.
    pub diagnostics: String,

    /// `None` when the process ended by signal.
    pub exit_code: Option<i32>,

    pub duration_ms: u64,
}

/// Arguments shared by compile and link, after the mode/artifact arguments.
fn toolchain_args(config: &HarnessConfig, sdk_root: &Path) -> Vec<String> {
    let mut args = vec![
        "-isysroot".to_string(),
        sdk_root.to_string_lossy().into_owned(),
        config.sanitizer_flag.clone(),
    ];
    args.extend(config.target_flags.iter().cloned());
    args
}

/// Compile-only invocation producing the object artifact.
///
/// The sanitizer flag keeps the object's runtime ABI in line with the link
/// step. Where instrumentation gets inserted is decided by the location
/// variable alone.
pub fn compile_invocation(
    config: &HarnessConfig,
    sdk_root: &Path,
    location: Location,
) -> Invocation {
    Invocation::new("compile", &config.compiler)
        .arg("-c")
        .arg(config.test_source.to_string_lossy())
        .arg("-o")
        .arg(config.object_path().to_string_lossy())
        .args(toolchain_args(config, sdk_root))
        .env(config.location_env_var.clone(), location.env_value())
}

/// Link invocation turning the object artifact into an executable with the
/// sanitizer runtime.
pub fn link_invocation(config: &HarnessConfig, sdk_root: &Path, location: Location) -> Invocation {
    Invocation::new("link", &config.compiler)
        .arg(config.object_path().to_string_lossy())
        .arg("-o")
        .arg(config.executable_path().to_string_lossy())
        .args(toolchain_args(config, sdk_root))
        .env(config.location_env_var.clone(), location.env_value())
}

/// Run the produced executable with no arguments.
pub fn execute_invocation(executable: &Path) -> Invocation {
    Invocation::new("execute", executable)
}

/// Compile the test program with `location` selected.
///
/// Fails with `CompileFailed` on non-zero exit. Probe verification only looks
/// at diagnostics and never fails.
pub async fn compile(
    config: &HarnessConfig,
    sdk_root: &Path,
    location: Location,
    runner: &dyn ProcessRunner,
) -> HarnessResult<CompileResult> {
    let invocation = compile_invocation(config, sdk_root, location);
    debug!(command = %invocation.command_line(), "Compile invocation");

    let output = runner.run(&invocation).await.map_err(|e| HarnessError::CompileFailed {
        location,
        exit_code: -1,
        diagnostics: e.to_string(),
    })?;

    if !output.passed() {
        return Err(HarnessError::CompileFailed {
            location,
            exit_code: output.exit_code,
            diagnostics: output.stderr,
        });
    }

    let probe = inspect_probe(&output.stderr, location, &ProbeMarker::from_config(config));
    info!(
        duration_ms = output.duration_ms,
        probe_triggered = probe.is_triggered(),
        "Compiled"
    );

    Ok(CompileResult { output, probe })
}

/// Link the object artifact against the sanitizer runtime.
pub async fn link(
    config: &HarnessConfig,
    sdk_root: &Path,
    location: Location,
    runner: &dyn ProcessRunner,
) -> HarnessResult<LinkResult> {
    let invocation = link_invocation(config, sdk_root, location);
    debug!(command = %invocation.command_line(), "Link invocation");

    let output = runner.run(&invocation).await.map_err(|e| HarnessError::LinkFailed {
        location,
        exit_code: -1,
        diagnostics: e.to_string(),
    })?;

    if !output.passed() {
        return Err(HarnessError::LinkFailed {
            location,
            exit_code: output.exit_code,
            diagnostics: output.stderr,
        });
    }

    info!(duration_ms = output.duration_ms, "Linked");
    Ok(LinkResult { output })
}

/// Run the executable and capture both streams in full.
pub async fn execute(
    executable: &Path,
    runner: &dyn ProcessRunner,
) -> HarnessResult<ExecutionResult> {
    let output = runner
        .run(&execute_invocation(executable))
        .await
        .map_err(|e| HarnessError::ExecutionError(e.to_string()))?;

    info!(exit_code = output.exit_code, duration_ms = output.duration_ms, "Executed");
    Ok(ExecutionResult {
        stdout: output.stdout,
        diagnostics: output.stderr,
        exit_code: (output.exit_code != -1).then_some(output.exit_code),
        duration_ms: output.duration_ms,
    })
}
