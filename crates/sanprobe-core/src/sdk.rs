//! SDK root lookup.

use std::path::PathBuf;

use tracing::debug;

use crate::config::SdkSource;
use crate::error::{HarnessError, HarnessResult};
use crate::runner::{Invocation, ProcessRunner};

/// Resolve the SDK root the compiler needs for system headers.
///
/// Runs the configured locator (`xcrun --show-sdk-path` by default). A missing
/// locator, a non-zero exit, or empty output is `ToolchainUnavailable`.
pub async fn resolve_sdk_root(
    source: &SdkSource,
    runner: &dyn ProcessRunner,
) -> HarnessResult<PathBuf> {
    let (program, args) = match source {
        SdkSource::Fixed(path) => return Ok(path.clone()),
        SdkSource::Locator { program, args } => (program, args),
    };

    let invocation = Invocation::new("sdk_locator", program).args(args.iter().cloned());
    let output = runner.run(&invocation).await.map_err(|e| {
        HarnessError::ToolchainUnavailable(format!("cannot run {program}: {e}"))
    })?;

    if !output.passed() {
        return Err(HarnessError::ToolchainUnavailable(format!(
            "{} exited with code {}: {}",
            invocation.command_line(),
            output.exit_code,
            output.stderr.trim()
        )));
    }

    let sdk = output.stdout.trim();
    if sdk.is_empty() {
        return Err(HarnessError::ToolchainUnavailable(format!(
            "{} returned empty output",
            invocation.command_line()
        )));
    }

    debug!(sdk_root = %sdk, "Resolved SDK root");
    Ok(PathBuf::from(sdk))
}
