//! sanprobe - run the instrumentation placement experiment
//!
//! Runs one trial per built-in location (`NONE`, `PRE`, `MID`, `POST`) and
//! prints each outcome. Exits non-zero only when the compiler, the test
//! program or the SDK cannot be found; individual trial failures are
//! reported, not propagated.

use anyhow::{Context, Result};
use clap::Parser;
use sanprobe_core::{ConsoleReporter, Experiment, HarnessConfig, Location, TokioRunner};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "sanprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sanitizer instrumentation placement experiments", long_about = None)]
struct Cli {
    /// Project root containing llvm-project/build and benchmarks/
    #[arg(long, env = "SANPROBE_PROJECT_ROOT", default_value = ".")]
    project_root: PathBuf,

    /// Use this SDK root instead of asking xcrun
    #[arg(long, env = "SANPROBE_SDK_ROOT")]
    sdk_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn harness_config(&self) -> Result<HarnessConfig> {
        let project_root = std::fs::canonicalize(&self.project_root).with_context(|| {
            format!("Failed to resolve project root: {:?}", self.project_root)
        })?;

        let config = HarnessConfig::for_project_root(project_root);
        Ok(match &self.sdk_root {
            Some(sdk_root) => config.with_sdk_root(sdk_root),
            None => config,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    sanprobe_core::init_tracing(cli.json, level);

    let config = cli.harness_config()?;
    let mut reporter = ConsoleReporter::stdout();

    let outcomes = Experiment::new(&config, &TokioRunner)
        .run_all(&Location::SEQUENCE, &mut reporter)
        .await
        .context("Experiment aborted")?;

    let caught = outcomes.iter().filter(|o| o.fault_detected()).count();
    info!(trials = outcomes.len(), faults_caught = caught, "All trials finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["sanprobe"]).unwrap();
        assert_eq!(cli.project_root, PathBuf::from("."));
        assert!(cli.sdk_root.is_none());
        assert!(!cli.verbose);
        assert!(!cli.json);
    }

    #[test]
    fn test_sdk_root_override() {
        let cli = Cli::try_parse_from(["sanprobe", "--sdk-root", "/sdk", "--project-root", "/"])
            .unwrap();
        let config = cli.harness_config().unwrap();
        assert_eq!(config.sdk, sanprobe_core::SdkSource::Fixed(PathBuf::from("/sdk")));
    }

    #[test]
    fn test_rejects_experiment_shaping_flags() {
        assert!(Cli::try_parse_from(["sanprobe", "--location", "MID"]).is_err());
        assert!(Cli::try_parse_from(["sanprobe", "--work-dir", "/tmp"]).is_err());
    }
}
