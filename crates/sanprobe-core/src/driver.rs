//! Experiment driver: one trial per location, strictly in order.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn, Instrument};

use crate::classify::classify;
use crate::cleanup::cleanup;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::location::Location;
use crate::outcome::TrialOutcome;
use crate::pattern::FaultReport;
use crate::report::{Reporter, Step};
use crate::runner::ProcessRunner;
use crate::sdk::resolve_sdk_root;
use crate::stage::{self, CompileResult, LinkResult};
use crate::telemetry::trial_span;

/// Runs trials against one configuration.
///
/// Every trial writes the same artifact paths, so trials never overlap and
/// cleanup runs after each one before the next compile starts.
pub struct Experiment<'a> {
    config: &'a HarnessConfig,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Experiment<'a> {
    pub fn new(config: &'a HarnessConfig, runner: &'a dyn ProcessRunner) -> Self {
        Self { config, runner }
    }

    /// The compiler and the test program must exist before any trial.
    pub fn check_preconditions(&self) -> HarnessResult<()> {
        if !self.config.compiler.exists() {
            return Err(HarnessError::PreconditionMissing {
                what: "Clang binary".to_string(),
                path: self.config.compiler.clone(),
            });
        }
        if !self.config.test_source.exists() {
            return Err(HarnessError::PreconditionMissing {
                what: "Benchmark file".to_string(),
                path: self.config.test_source.clone(),
            });
        }
        Ok(())
    }

    /// Run one trial per location, in order.
    ///
    /// Only fatal conditions (missing inputs, unavailable SDK) are returned as
    /// errors. Stage failures are recorded in the trial's outcome, report
    /// write failures are logged, and the next location runs regardless.
    pub async fn run_all(
        &self,
        locations: &[Location],
        reporter: &mut dyn Reporter,
    ) -> HarnessResult<Vec<TrialOutcome>> {
        self.check_preconditions()?;
        reported(reporter.run_started(self.config));

        let sdk_root = resolve_sdk_root(&self.config.sdk, self.runner).await?;
        info!(sdk_root = %sdk_root.display(), trials = locations.len(), "Starting experiments");

        // Leftovers of an interrupted earlier run.
        cleanup(self.config);

        let mut outcomes = Vec::with_capacity(locations.len());
        for &location in locations {
            reported(reporter.trial_started(location));

            let result = self
                .run_trial(&sdk_root, location, reporter)
                .instrument(trial_span(location))
                .await;
            let cleaned = cleanup(self.config);
            if !cleaned.is_clean() {
                warn!(%location, failed = cleaned.failed.len(), "Cleanup incomplete");
            }

            let outcome = result?;
            info!(%location, outcome = outcome.label(), "Trial finished");
            reported(reporter.trial_finished(&outcome));
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Compile, verify, link, execute and classify one location.
    ///
    /// Does not clean up; [`Experiment::run_all`] does that after every trial.
    pub async fn run_trial(
        &self,
        sdk_root: &Path,
        location: Location,
        reporter: &mut dyn Reporter,
    ) -> HarnessResult<TrialOutcome> {
        reported(reporter.step_started(Step::Compile));
        let compiled = match stage::compile(self.config, sdk_root, location, self.runner).await {
            Ok(compiled) => compiled,
            Err(e) => return end_trial(location, None, None, e),
        };
        if compiled.probe.is_warning() {
            warn!("Probe marker missing from compiler diagnostics");
        }
        reported(reporter.compiled(location, &compiled));

        reported(reporter.step_started(Step::Link));
        let linked = match stage::link(self.config, sdk_root, location, self.runner).await {
            Ok(linked) => linked,
            Err(e) => return end_trial(location, Some(compiled), None, e),
        };

        reported(reporter.step_started(Step::Execute));
        let executed = match stage::execute(&self.config.executable_path(), self.runner).await {
            Ok(executed) => executed,
            Err(e) => return end_trial(location, Some(compiled), Some(linked), e),
        };

        let verdict = classify(&executed, &FaultReport::from_config(self.config));
        Ok(TrialOutcome::completed(
            location, compiled, linked, executed, verdict,
        ))
    }
}

/// Stage failures end the trial; fatal errors end the run.
fn end_trial(
    location: Location,
    compile: Option<CompileResult>,
    link: Option<LinkResult>,
    error: HarnessError,
) -> HarnessResult<TrialOutcome> {
    if error.is_fatal() {
        return Err(error);
    }
    warn!(error = %error, "Trial ended early");
    if let Some(diagnostics) = error.diagnostics() {
        debug!(%diagnostics, "Toolchain diagnostics");
    }
    Ok(TrialOutcome::aborted(location, compile, link, error))
}

/// The human report is best effort; a closed stdout must not stop trials.
fn reported(written: io::Result<()>) {
    if let Err(e) = written {
        warn!(error = %e, "Report write failed");
    }
}
