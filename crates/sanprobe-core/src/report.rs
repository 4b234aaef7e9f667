//! Human-readable progress and results.
//!
//! The driver calls a [`Reporter`] at each step of a trial. The console
//! implementation writes the plain-text report to any `Write`; logs go
//! through `tracing` separately.

use std::io::{self, Write};

use crate::config::HarnessConfig;
use crate::classify::Verdict;
use crate::location::Location;
use crate::outcome::{TrialOutcome, TrialStatus};
use crate::stage::CompileResult;
use crate::verify::ProbeStatus;

/// Trial steps announced before they start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Compile,
    Link,
    Execute,
}

/// Receives progress from the experiment driver.
pub trait Reporter {
    fn run_started(&mut self, config: &HarnessConfig) -> io::Result<()>;
    fn trial_started(&mut self, location: Location) -> io::Result<()>;
    fn step_started(&mut self, step: Step) -> io::Result<()>;
    fn compiled(&mut self, location: Location, result: &CompileResult) -> io::Result<()>;
    fn trial_finished(&mut self, outcome: &TrialOutcome) -> io::Result<()>;
}

const BANNER_RULE: &str = "====================";

/// Plain-text report writer.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self, config: &HarnessConfig) -> io::Result<()> {
        writeln!(self.out, "Starting sanitizer placement experiments")?;
        writeln!(self.out, "Project root: {}", config.project_root.display())
    }

    fn trial_started(&mut self, location: Location) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{BANNER_RULE} Testing Location: {location} {BANNER_RULE}"
        )
    }

    fn step_started(&mut self, step: Step) -> io::Result<()> {
        let line = match step {
            Step::Compile => "[Step 1] Compiling...",
            Step::Link => "[Step 2] Linking...",
            Step::Execute => "[Step 3] Running executable...",
        };
        writeln!(self.out, "{line}")
    }

    fn compiled(&mut self, location: Location, result: &CompileResult) -> io::Result<()> {
        writeln!(self.out, "    compiled in {} ms", result.output.duration_ms)?;
        match &result.probe {
            ProbeStatus::Triggered { lines } => {
                writeln!(self.out, "Custom probe log detected:")?;
                for line in lines {
                    writeln!(self.out, "    └── {line}")?;
                }
            }
            ProbeStatus::NotTriggered => writeln!(
                self.out,
                "Warning: no probe log detected for {location}, instrumentation did not fire"
            )?,
            ProbeStatus::AbsentAsExpected => {}
        }
        Ok(())
    }

    fn trial_finished(&mut self, outcome: &TrialOutcome) -> io::Result<()> {
        match &outcome.status {
            TrialStatus::CompileFailed {
                exit_code,
                diagnostics,
            } => {
                writeln!(self.out, "Compilation failed (exit code {exit_code})")?;
                writeln!(self.out, "{diagnostics}")?;
            }
            TrialStatus::LinkFailed {
                exit_code,
                diagnostics,
            } => {
                writeln!(self.out, "Linking failed (exit code {exit_code})")?;
                writeln!(self.out, "{diagnostics}")?;
            }
            TrialStatus::ExecutionError { message } => {
                writeln!(self.out, "Execution error: {message}")?;
            }
            TrialStatus::Completed {
                verdict: Verdict::FaultDetected { summary },
            } => {
                writeln!(self.out, "[Result] Sanitizer triggered (fault caught)")?;
                if let Some(summary) = summary {
                    writeln!(self.out, "    └── {summary}")?;
                }
            }
            TrialStatus::Completed {
                verdict: Verdict::NoFaultDetected { stdout },
            } => {
                writeln!(
                    self.out,
                    "[Result] Program ran without detected fault (no sanitizer error, or no bug)"
                )?;
                writeln!(self.out, "    Output: {stdout}")?;
            }
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
