//! Classification of program runs by their sanitizer output.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pattern::{DiagnosticPattern, FaultReport};
use crate::stage::ExecutionResult;

/// How a trial's executed program behaved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The sanitizer reported a fault.
    FaultDetected { summary: Option<String> },

    /// No sanitizer report. Either the program has no bug or the
    /// instrumentation missed it; stdout is kept for manual inspection.
    NoFaultDetected { stdout: String },
}

impl Verdict {
    pub fn fault_detected(&self) -> bool {
        matches!(self, Verdict::FaultDetected { .. })
    }

    /// The sanitizer error line, when one was found.
    pub fn summary(&self) -> Option<&str> {
        match self {
            Verdict::FaultDetected { summary } => summary.as_deref(),
            Verdict::NoFaultDetected { .. } => None,
        }
    }
}

/// Classify a run from its diagnostic stream. The exit code is not consulted.
pub fn classify(result: &ExecutionResult, report: &FaultReport) -> Verdict {
    let detected = report.detected(&result.diagnostics);
    debug!(pattern = report.name(), detected, "Classified run");
    if detected {
        Verdict::FaultDetected {
            summary: report.summary(&result.diagnostics).map(str::to_string),
        }
    } else {
        Verdict::NoFaultDetected {
            stdout: result.stdout.trim().to_string(),
        }
    }
}
