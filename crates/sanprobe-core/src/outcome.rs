//! Per-location trial outcomes.

use serde::{Deserialize, Serialize};

use crate::classify::Verdict;
use crate::error::HarnessError;
use crate::location::Location;
use crate::stage::{CompileResult, ExecutionResult, LinkResult};
use crate::verify::ProbeStatus;

/// How far a trial got and how it ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialStatus {
    CompileFailed { exit_code: i32, diagnostics: String },
    LinkFailed { exit_code: i32, diagnostics: String },
    ExecutionError { message: String },
    Completed { verdict: Verdict },
}

impl TrialStatus {
    /// Map a stage failure onto the status that ends the trial.
    pub fn from_error(error: HarnessError) -> Self {
        match error {
            HarnessError::CompileFailed {
                exit_code,
                diagnostics,
                ..
            } => TrialStatus::CompileFailed {
                exit_code,
                diagnostics,
            },
            HarnessError::LinkFailed {
                exit_code,
                diagnostics,
                ..
            } => TrialStatus::LinkFailed {
                exit_code,
                diagnostics,
            },
            HarnessError::ExecutionError(message) => TrialStatus::ExecutionError { message },
            other => TrialStatus::ExecutionError {
                message: other.to_string(),
            },
        }
    }
}

/// Everything one location's trial produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrialOutcome {
    pub location: Location,
    pub compile: Option<CompileResult>,
    pub link: Option<LinkResult>,
    pub execution: Option<ExecutionResult>,
    pub status: TrialStatus,
}

impl TrialOutcome {
    /// A trial that ran every stage.
    pub fn completed(
        location: Location,
        compile: CompileResult,
        link: LinkResult,
        execution: ExecutionResult,
        verdict: Verdict,
    ) -> Self {
        Self {
            location,
            compile: Some(compile),
            link: Some(link),
            execution: Some(execution),
            status: TrialStatus::Completed { verdict },
        }
    }

    /// A trial cut short by a stage failure.
    pub fn aborted(
        location: Location,
        compile: Option<CompileResult>,
        link: Option<LinkResult>,
        error: HarnessError,
    ) -> Self {
        Self {
            location,
            compile,
            link,
            execution: None,
            status: TrialStatus::from_error(error),
        }
    }

    pub fn probe(&self) -> Option<&ProbeStatus> {
        self.compile.as_ref().map(|c| &c.probe)
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.status {
            TrialStatus::Completed { verdict } => Some(verdict),
            _ => None,
        }
    }

    pub fn fault_detected(&self) -> bool {
        self.verdict().map(Verdict::fault_detected).unwrap_or(false)
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match &self.status {
            TrialStatus::CompileFailed { .. } => "compile_failed",
            TrialStatus::LinkFailed { .. } => "link_failed",
            TrialStatus::ExecutionError { .. } => "execution_error",
            TrialStatus::Completed { verdict } if verdict.fault_detected() => "fault_detected",
            TrialStatus::Completed { .. } => "no_fault_detected",
        }
    }
}
