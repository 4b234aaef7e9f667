//! Error types for the experiment harness.

use std::path::PathBuf;

use thiserror::Error;

use crate::location::Location;

/// Errors produced while preparing or running trials.
///
/// `PreconditionMissing` and `ToolchainUnavailable` are fatal to the whole
/// run. The stage failures only end the trial they occurred in.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A required input path does not exist
    #[error("{what} not found at: {}", .path.display())]
    PreconditionMissing { what: String, path: PathBuf },

    /// SDK locator missing or unusable
    #[error("toolchain unavailable: {0}")]
    ToolchainUnavailable(String),

    /// Compiler exited non-zero in compile-only mode
    #[error("compilation failed for {location} (exit code {exit_code})")]
    CompileFailed {
        location: Location,
        exit_code: i32,
        diagnostics: String,
    },

    /// Compiler exited non-zero in link mode
    #[error("linking failed for {location} (exit code {exit_code})")]
    LinkFailed {
        location: Location,
        exit_code: i32,
        diagnostics: String,
    },

    /// The produced executable could not be run
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// A child process could not be spawned or awaited
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Invocation has no program to run
    #[error("invocation '{0}' has an empty program")]
    EmptyInvocation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Whether this error must stop the whole run rather than one trial.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HarnessError::PreconditionMissing { .. } | HarnessError::ToolchainUnavailable(_)
        )
    }

    /// Captured toolchain diagnostics carried by a stage failure, if any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            HarnessError::CompileFailed { diagnostics, .. }
            | HarnessError::LinkFailed { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}

/// Result type for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let missing = HarnessError::PreconditionMissing {
            what: "Clang binary".to_string(),
            path: PathBuf::from("/nope/clang"),
        };
        assert!(missing.is_fatal());
        assert!(HarnessError::ToolchainUnavailable("xcrun".to_string()).is_fatal());

        let compile = HarnessError::CompileFailed {
            location: Location::Mid,
            exit_code: 1,
            diagnostics: "error: boom".to_string(),
        };
        assert!(!compile.is_fatal());
        assert!(!HarnessError::ExecutionError("denied".to_string()).is_fatal());
    }

    #[test]
    fn test_diagnostics_only_on_stage_failures() {
        let link = HarnessError::LinkFailed {
            location: Location::Post,
            exit_code: 1,
            diagnostics: "ld: symbol not found".to_string(),
        };
        assert_eq!(link.diagnostics(), Some("ld: symbol not found"));
        assert!(HarnessError::ExecutionError("x".to_string())
            .diagnostics()
            .is_none());
    }

    #[test]
    fn test_precondition_message_names_path() {
        let err = HarnessError::PreconditionMissing {
            what: "Benchmark file".to_string(),
            path: PathBuf::from("/work/benchmarks/test.c"),
        };
        assert_eq!(
            err.to_string(),
            "Benchmark file not found at: /work/benchmarks/test.c"
        );
    }
}
