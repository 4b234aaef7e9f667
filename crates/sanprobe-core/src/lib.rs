//! sanprobe - sanitizer instrumentation placement experiments
//!
//! For each pipeline location, compiles a fixed test program with the
//! location selected through the compiler's environment, checks the compiler
//! diagnostics for the probe marker, links against the sanitizer runtime,
//! runs the result and classifies whether the sanitizer caught the fault.
//!
//! Trials run strictly one after another and share fixed artifact paths,
//! which are removed after every trial.

pub mod classify;
pub mod cleanup;
pub mod config;
pub mod driver;
pub mod error;
pub mod location;
pub mod outcome;
pub mod pattern;
pub mod report;
pub mod runner;
pub mod sdk;
pub mod stage;
pub mod telemetry;
pub mod verify;

// Re-export key types
pub use classify::{classify, Verdict};
pub use cleanup::{cleanup, CleanupReport};
pub use config::{HarnessConfig, SdkSource};
pub use driver::Experiment;
pub use error::{HarnessError, HarnessResult};
pub use location::Location;
pub use outcome::{TrialOutcome, TrialStatus};
pub use pattern::{DiagnosticPattern, FaultReport, ProbeMarker};
pub use report::{ConsoleReporter, Reporter, Step};
pub use runner::{Invocation, ProcessRunner, StageOutput, TokioRunner};
pub use sdk::resolve_sdk_root;
pub use stage::{compile, execute, link, CompileResult, ExecutionResult, LinkResult};
pub use telemetry::init_tracing;
pub use verify::{inspect_probe, verify_probe, ProbeStatus};
