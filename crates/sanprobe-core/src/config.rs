//! Harness configuration.
//!
//! Everything the trials need to know about paths, toolchain flags and
//! diagnostic markers lives in one [`HarnessConfig`], built once at startup
//! and passed by reference into every stage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable read by the instrumentation selection logic.
pub const LOCATION_ENV_VAR: &str = "THESIS_ASAN_LOC";

/// Marker the custom instrumentation prints when it runs.
pub const PROBE_MARKER: &str = "[Thesis]";

/// Substring that denotes a sanitizer report in the program's stderr.
pub const FAULT_MARKER: &str = "AddressSanitizer";

/// Header of the sanitizer report line used as the trial summary.
pub const FAULT_HEADER: &str = "ERROR: AddressSanitizer";

/// Where the SDK root comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SdkSource {
    /// Ask a locator command and use its trimmed stdout.
    Locator { program: String, args: Vec<String> },

    /// Use a known path without running anything.
    Fixed(PathBuf),
}

impl Default for SdkSource {
    fn default() -> Self {
        SdkSource::Locator {
            program: "xcrun".to_string(),
            args: vec!["--show-sdk-path".to_string()],
        }
    }
}

/// Immutable configuration for an experiment run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Project root, shown in the run header.
    pub project_root: PathBuf,

    /// Compiler binary with the patched instrumentation pass.
    pub compiler: PathBuf,

    /// Test program compiled in every trial.
    pub test_source: PathBuf,

    /// Directory holding the per-trial artifacts.
    pub work_dir: PathBuf,

    /// SDK root resolution.
    pub sdk: SdkSource,

    /// Target, optimization and debug flags shared by compile and link.
    pub target_flags: Vec<String>,

    /// Flag enabling the sanitizer runtime.
    pub sanitizer_flag: String,

    /// Environment variable carrying the location to the compiler.
    pub location_env_var: String,

    /// Probe marker expected in compiler diagnostics.
    pub probe_marker: String,

    /// Sanitizer report marker expected in program diagnostics.
    pub fault_marker: String,

    /// Sanitizer report header line prefix.
    pub fault_header: String,

    /// Object artifact file name.
    pub object_name: String,

    /// Executable artifact file name.
    pub executable_name: String,
}

impl HarnessConfig {
    /// Standard layout under a project root: the compiler in
    /// `llvm-project/build/bin/clang`, the test program in
    /// `benchmarks/test.c`, artifacts in the current directory.
    pub fn for_project_root(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            compiler: project_root
                .join("llvm-project")
                .join("build")
                .join("bin")
                .join("clang"),
            test_source: project_root.join("benchmarks").join("test.c"),
            project_root,
            work_dir: PathBuf::from("."),
            sdk: SdkSource::default(),
            target_flags: vec![
                "--target=x86_64-apple-darwin".to_string(),
                "-O2".to_string(),
                "-g".to_string(),
            ],
            sanitizer_flag: "-fsanitize=address".to_string(),
            location_env_var: LOCATION_ENV_VAR.to_string(),
            probe_marker: PROBE_MARKER.to_string(),
            fault_marker: FAULT_MARKER.to_string(),
            fault_header: FAULT_HEADER.to_string(),
            object_name: "test.o".to_string(),
            executable_name: "test_exec".to_string(),
        }
    }

    /// Place artifacts in `work_dir` instead of the current directory.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Skip the SDK locator and use a known root.
    pub fn with_sdk_root(mut self, sdk_root: impl Into<PathBuf>) -> Self {
        self.sdk = SdkSource::Fixed(sdk_root.into());
        self
    }

    /// Use a different compiler binary.
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Use a different test program.
    pub fn with_test_source(mut self, test_source: impl Into<PathBuf>) -> Self {
        self.test_source = test_source.into();
        self
    }

    pub fn object_path(&self) -> PathBuf {
        self.work_dir.join(&self.object_name)
    }

    pub fn executable_path(&self) -> PathBuf {
        self.work_dir.join(&self.executable_name)
    }

    /// Debug-info bundles some platforms emit next to the artifacts.
    pub fn debug_bundle_paths(&self) -> Vec<PathBuf> {
        [&self.object_name, &self.executable_name]
            .iter()
            .map(|name| dsym_path(&self.work_dir, name))
            .collect()
    }
}

fn dsym_path(dir: &Path, artifact: &str) -> PathBuf {
    dir.join(format!("{artifact}.dSYM"))
}
