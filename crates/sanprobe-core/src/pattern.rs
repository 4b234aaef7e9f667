//! Text patterns recognised in toolchain and program diagnostics.
//!
//! Each marker the harness relies on has its own [`DiagnosticPattern`]
//! implementation so the matching rule can change without touching the
//! process plumbing.

use crate::config::HarnessConfig;

/// A rule for recognising something in a diagnostic stream.
pub trait DiagnosticPattern: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Whether the stream contains the pattern.
    fn detected(&self, diagnostics: &str) -> bool;

    /// Lines worth echoing to the user when the pattern is detected.
    fn evidence<'a>(&self, diagnostics: &'a str) -> Vec<&'a str>;
}

/// Marker printed by the manually inserted instrumentation.
#[derive(Debug, Clone)]
pub struct ProbeMarker {
    marker: String,
}

impl ProbeMarker {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.probe_marker.clone())
    }
}

impl DiagnosticPattern for ProbeMarker {
    fn name(&self) -> &str {
        "probe_marker"
    }

    fn detected(&self, diagnostics: &str) -> bool {
        diagnostics.contains(&self.marker)
    }

    /// Every line carrying the marker.
    fn evidence<'a>(&self, diagnostics: &'a str) -> Vec<&'a str> {
        diagnostics
            .lines()
            .filter(|line| line.contains(&self.marker))
            .collect()
    }
}

/// Sanitizer fault report in the executed program's stderr.
///
/// Detection keys on the broad marker; the summary is the first line
/// containing the narrower error header.
#[derive(Debug, Clone)]
pub struct FaultReport {
    marker: String,
    header: String,
}

impl FaultReport {
    pub fn new(marker: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            header: header.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.fault_marker.clone(), config.fault_header.clone())
    }

    /// First line containing the error header.
    pub fn summary<'a>(&self, diagnostics: &'a str) -> Option<&'a str> {
        diagnostics.lines().find(|line| line.contains(&self.header))
    }
}

impl DiagnosticPattern for FaultReport {
    fn name(&self) -> &str {
        "fault_report"
    }

    fn detected(&self, diagnostics: &str) -> bool {
        diagnostics.contains(&self.marker)
    }

    fn evidence<'a>(&self, diagnostics: &'a str) -> Vec<&'a str> {
        self.summary(diagnostics).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASAN_REPORT: &str = "=================================================================\n\
==4242==ERROR: AddressSanitizer: heap-use-after-free on address 0x602000000010\n\
READ of size 4 at 0x602000000010 thread T0\n\
==4242==ERROR: AddressSanitizer: second header\n\
SUMMARY: AddressSanitizer: heap-use-after-free test.c:19 in memory_test\n";

    #[test]
    fn test_probe_marker_collects_all_marker_lines() {
        let probe = ProbeMarker::new("[Thesis]");
        let diags = "warning: unused\n[Thesis] inserting ASan at MID\nnote: x\n[Thesis] done\n";

        assert!(probe.detected(diags));
        assert_eq!(
            probe.evidence(diags),
            vec!["[Thesis] inserting ASan at MID", "[Thesis] done"]
        );
    }

    #[test]
    fn test_probe_marker_absent() {
        let probe = ProbeMarker::new("[Thesis]");
        assert!(!probe.detected("clang: warning: argument unused\n"));
        assert!(probe.evidence("clang: warning\n").is_empty());
        assert!(!probe.detected(""));
    }

    #[test]
    fn test_fault_report_summary_is_first_header_line() {
        let report = FaultReport::new("AddressSanitizer", "ERROR: AddressSanitizer");
        assert!(report.detected(ASAN_REPORT));
        assert_eq!(
            report.summary(ASAN_REPORT),
            Some("==4242==ERROR: AddressSanitizer: heap-use-after-free on address 0x602000000010")
        );
        assert_eq!(report.evidence(ASAN_REPORT).len(), 1);
    }

    #[test]
    fn test_fault_marker_without_header_has_no_summary() {
        let report = FaultReport::new("AddressSanitizer", "ERROR: AddressSanitizer");
        let diags = "AddressSanitizer:DEADLYSIGNAL\n";
        assert!(report.detected(diags));
        assert!(report.summary(diags).is_none());
    }

    #[test]
    fn test_patterns_are_object_safe() {
        let patterns: Vec<Box<dyn DiagnosticPattern>> = vec![
            Box::new(ProbeMarker::new("[Thesis]")),
            Box::new(FaultReport::new("AddressSanitizer", "ERROR: AddressSanitizer")),
        ];
        let names: Vec<&str> = patterns.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["probe_marker", "fault_report"]);
    }
}
