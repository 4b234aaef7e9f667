//! Probe verification against compiler diagnostics.

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::pattern::DiagnosticPattern;

/// What the compiler diagnostics say about the manual instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Marker found; carries every marker line.
    Triggered { lines: Vec<String> },

    /// Marker absent for an instrumented location. A warning, never fatal.
    NotTriggered,

    /// Marker absent for the baseline, as expected.
    AbsentAsExpected,
}

impl ProbeStatus {
    pub fn is_triggered(&self) -> bool {
        matches!(self, ProbeStatus::Triggered { .. })
    }

    /// Whether the user should be warned that instrumentation did not fire.
    pub fn is_warning(&self) -> bool {
        matches!(self, ProbeStatus::NotTriggered)
    }
}

/// Whether the probe marker is present. Ignores compiler exit status.
pub fn verify_probe(diagnostics: &str, probe: &dyn DiagnosticPattern) -> bool {
    probe.detected(diagnostics)
}

/// Inspect compiler diagnostics and apply the baseline policy.
pub fn inspect_probe(
    diagnostics: &str,
    location: Location,
    probe: &dyn DiagnosticPattern,
) -> ProbeStatus {
    if verify_probe(diagnostics, probe) {
        ProbeStatus::Triggered {
            lines: probe
                .evidence(diagnostics)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    } else if location.is_baseline() {
        ProbeStatus::AbsentAsExpected
    } else {
        ProbeStatus::NotTriggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ProbeMarker;

    const WITH_MARKER: &str = "[Thesis] ASan pass inserted at MID\n";
    const WITHOUT_MARKER: &str = "clang: warning: -g ignored\n";

    #[test]
    fn test_verify_probe_true_for_marker_any_location() {
        let probe = ProbeMarker::new("[Thesis]");
        assert!(verify_probe(WITH_MARKER, &probe));
        assert!(inspect_probe(WITH_MARKER, Location::None, &probe).is_triggered());
        assert!(inspect_probe(WITH_MARKER, Location::Mid, &probe).is_triggered());
    }

    #[test]
    fn test_verify_probe_false_without_marker() {
        let probe = ProbeMarker::new("[Thesis]");
        assert!(!verify_probe(WITHOUT_MARKER, &probe));
        assert!(!verify_probe("", &probe));
    }

    #[test]
    fn test_baseline_absence_is_not_a_warning() {
        let probe = ProbeMarker::new("[Thesis]");
        let status = inspect_probe(WITHOUT_MARKER, Location::None, &probe);
        assert_eq!(status, ProbeStatus::AbsentAsExpected);
        assert!(!status.is_warning());
    }

    #[test]
    fn test_instrumented_absence_is_a_warning() {
        let probe = ProbeMarker::new("[Thesis]");
        for location in [Location::Pre, Location::Mid, Location::Post] {
            let status = inspect_probe(WITHOUT_MARKER, location, &probe);
            assert_eq!(status, ProbeStatus::NotTriggered);
            assert!(status.is_warning());
        }
    }

    #[test]
    fn test_triggered_keeps_marker_lines() {
        let probe = ProbeMarker::new("[Thesis]");
        let status = inspect_probe(WITH_MARKER, Location::Mid, &probe);
        assert_eq!(
            status,
            ProbeStatus::Triggered {
                lines: vec!["[Thesis] ASan pass inserted at MID".to_string()]
            }
        );
    }
}
