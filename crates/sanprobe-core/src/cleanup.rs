//! Removal of per-trial artifacts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::HarnessConfig;

/// What a cleanup pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Paths that existed and were removed.
    pub removed: Vec<PathBuf>,

    /// Paths that could not be removed, with the error text.
    pub failed: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Every path a trial may leave behind.
pub fn artifact_paths(config: &HarnessConfig) -> Vec<PathBuf> {
    let mut paths = vec![config.object_path(), config.executable_path()];
    paths.extend(config.debug_bundle_paths());
    paths
}

/// Remove the object file, executable and debug-info bundles.
///
/// Idempotent. Missing paths are skipped and removal errors are logged and
/// reported, never returned, so a finished trial outcome is never masked.
pub fn cleanup(config: &HarnessConfig) -> CleanupReport {
    let mut report = CleanupReport::default();

    for path in artifact_paths(config) {
        match remove_path(&path) {
            Ok(true) => {
                debug!(path = %path.display(), "Removed artifact");
                report.removed.push(path);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove artifact");
                report.failed.push((path, e.to_string()));
            }
        }
    }

    report
}

/// Returns `Ok(false)` when there was nothing to remove.
fn remove_path(path: &Path) -> std::io::Result<bool> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    let removal = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match removal {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> HarnessConfig {
        HarnessConfig::for_project_root("/proj").with_work_dir(dir)
    }

    fn plant_artifacts(config: &HarnessConfig) {
        std::fs::write(config.object_path(), b"obj").unwrap();
        std::fs::write(config.executable_path(), b"exe").unwrap();
        let bundle = config.work_dir.join("test_exec.dSYM/Contents/Resources");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join("DWARF"), b"dwarf").unwrap();
    }

    #[test]
    fn test_cleanup_removes_all_artifacts() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        plant_artifacts(&config);

        let report = cleanup(&config);

        assert!(report.is_clean());
        assert_eq!(report.removed.len(), 3);
        for path in artifact_paths(&config) {
            assert!(!path.exists(), "{} should be gone", path.display());
        }
    }

    #[test]
    fn test_cleanup_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        plant_artifacts(&config);

        let first = cleanup(&config);
        let second = cleanup(&config);

        assert!(first.is_clean());
        assert!(second.is_clean());
        assert!(second.removed.is_empty());
        assert!(artifact_paths(&config).iter().all(|p| !p.exists()));
    }

    #[test]
    fn test_cleanup_on_empty_dir() {
        let dir = tempdir().unwrap();
        let report = cleanup(&config_in(dir.path()));
        assert_eq!(report, CleanupReport::default());
    }

    #[test]
    fn test_cleanup_leaves_other_files() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        plant_artifacts(&config);
        let keep = dir.path().join("test.c");
        std::fs::write(&keep, b"int main(){}").unwrap();

        cleanup(&config);

        assert!(keep.exists());
    }
}
