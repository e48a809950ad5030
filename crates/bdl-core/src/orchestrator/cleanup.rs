//! Best-effort removal of a cancelled run's saved files.

use std::path::PathBuf;

use crate::error::CleanupWarning;

/// What cleanup managed to remove.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: usize,
    pub warnings: Vec<CleanupWarning>,
}

/// Delete every path. A failed deletion is logged and recorded; the rest are still attempted.
pub(crate) fn remove_saved_files(paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => report.removed += 1,
            Err(source) => {
                let warning = CleanupWarning {
                    path: path.clone(),
                    source,
                };
                tracing::warn!("cleanup: {}", warning);
                report.warnings.push(warning);
            }
        }
    }
    report
}
