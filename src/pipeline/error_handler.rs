use std::path::PathBuf;

/// Report what the run could not read: counts at warn, one line per path at debug (`--verbose`).
/// Call after the pool has been joined.
pub fn report_diagnostics(skipped_paths: &[(PathBuf, String)], scan_failures: &[(PathBuf, String)]) {
    if !skipped_paths.is_empty() {
        log::warn!(
            "Skipped {} paths due to permission errors or access issues",
            skipped_paths.len()
        );
        for (p, reason) in skipped_paths {
            log::debug!("  skipped: {} ({})", p.display(), reason);
        }
    }
    if !scan_failures.is_empty() {
        log::warn!("Could not scan {} files", scan_failures.len());
        for (p, reason) in scan_failures {
            log::debug!("  unreadable: {} ({})", p.display(), reason);
        }
    }
}
