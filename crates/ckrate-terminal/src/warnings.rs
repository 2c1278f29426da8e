//! Warning banners shown above reports

use colored::*;

/// Render report warnings, one per line
///
/// Returns an empty string when there is nothing to report. Coloring follows
/// the global `colored` override, so callers disable it for non-terminals.
pub fn format_warnings(warnings: &[String]) -> String {
    warnings
        .iter()
        .map(|warning| format!("{} {}\n", "warning:".yellow().bold(), warning))
        .collect()
}
