//! The `report.txt` written at the end of every run.

use crate::file_category::Category;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::stats::Stats;
use std::fs;
use std::path::Path;

/// Builds the report lines from a finished run's statistics.
///
/// Categories come in declaration order and are listed even when empty.
/// Paths and extensions within a section are sorted.
///
/// ```
/// use clean_folder::file_category::Category;
/// use clean_folder::report::build_report;
/// use clean_folder::stats::StatsStore;
///
/// let store = StatsStore::new();
/// store.record(Category::Documents, "/r/documents/a.txt");
/// store.record_known(".txt");
///
/// let lines = build_report(&store.into_stats());
/// assert_eq!(lines[0], "Categories");
/// assert_eq!(lines[1], "\taudio");
/// assert_eq!(lines[2], "\tdocuments");
/// assert_eq!(lines[3], "\t\t/r/documents/a.txt");
/// assert_eq!(lines.last().map(String::as_str), Some("Unknown"));
/// ```
pub fn build_report(stats: &Stats) -> Vec<String> {
    let mut report = vec!["Categories".to_string()];

    for category in Category::ALL {
        report.push(format!("\t{category}"));
        if let Some(paths) = stats.paths(category) {
            report.extend(paths.iter().map(|path| format!("\t\t{path}")));
        }
    }

    report.push("Known".to_string());
    report.extend(stats.known.iter().map(|ext| format!("\t{ext}")));

    report.push("Unknown".to_string());
    report.extend(stats.unknown.iter().map(|ext| format!("\t{ext}")));

    report
}

/// Writes report lines joined by `\n`, replacing any previous report.
pub fn save_report(lines: &[String], path: &Path) -> OrganizeResult<()> {
    fs::write(path, lines.join("\n")).map_err(|e| OrganizeError::ReportWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
