//! Output formatting and styling module.
//!
//! All console output for the CLI goes through here: status lines, the
//! dispatch progress bar and the end-of-run summary table.

use crate::sorter::RunSummary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// OutputFormatter::success("Sorted successfully");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for the dispatch pass.
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints per-category file counts, then whatever went wrong.
    pub fn summary_table(summary: &RunSummary) {
        Self::header("SUMMARY");

        let width = summary
            .files_per_category
            .iter()
            .map(|(category, _)| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &summary.files_per_category {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                files_word(*count),
                width = width
            );
        }

        let total = summary.total_files();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            files_word(total),
            width = width
        );

        if summary.removed_dirs > 0 {
            Self::plain(&format!("Removed {} empty folder(s)", summary.removed_dirs));
        }
        if summary.failed_moves > 0 {
            Self::warning(&format!("{} file(s) could not be moved", summary.failed_moves));
        }
        if summary.failed_extractions > 0 {
            Self::warning(&format!(
                "{} archive(s) could not be unpacked",
                summary.failed_extractions
            ));
        }
        if summary.kept_dirs > 0 {
            Self::warning(&format!(
                "{} folder(s) were not empty and were left in place",
                summary.kept_dirs
            ));
        }
        if summary.report_saved {
            Self::plain(&format!("Report saved to {}", summary.report_path.display()));
        } else {
            Self::error("Report could not be saved; its contents were printed above");
        }
    }
}

fn files_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
