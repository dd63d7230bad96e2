//! Output formatting and styling module.
//!
//! All user-facing text goes through [`OutputFormatter`]: the end-of-run
//! report on stdout, errors on stderr, and the traversal spinner.

use crate::cli::RunSummary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::time::Duration;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red.
    pub fn error(message: &str) {
        eprintln!("{}", message.red());
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Creates a spinner that counts sorted files.
    ///
    /// The spinner draws on stderr and stays hidden when stderr is not a
    /// terminal.
    pub fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {pos} files  {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Prints the end-of-run report.
    pub fn report(summary: &RunSummary) {
        print!("{}", Self::render_report(summary));
        Self::success(&format!(
            "Sorted {} file(s) into {}",
            summary.files_placed,
            summary.result_dir.display()
        ));
    }

    /// Renders the known/unknown extension lines followed by every category
    /// folder and its entries, one tab-indented line each.
    pub fn render_report(summary: &RunSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {}",
            "Known extensions:".bold(),
            join_extensions(&summary.report.known)
        );
        let _ = writeln!(
            out,
            "{} {}",
            "Unknown extensions:".bold(),
            join_extensions(&summary.report.unknown)
        );

        for (category, entries) in &summary.placed {
            let _ = writeln!(out, "{}:", category.cyan());
            for entry in entries {
                let _ = writeln!(out, "\t{}", entry);
            }
        }
        out
    }
}

fn join_extensions(extensions: &BTreeSet<String>) -> String {
    if extensions.is_empty() {
        return "(none)".to_string();
    }
    extensions.iter().cloned().collect::<Vec<_>>().join(", ")
}
