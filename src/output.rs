//! Terminal output for organize and undo runs.
//!
//! Everything the user sees on stdout goes through [`OutputFormatter`]:
//! per-file action lines, the progress bar shown while files are moved,
//! and the tables printed once a run is over. Diagnostics go to `tracing`.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;

/// Totals shown under the per-category rows of the organize summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Files moved, or that would be moved in a dry run.
    pub sorted: usize,
    pub ignored: usize,
    /// Files left in place because they cannot be moved safely.
    pub skipped: usize,
    pub failed: usize,
}

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use sweep::output::OutputFormatter;
    /// OutputFormatter::success("Organization complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a bold section header preceded by a blank line.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a message tagged `[DRY RUN]`.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// One line for a completed move. `destination` is shown as given.
    pub fn moved(name: &str, destination: &Path) {
        println!("{} {} → {}", "✓".green(), name, destination.display());
    }

    /// One line for a move a dry run would perform.
    pub fn planned(name: &str, category: &str) {
        Self::dry_run_notice(&format!("{} → would move to {}/", name, category));
    }

    /// One line for a file left in place by an ignore pattern.
    pub fn ignored(name: &str) {
        println!("  {} {}", "-".dimmed(), format!("{} (ignored)", name).dimmed());
    }

    /// Creates the progress bar shown while `total` entries are processed.
    ///
    /// The bar draws to stderr and stays hidden when that is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb.set_message("sorting");
        pb
    }

    /// Prints the per-category table of an organize run.
    ///
    /// ```no_run
    /// use sweep::output::{OutputFormatter, RunTotals};
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// let totals = RunTotals { sorted: 23, ignored: 2, skipped: 0, failed: 0 };
    /// OutputFormatter::summary_table(&counts, totals, false);
    /// ```
    pub fn summary_table(
        category_counts: &BTreeMap<String, usize>,
        totals: RunTotals,
        dry_run: bool,
    ) {
        Self::header(if dry_run { "PLANNED MOVES" } else { "SUMMARY" });

        let width = column_width(category_counts.keys().map(String::as_str));
        print_row("Category".bold(), "Files".bold(), width);
        print_rule(width);

        for (category, count) in category_counts {
            print_row(category.normal(), count_cell(*count), width);
        }

        print_rule(width);
        let total_label = if dry_run { "Would move" } else { "Moved" };
        print_row(total_label.bold(), count_cell(totals.sorted).bold(), width);
        if totals.ignored > 0 {
            print_row("Ignored".normal(), count_cell(totals.ignored).dimmed(), width);
        }
        if totals.skipped > 0 {
            print_row("Skipped".yellow(), count_cell(totals.skipped).yellow(), width);
        }
        if totals.failed > 0 {
            print_row("Failed".red(), count_cell(totals.failed).red(), width);
        }
    }

    /// Prints the counters of an undo run. Zero rows other than
    /// `Restored` are left out.
    pub fn undo_table(restored: usize, skipped: usize, renamed: usize) {
        Self::header("UNDO COMPLETE");

        let width = column_width(["Restored", "Skipped", "Renamed"]);
        print_row("Restored".normal(), count_cell(restored), width);
        if skipped > 0 {
            print_row("Skipped".yellow(), count_cell(skipped).yellow(), width);
        }
        if renamed > 0 {
            print_row("Renamed".yellow(), count_cell(renamed).yellow(), width);
        }
    }
}

fn column_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
    labels
        .into_iter()
        .map(str::len)
        .chain(["Category".len(), "Would move".len()])
        .max()
        .unwrap_or(0)
}

fn count_cell(count: usize) -> ColoredString {
    format!("{} {}", count, plural(count)).green()
}

fn print_row(label: ColoredString, value: ColoredString, width: usize) {
    // Escape codes have no width; pad by the plain text.
    let padding = width.saturating_sub(label.chars().count());
    println!("{}{} | {}", label, " ".repeat(padding), value);
}

fn print_rule(width: usize) {
    println!("{}", "-".repeat(width + 12));
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
