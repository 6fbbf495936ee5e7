//! Command-line interface module for sweep.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading with fallback to defaults
//! - Organization orchestration and reporting
//! - Undo handling and reporting

use crate::config::{Config, RunConfig};
use crate::error::AppError;
use crate::organizer::{Action, OrganizeEvent, OrganizeReport, Organizer};
use crate::output::{OutputFormatter, RunTotals};
use crate::undo::{UndoEvent, UndoManager, UndoOutcome, UndoReport};
use clap::Parser;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(version, about, long_about = None)]
#[command(about = "Sort the files of a directory into category folders")]
pub struct Args {
    /// Directory to organize (defaults to your home directory)
    pub path: Option<PathBuf>,

    /// Show what would be moved without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file with custom categories and settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip files matching the patterns in the directory's .gitignore
    #[arg(long)]
    pub gitignore: bool,

    /// Revert the last organization of the directory
    #[arg(long, conflicts_with = "dry_run")]
    pub undo: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The command selected by the flags.
    pub fn command(&self) -> OrganizeCommand {
        if self.undo {
            OrganizeCommand::Undo
        } else {
            OrganizeCommand::Organize {
                dry_run: self.dry_run,
                use_ignore_file: self.gitignore,
            }
        }
    }

    /// The directory to work on: the given path or the home directory.
    pub fn target_dir(&self) -> Result<PathBuf, AppError> {
        self.path
            .clone()
            .or_else(dirs::home_dir)
            .ok_or(AppError::NoTargetDirectory)
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
        /// If true, honour the directory's ignore file.
        use_ignore_file: bool,
    },
    /// Undo the previous organization.
    Undo,
}

/// Runs the parsed command line.
pub fn run(args: &Args) -> Result<(), AppError> {
    let target_dir = args.target_dir()?;
    run_cli_with_config(args.command(), &target_dir, args.config.as_deref())
}

/// Runs a command against `dir_path` using the default configuration lookup.
///
/// # Examples
///
/// ```no_run
/// use sweep::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let command = OrganizeCommand::Organize { dry_run: true, use_ignore_file: false };
/// if let Err(e) = run_cli(command, Path::new("/path/to/directory")) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), AppError> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs a command against `dir_path` with an optional configuration file.
///
/// A configuration file that cannot be read or parsed is reported as a
/// warning and the built-in defaults are used instead.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), AppError> {
    if !dir_path.exists() {
        return Err(AppError::PathNotFound {
            path: dir_path.to_path_buf(),
        });
    }
    if !dir_path.is_dir() {
        return Err(AppError::NotADirectory {
            path: dir_path.to_path_buf(),
        });
    }

    let config = load_config(config_path);

    match command {
        OrganizeCommand::Organize {
            dry_run,
            use_ignore_file,
        } => {
            let mut run_config = config.into_run_config(dry_run, use_ignore_file);
            run_config.excluded_names.extend(own_executable_name());
            organize_directory(dir_path, &run_config)
        }
        OrganizeCommand::Undo => undo_organization(dir_path, &config.settings.undo_log_filename),
    }
}

fn load_config(config_path: Option<&Path>) -> Config {
    match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            debug!("Configuration not loaded: {}", e);
            OutputFormatter::warning(&format!("{}. Using default categories.", e));
            Config::default()
        }
    }
}

/// File name of the running binary, so it is never organized away.
fn own_executable_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    let name = exe.file_name()?.to_string_lossy().into_owned();
    debug!("Excluding own executable: {}", name);
    Some(name)
}

/// Organizes (or simulates organizing) `base_path` and prints the outcome.
fn organize_directory(base_path: &Path, config: &RunConfig) -> Result<(), AppError> {
    if config.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            base_path.display()
        ));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));
    }

    let shown_base = dunce::canonicalize(base_path).unwrap_or_else(|_| base_path.to_path_buf());
    let mut progress: Option<ProgressBar> = None;
    let report = Organizer::organize_with(base_path, config, |event| match event {
        OrganizeEvent::Started { total } => {
            if !config.dry_run && total > 0 {
                progress = Some(OutputFormatter::create_progress_bar(total as u64));
            }
        }
        OrganizeEvent::Processed(action) => match &progress {
            Some(pb) => {
                pb.suspend(|| print_action(&shown_base, action));
                pb.inc(1);
            }
            None => print_action(&shown_base, action),
        },
    })?;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_organize_summary(base_path, &report);
    Ok(())
}

fn print_action(base_path: &Path, action: &Action) {
    let name = display_name(action.source());
    match action {
        Action::Moved { record, .. } => {
            let destination = record
                .moved_to
                .strip_prefix(base_path)
                .unwrap_or(record.moved_to.as_path());
            OutputFormatter::moved(&name, destination);
        }
        Action::Planned { category, .. } => OutputFormatter::planned(&name, category),
        Action::Ignored { .. } => OutputFormatter::ignored(&name),
        Action::Skipped { reason, .. } => {
            OutputFormatter::warning(&format!("{} skipped: {}", name, reason));
        }
        Action::Failed { error, .. } => {
            OutputFormatter::error(&format!("{}: {}", name, error));
        }
    }
}

fn print_organize_summary(base_path: &Path, report: &OrganizeReport) {
    if report.count() == 0 && !report.has_failures() {
        OutputFormatter::plain("No files found to organize.");
        return;
    }

    let totals = RunTotals {
        sorted: report.count(),
        ignored: report.ignored().count(),
        skipped: report.skipped().count(),
        failed: report.failures().count(),
    };
    OutputFormatter::summary_table(&report.category_counts(), totals, report.dry_run);

    if report.dry_run {
        println!();
        OutputFormatter::success("Dry run complete. No files were modified.");
        OutputFormatter::plain(&format!(
            "Run 'sweep {}' (without --dry-run) to execute the organization.",
            base_path.display()
        ));
        return;
    }

    if let Some(log_error) = &report.log_error {
        OutputFormatter::warning(&format!("Could not save undo log: {}", log_error));
        OutputFormatter::warning(
            "The files were moved, but this run cannot be reverted with --undo.",
        );
    } else if report.log_path.is_some() {
        println!();
        OutputFormatter::success("Organization complete!");
        OutputFormatter::plain(&format!(
            "Use 'sweep {} --undo' to revert changes.",
            base_path.display()
        ));
    }

    if report.has_failures() {
        OutputFormatter::warning("Some files could not be organized. Please review errors above.");
    }
}

/// Undoes the previous organization of `base_path` and prints the outcome.
fn undo_organization(base_path: &Path, log_name: &str) -> Result<(), AppError> {
    OutputFormatter::info("Undoing previous organization...");

    let outcome = UndoManager::undo_with(base_path, log_name, |event| match event {
        UndoEvent::Started { total } => {
            debug!("Reverting {} move(s)", total);
        }
        UndoEvent::Restored {
            record,
            restored_to,
        } => {
            if restored_to == record.original.as_path() {
                OutputFormatter::success(&format!("Restored {}", restored_to.display()));
            } else {
                OutputFormatter::warning(&format!(
                    "{} is taken, restored as {}",
                    record.original.display(),
                    restored_to.display()
                ));
            }
        }
        UndoEvent::Skipped { record } => {
            OutputFormatter::warning(&format!(
                "Skipped {}: file no longer exists",
                record.moved_to.display()
            ));
        }
    })?;

    match outcome {
        UndoOutcome::NothingToRevert { log_path } => {
            OutputFormatter::plain(&format!(
                "Nothing to revert: no undo log found at {}",
                log_path.display()
            ));
        }
        UndoOutcome::EmptyLog { log_path } => {
            OutputFormatter::plain(&format!(
                "Undo log {} is empty, nothing to revert.",
                log_path.display()
            ));
        }
        UndoOutcome::Completed(report) => print_undo_summary(&report),
    }

    Ok(())
}

fn print_undo_summary(report: &UndoReport) {
    OutputFormatter::undo_table(
        report.reverted,
        report.skipped.len(),
        report.conflicts.len(),
    );
    for conflict in &report.conflicts {
        OutputFormatter::plain(&format!(
            "  {} → {}",
            conflict.original.display(),
            conflict.restored_to.display()
        ));
    }

    println!();
    OutputFormatter::success(&format!("Undo log {} removed.", report.log_path.display()));
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_to_organize() {
        let args = Args::parse_from(["sweep", "/tmp/somewhere"]);
        assert_eq!(
            args.command(),
            OrganizeCommand::Organize {
                dry_run: false,
                use_ignore_file: false
            }
        );
        assert_eq!(args.target_dir().unwrap(), PathBuf::from("/tmp/somewhere"));
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from(["sweep", "dir", "--dry-run", "--gitignore", "-vv"]);
        assert_eq!(
            args.command(),
            OrganizeCommand::Organize {
                dry_run: true,
                use_ignore_file: true
            }
        );
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_undo() {
        let args = Args::parse_from(["sweep", "dir", "--undo", "--config", "my.toml"]);
        assert_eq!(args.command(), OrganizeCommand::Undo);
        assert_eq!(args.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_undo_conflicts_with_dry_run() {
        let result = Args::try_parse_from(["sweep", "dir", "--undo", "--dry-run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_path_is_error() {
        let result = run_cli(
            OrganizeCommand::Undo,
            Path::new("/non/existent/sweep/target"),
        );
        assert!(matches!(result, Err(AppError::PathNotFound { .. })));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/photo.png")), "photo.png");
    }
}
