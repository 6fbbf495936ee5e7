//! Moving the top-level files of a directory into category folders.
//!
//! An organize run works in two steps. [`Organizer::plan`] lists the target
//! directory and decides, per entry, whether it is skipped, ignored or moved
//! and into which category. [`Organizer::organize_with`] then carries out the
//! plan (or only reports it in dry-run mode), records every completed move
//! and finally writes the undo log.

use crate::category::DOTFILE_CATEGORY;
use crate::config::RunConfig;
use crate::ignore::IgnoreFilter;
use crate::resolver::resolve;
use crate::undo_log::{MoveRecord, UndoLog, UndoLogError};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Errors that can occur during organize and undo runs.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory is missing or not a directory.
    #[error("Invalid base path {path}: {source}")]
    InvalidBasePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read ignore file in {path}: {source}")]
    IgnoreFileFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to restore {from} to {to}: {source}")]
    RestoreFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Log(#[from] UndoLogError),
}

/// Result type for organize and undo operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What the planner decided for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Move the entry into the named category folder.
    Move { category: String },
    /// The entry matched an ignore pattern.
    Ignore,
    /// The entry cannot be moved safely and is left in place.
    Skip { reason: String },
}

/// A directory entry together with its planned fate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub name: String,
    pub source: PathBuf,
    pub decision: Decision,
}

/// Outcome for a single entry of an organize run.
#[derive(Debug)]
pub enum Action {
    /// The file was moved; the record is in the undo log.
    Moved { record: MoveRecord, category: String },
    /// Dry run: the file would be moved into `category`.
    Planned { source: PathBuf, category: String },
    /// The file matched an ignore pattern and was left in place.
    Ignored { source: PathBuf },
    /// The file was left in place because it cannot be moved safely.
    Skipped { source: PathBuf, reason: String },
    /// Moving the file failed; it was left in place and not recorded.
    Failed {
        source: PathBuf,
        category: String,
        error: OrganizeError,
    },
}

impl Action {
    /// Category the entry went (or would go) into, if any.
    pub fn category(&self) -> Option<&str> {
        match self {
            Action::Moved { category, .. }
            | Action::Planned { category, .. }
            | Action::Failed { category, .. } => Some(category.as_str()),
            Action::Ignored { .. } | Action::Skipped { .. } => None,
        }
    }

    /// Path of the entry before the run.
    pub fn source(&self) -> &Path {
        match self {
            Action::Moved { record, .. } => record.original.as_path(),
            Action::Planned { source, .. }
            | Action::Ignored { source }
            | Action::Skipped { source, .. }
            | Action::Failed { source, .. } => source.as_path(),
        }
    }
}

/// Progress notifications emitted while organizing.
#[derive(Debug)]
pub enum OrganizeEvent<'a> {
    /// Planning finished; `total` entries will be processed.
    Started { total: usize },
    /// One entry was processed.
    Processed(&'a Action),
}

/// Everything that happened during one organize run.
#[derive(Debug)]
pub struct OrganizeReport {
    /// Canonical path of the organized directory.
    pub base_path: PathBuf,
    pub dry_run: bool,
    /// One action per processed entry, in processing order.
    pub actions: Vec<Action>,
    /// Where the undo log was written, if it was.
    pub log_path: Option<PathBuf>,
    /// Set when the moves succeeded but the undo log could not be written.
    pub log_error: Option<UndoLogError>,
}

impl OrganizeReport {
    fn new(base_path: PathBuf, dry_run: bool) -> Self {
        Self {
            base_path,
            dry_run,
            actions: Vec::new(),
            log_path: None,
            log_error: None,
        }
    }

    /// Number of entries moved, or that would be moved in a dry run.
    pub fn count(&self) -> usize {
        self.actions
            .iter()
            .filter(|action| matches!(action, Action::Moved { .. } | Action::Planned { .. }))
            .count()
    }

    /// Move records of this run, in chronological order.
    pub fn records(&self) -> Vec<&MoveRecord> {
        self.actions
            .iter()
            .filter_map(|action| match action {
                Action::Moved { record, .. } => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn ignored(&self) -> impl Iterator<Item = &Path> {
        self.actions.iter().filter_map(|action| match action {
            Action::Ignored { source } => Some(source.as_path()),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .filter(|action| matches!(action, Action::Skipped { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &Action> {
        self.actions
            .iter()
            .filter(|action| matches!(action, Action::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Moved (or planned) entries per category, sorted by category name.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for action in &self.actions {
            if let Action::Moved { category, .. } | Action::Planned { category, .. } = action {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Organizes files by moving them into category subdirectories.
pub struct Organizer;

impl Organizer {
    /// Organizes `target_dir` without progress notifications.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sweep::config::RunConfig;
    /// use sweep::organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let config = RunConfig { dry_run: true, ..RunConfig::default() };
    /// let report = Organizer::organize(Path::new("/path/to/downloads"), &config)?;
    /// println!("{} file(s) would be moved", report.count());
    /// # Ok::<(), sweep::organizer::OrganizeError>(())
    /// ```
    pub fn organize(target_dir: &Path, config: &RunConfig) -> OrganizeResult<OrganizeReport> {
        Self::organize_with(target_dir, config, |_| {})
    }

    /// Organizes `target_dir`, calling `observer` as the run progresses.
    ///
    /// Failing to move one file does not stop the run: the failure is
    /// reported as [`Action::Failed`] and only completed moves are recorded.
    /// A failure to write the undo log is reported in
    /// [`OrganizeReport::log_error`]; the moves themselves are kept.
    pub fn organize_with<F>(
        target_dir: &Path,
        config: &RunConfig,
        mut observer: F,
    ) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(OrganizeEvent<'_>),
    {
        let base_path = canonical_base(target_dir)?;
        let plan = Self::plan(&base_path, config)?;
        observer(OrganizeEvent::Started { total: plan.len() });

        let log_path = base_path.join(&config.undo_log_name);
        let mut report = OrganizeReport::new(base_path.clone(), config.dry_run);
        let mut records: Vec<MoveRecord> = Vec::new();

        for entry in plan {
            let action = match entry.decision {
                Decision::Ignore => {
                    debug!("Ignored: {}", entry.name);
                    Action::Ignored {
                        source: entry.source,
                    }
                }
                Decision::Skip { reason } => {
                    info!("Skipped {}: {}", entry.name, reason);
                    Action::Skipped {
                        source: entry.source,
                        reason,
                    }
                }
                Decision::Move { category } if config.dry_run => {
                    info!("Would move: {} -> {}", entry.name, category);
                    Action::Planned {
                        source: entry.source,
                        category,
                    }
                }
                Decision::Move { category } => {
                    match Self::move_to_category(&base_path, &entry.source, &category) {
                        Ok(record) => {
                            info!("Moved: {} -> {}", entry.name, record.moved_to.display());
                            records.push(record.clone());
                            if config.persist_each_move
                                && let Err(e) = UndoLog::save(&log_path, &records)
                            {
                                warn!("Could not update undo log after move: {}", e);
                            }
                            Action::Moved { record, category }
                        }
                        Err(error) => {
                            info!("{}", error);
                            Action::Failed {
                                source: entry.source,
                                category,
                                error,
                            }
                        }
                    }
                }
            };

            observer(OrganizeEvent::Processed(&action));
            report.actions.push(action);
        }

        if !config.dry_run && !records.is_empty() {
            match UndoLog::save(&log_path, &records) {
                Ok(_) => {
                    debug!("Undo log with {} record(s) written", records.len());
                    report.log_path = Some(log_path);
                }
                Err(e) => {
                    info!("Could not save undo log: {}", e);
                    report.log_error = Some(e);
                }
            }
        }

        Ok(report)
    }

    /// Lists `base_path` and decides what happens to each top-level entry.
    ///
    /// Directories, the undo log and entries named in
    /// [`RunConfig::excluded_names`] are never part of the plan. Dotfiles are
    /// dropped unless dotfile handling is on, in which case they go to the
    /// `Config` folder without consulting ignore patterns or categories.
    /// Entries whose path is not valid UTF-8 are planned as
    /// [`Decision::Skip`], since the undo log could not record them.
    pub fn plan(base_path: &Path, config: &RunConfig) -> OrganizeResult<Vec<PlannedEntry>> {
        let ignore = if config.use_ignore_file {
            IgnoreFilter::load(base_path).map_err(|source| OrganizeError::IgnoreFileFailed {
                path: base_path.to_path_buf(),
                source,
            })?
        } else {
            IgnoreFilter::default()
        };

        let entries = fs::read_dir(base_path).map_err(|source| OrganizeError::ReadDirFailed {
            path: base_path.to_path_buf(),
            source,
        })?;

        let mut plan = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", base_path.display(), e);
                    continue;
                }
            };
            let source = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if source.is_dir() {
                trace!("Skipping directory: {}", name);
                continue;
            }
            if name == config.undo_log_name || config.excluded_names.contains(&name) {
                trace!("Skipping excluded entry: {}", name);
                continue;
            }

            if name.starts_with('.') && !config.handle_dotfiles {
                trace!("Skipping dotfile: {}", name);
                continue;
            }

            // The undo log stores paths as JSON strings.
            let decision = if source.to_str().is_none() {
                Decision::Skip {
                    reason: "path is not valid UTF-8 and cannot be recorded in the undo log"
                        .to_string(),
                }
            } else if name.starts_with('.') {
                Decision::Move {
                    category: DOTFILE_CATEGORY.to_string(),
                }
            } else if ignore.is_ignored(&name) {
                Decision::Ignore
            } else {
                Decision::Move {
                    category: config.categories.classify(&name).to_string(),
                }
            };

            debug!("Planned {}: {:?}", name, decision);
            plan.push(PlannedEntry {
                name,
                source,
                decision,
            });
        }

        Ok(plan)
    }

    /// Moves a file into its category directory within the base path and
    /// returns the record needed to reverse the move.
    ///
    /// The category directory is created if needed and the destination name
    /// is made unique with a `_N` suffix when the folder already holds a file
    /// of the same name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sweep::organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let record = Organizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     "Images",
    /// )?;
    /// println!("{} -> {}", record.original.display(), record.moved_to.display());
    /// # Ok::<(), sweep::organizer::OrganizeError>(())
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> OrganizeResult<MoveRecord> {
        let category_path = base_path.join(category);

        if !category_path.is_dir() {
            fs::create_dir(&category_path).map_err(|source| {
                OrganizeError::DirectoryCreationFailed {
                    path: category_path.clone(),
                    source,
                }
            })?;
        }

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailed {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            })?;

        let destination = resolve(&category_path, file_name);

        fs::rename(file_path, &destination).map_err(|source| OrganizeError::FileMoveFailed {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source,
        })?;

        Ok(MoveRecord::new(file_path, destination))
    }
}

/// Canonical, absolute form of a directory that must exist.
pub(crate) fn canonical_base(target_dir: &Path) -> OrganizeResult<PathBuf> {
    let base = dunce::canonicalize(target_dir).map_err(|source| OrganizeError::InvalidBasePath {
        path: target_dir.to_path_buf(),
        source,
    })?;

    if !base.is_dir() {
        return Err(OrganizeError::InvalidBasePath {
            path: target_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    Ok(base)
}
