//! Undo functionality for reverting an organize run.
//!
//! Records from the undo log are replayed newest first. Every record is
//! handled on its own: a file that is gone is skipped, and a file whose
//! original location has been taken in the meantime is restored next to it
//! under a `_restored_N` name. Once every record has been processed the log
//! is deleted.

use crate::organizer::{OrganizeError, OrganizeResult, canonical_base};
use crate::resolver::{is_occupied, resolve_restore};
use crate::undo_log::{MoveRecord, UndoLog};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file restored somewhere other than its original path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreConflict {
    /// Where the file lived before organizing.
    pub original: PathBuf,
    /// Where it was put back because `original` was taken.
    pub restored_to: PathBuf,
}

/// Represents the result of a completed undo.
#[derive(Debug)]
pub struct UndoReport {
    /// Log that was replayed (and removed).
    pub log_path: PathBuf,
    /// Number of files moved back.
    pub reverted: usize,
    /// `moved_to` paths that no longer existed.
    pub skipped: Vec<PathBuf>,
    /// Files restored under a disambiguated name.
    pub conflicts: Vec<RestoreConflict>,
}

impl UndoReport {
    fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            reverted: 0,
            skipped: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Returns the total number of records processed.
    pub fn total_processed(&self) -> usize {
        self.reverted + self.skipped.len()
    }

    /// Returns true if every file went back exactly where it came from.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.conflicts.is_empty()
    }
}

/// How an undo request ended.
#[derive(Debug)]
pub enum UndoOutcome {
    /// No undo log exists in the directory.
    NothingToRevert { log_path: PathBuf },
    /// The undo log exists but holds no records. It is left in place.
    EmptyLog { log_path: PathBuf },
    /// All records were processed and the log was removed.
    Completed(UndoReport),
}

/// Progress notifications emitted while undoing.
#[derive(Debug)]
pub enum UndoEvent<'a> {
    Started { total: usize },
    Restored {
        record: &'a MoveRecord,
        restored_to: &'a Path,
    },
    Skipped { record: &'a MoveRecord },
}

/// Manages undo operations for organize runs.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the last organize run recorded in `target_dir/log_name`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sweep::undo::{UndoManager, UndoOutcome};
    /// use std::path::Path;
    ///
    /// match UndoManager::undo(Path::new("/path/to/directory"), ".sweep_undo.json")? {
    ///     UndoOutcome::Completed(report) => println!("Reverted {} files", report.reverted),
    ///     _ => println!("Nothing to revert"),
    /// }
    /// # Ok::<(), sweep::organizer::OrganizeError>(())
    /// ```
    pub fn undo(target_dir: &Path, log_name: &str) -> OrganizeResult<UndoOutcome> {
        Self::undo_with(target_dir, log_name, |_| {})
    }

    /// Undoes the last organize run, calling `observer` for every record.
    ///
    /// # Edge Cases Handled
    ///
    /// * **Missing log**: [`UndoOutcome::NothingToRevert`], not an error
    /// * **Corrupt log**: error, no file is touched
    /// * **File not found**: the record is skipped
    /// * **Original path taken**: restored as `name_restored_N.ext`
    /// * **Original folder gone**: it is recreated
    ///
    /// Any other failure aborts the undo. Files already restored stay
    /// restored and the records not yet processed are written back to the
    /// log, so running undo again picks up where this one stopped.
    pub fn undo_with<F>(
        target_dir: &Path,
        log_name: &str,
        mut observer: F,
    ) -> OrganizeResult<UndoOutcome>
    where
        F: FnMut(UndoEvent<'_>),
    {
        let base_path = canonical_base(target_dir)?;
        let log_path = base_path.join(log_name);

        let Some(records) = UndoLog::load(&log_path)? else {
            info!("No undo log at {}", log_path.display());
            return Ok(UndoOutcome::NothingToRevert { log_path });
        };

        if records.is_empty() {
            info!("Undo log {} is empty", log_path.display());
            return Ok(UndoOutcome::EmptyLog { log_path });
        }

        observer(UndoEvent::Started {
            total: records.len(),
        });

        let mut report = UndoReport::new(log_path.clone());
        for (index, record) in records.iter().enumerate().rev() {
            if let Err(error) = Self::restore_record(record, &mut report, &mut observer) {
                if let Err(e) = UndoLog::save(&log_path, &records[..=index]) {
                    warn!("Could not write remaining records back to undo log: {}", e);
                }
                return Err(error);
            }
        }

        UndoLog::delete(&log_path)?;
        debug!("Undo log {} removed", log_path.display());

        Ok(UndoOutcome::Completed(report))
    }

    /// Moves one file back to where the record says it came from.
    fn restore_record<F>(
        record: &MoveRecord,
        report: &mut UndoReport,
        observer: &mut F,
    ) -> OrganizeResult<()>
    where
        F: FnMut(UndoEvent<'_>),
    {
        if !is_occupied(&record.moved_to) {
            info!(
                "Skipping {}: file no longer exists",
                record.moved_to.display()
            );
            report.skipped.push(record.moved_to.clone());
            observer(UndoEvent::Skipped { record });
            return Ok(());
        }

        if let Some(parent) = record.original.parent()
            && !parent.is_dir()
        {
            fs::create_dir_all(parent).map_err(|source| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let destination = resolve_restore(&record.original);
        if destination != record.original {
            info!(
                "{} is taken, restoring to {}",
                record.original.display(),
                destination.display()
            );
            report.conflicts.push(RestoreConflict {
                original: record.original.clone(),
                restored_to: destination.clone(),
            });
        }

        fs::rename(&record.moved_to, &destination).map_err(|source| {
            OrganizeError::RestoreFailed {
                from: record.moved_to.clone(),
                to: destination.clone(),
                source,
            }
        })?;

        info!(
            "Restored: {} -> {}",
            record.moved_to.display(),
            destination.display()
        );
        report.reverted += 1;
        observer(UndoEvent::Restored {
            record,
            restored_to: &destination,
        });

        Ok(())
    }
}
