//! Persistence of the move records that make an organize run reversible.
//!
//! The log is a pretty-printed JSON array stored inside the organized
//! directory, so any later invocation can pick it up:
//!
//! ```json
//! [
//!   { "original": "/home/me/Downloads/photo.JPG",
//!     "moved_to": "/home/me/Downloads/Images/photo.JPG" }
//! ]
//! ```
//!
//! Records are kept in the order the moves happened.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One completed, reversible file relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Absolute path of the file before it was moved.
    pub original: PathBuf,
    /// Absolute path the file was moved to.
    pub moved_to: PathBuf,
}

impl MoveRecord {
    pub fn new(original: impl Into<PathBuf>, moved_to: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
            moved_to: moved_to.into(),
        }
    }
}

/// Errors raised while reading or writing the undo log.
#[derive(Debug, Error)]
pub enum UndoLogError {
    #[error("Failed to read undo log {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write undo log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Undo log {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize undo log: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for undo log operations.
pub type UndoLogResult<T> = Result<T, UndoLogError>;

/// Reads and writes the undo log file.
pub struct UndoLog;

impl UndoLog {
    /// Writes `records` to `path`, replacing any previous log.
    ///
    /// Returns `Ok(false)` without touching the disk when `records` is empty.
    pub fn save(path: &Path, records: &[MoveRecord]) -> UndoLogResult<bool> {
        if records.is_empty() {
            return Ok(false);
        }

        let json = serde_json::to_string_pretty(records)?;
        fs::write(path, json).map_err(|source| UndoLogError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(true)
    }

    /// Loads the log at `path`.
    ///
    /// Returns `Ok(None)` when no log exists. An existing file that holds no
    /// records (an empty array or only whitespace) loads as an empty list.
    pub fn load(path: &Path) -> UndoLogResult<Option<Vec<MoveRecord>>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(UndoLogError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }

        let records = serde_json::from_str(&content).map_err(|source| UndoLogError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(records))
    }

    /// Removes the log file. A log that is already gone is not an error.
    pub fn delete(path: &Path) -> UndoLogResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(UndoLogError::Write {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_records(base: &Path) -> Vec<MoveRecord> {
        vec![
            MoveRecord::new(base.join("photo.png"), base.join("Images/photo.png")),
            MoveRecord::new(base.join("notes.txt"), base.join("Documents/notes.txt")),
            MoveRecord::new(base.join("run.exe"), base.join("Executables/run.exe")),
        ]
    }

    #[test]
    fn test_save_and_load_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        let records = sample_records(temp_dir.path());

        assert!(UndoLog::save(&log_path, &records).expect("save failed"));
        let loaded = UndoLog::load(&log_path).expect("load failed");

        assert_eq!(loaded, Some(records));
    }

    #[test]
    fn test_save_empty_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");

        assert!(!UndoLog::save(&log_path, &[]).expect("save failed"));
        assert!(!log_path.exists());
    }

    #[test]
    fn test_save_overwrites_previous_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        let records = sample_records(temp_dir.path());

        UndoLog::save(&log_path, &records).unwrap();
        UndoLog::save(&log_path, &records[..1]).unwrap();

        let loaded = UndoLog::load(&log_path).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], records[0]);
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = UndoLog::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_empty_array_and_empty_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let array_path = temp_dir.path().join("array.json");
        let blank_path = temp_dir.path().join("blank.json");
        fs::write(&array_path, "[]").unwrap();
        fs::write(&blank_path, "\n").unwrap();

        assert_eq!(UndoLog::load(&array_path).unwrap(), Some(Vec::new()));
        assert_eq!(UndoLog::load(&blank_path).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_load_corrupt_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        fs::write(&log_path, "{ not json").unwrap();

        let result = UndoLog::load(&log_path);
        assert!(matches!(result, Err(UndoLogError::Corrupt { .. })));
    }

    #[test]
    fn test_load_wrong_shape_is_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        fs::write(&log_path, r#"[{"original": "/a"}]"#).unwrap();

        assert!(matches!(
            UndoLog::load(&log_path),
            Err(UndoLogError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_log_uses_original_and_moved_to_keys() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        UndoLog::save(&log_path, &sample_records(temp_dir.path())).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&log_path).unwrap()).unwrap();
        let first = &raw.as_array().unwrap()[0];
        assert!(first["original"].as_str().unwrap().ends_with("photo.png"));
        assert!(first["moved_to"].as_str().unwrap().ends_with("photo.png"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let log_path = temp_dir.path().join(".undo.json");
        UndoLog::save(&log_path, &sample_records(temp_dir.path())).unwrap();

        UndoLog::delete(&log_path).expect("first delete failed");
        assert!(!log_path.exists());
        UndoLog::delete(&log_path).expect("second delete failed");
    }
}
