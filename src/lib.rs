//! sweep - sort the files of a directory into category folders
//!
//! This library classifies top-level files by extension, moves them into
//! category subdirectories (or only reports what it would do), records every
//! move in an undo log inside the directory, and replays that log backwards
//! to put everything back.

pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod resolver;
pub mod undo;
pub mod undo_log;

pub use category::{CategoryRules, DOTFILE_CATEGORY, OTHERS};
pub use config::{Config, ConfigError, RunConfig, Settings};
pub use error::{AppError, ExitCode};
pub use ignore::IgnoreFilter;
pub use organizer::{Action, OrganizeError, OrganizeReport, Organizer};
pub use undo::{UndoManager, UndoOutcome, UndoReport};
pub use undo_log::{MoveRecord, UndoLog, UndoLogError};

pub use cli::{OrganizeCommand, run_cli, run_cli_with_config};
