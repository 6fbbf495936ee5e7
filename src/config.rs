//! Configuration file loading.
//!
//! The configuration is a TOML file with two optional tables:
//!
//! ```toml
//! [settings]
//! undo_log_filename = ".sweep_undo.json"
//! handle_dotfiles = false
//! persist_each_move = false
//!
//! [categories]
//! Screenshots = [".png"]
//! Code = [".rs", ".py"]
//! ```
//!
//! User categories are evaluated before the built-in ones, in file order.
//! Built-in categories the user did not redefine follow in their usual order.

use crate::category::CategoryRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default name of the undo log written into the organized directory.
pub const DEFAULT_UNDO_LOG: &str = ".sweep_undo.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// The `[settings]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File name of the undo log inside the target directory.
    pub undo_log_filename: String,
    /// Move dotfiles into the `Config` folder instead of leaving them alone.
    pub handle_dotfiles: bool,
    /// Rewrite the undo log after every move instead of once at the end.
    pub persist_each_move: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            undo_log_filename: DEFAULT_UNDO_LOG.to_string(),
            handle_dotfiles: false,
            persist_each_move: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    categories: toml::Table,
}

/// Fully merged configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    pub categories: CategoryRules,
}

impl Config {
    /// Loads configuration, falling back to defaults when nothing is found.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (it must exist)
    /// 2. `<config dir>/sweep/config.toml`
    /// 3. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            return Self::load_from_file(&user_config);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loading configuration from {}", path.display());
        Self::parse(&content, path)
    }

    /// Parses TOML content. `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let invalid = |reason: String| ConfigError::Invalid {
            path: origin.to_path_buf(),
            reason,
        };

        let log_name = raw.settings.undo_log_filename.trim();
        if !is_plain_name(log_name) {
            return Err(invalid(format!(
                "undo_log_filename must be a plain file name, got '{}'",
                raw.settings.undo_log_filename
            )));
        }

        let mut categories = CategoryRules::new();
        for (label, value) in &raw.categories {
            if !is_plain_name(label) {
                return Err(invalid(format!(
                    "category label must be a plain folder name, got '{label}'"
                )));
            }
            let extensions = value
                .as_array()
                .ok_or_else(|| invalid(format!("category '{label}' must be a list of extensions")))?
                .iter()
                .map(|ext| {
                    ext.as_str().ok_or_else(|| {
                        invalid(format!("category '{label}' contains a non-string extension"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            categories.add_category(label.as_str(), extensions);
        }

        for builtin in CategoryRules::default().iter() {
            if !categories.contains_label(&builtin.label) {
                categories.add_category(builtin.label.as_str(), &builtin.extensions);
            }
        }

        Ok(Self {
            settings: Settings {
                undo_log_filename: log_name.to_string(),
                ..raw.settings
            },
            categories,
        })
    }

    /// Combines this configuration with per-invocation flags.
    pub fn into_run_config(self, dry_run: bool, use_ignore_file: bool) -> RunConfig {
        RunConfig {
            categories: self.categories,
            undo_log_name: self.settings.undo_log_filename,
            dry_run,
            handle_dotfiles: self.settings.handle_dotfiles,
            use_ignore_file,
            persist_each_move: self.settings.persist_each_move,
            excluded_names: Vec::new(),
        }
    }
}

/// Everything one organize run needs to know. Immutable for the run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub categories: CategoryRules,
    pub undo_log_name: String,
    pub dry_run: bool,
    pub handle_dotfiles: bool,
    pub use_ignore_file: bool,
    pub persist_each_move: bool,
    /// Entry names never organized (the tool's own executable).
    pub excluded_names: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Config::default().into_run_config(false, false)
    }
}

/// A single path component naming an entry inside the target directory.
fn is_plain_name(name: &str) -> bool {
    !name.trim().is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// `<config dir>/sweep/config.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sweep").join("config.toml"))
}
