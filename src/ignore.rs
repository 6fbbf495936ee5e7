//! Glob-based exclusion of file names.
//!
//! Patterns come from an ignore file at the root of the target directory
//! (one shell glob per line). Blank lines and `#` comments are skipped and a
//! trailing `/` is stripped from each pattern. Matching is done against the
//! bare file name only, since the organizer never descends into folders.

use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the ignore file read from the target directory.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Compiled ignore patterns.
///
/// Patterns that fail to compile are dropped, so they never match.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    /// Compiles the given glob patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                match Pattern::new(raw) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        warn!("Ignoring invalid pattern '{}': {}", raw, e);
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Parses the contents of an ignore file.
    ///
    /// ```
    /// use sweep::ignore::IgnoreFilter;
    ///
    /// let filter = IgnoreFilter::parse("# build output\n\n*.log\nbuild/\n");
    /// assert_eq!(filter.len(), 2);
    /// assert!(filter.is_ignored("debug.log"));
    /// assert!(filter.is_ignored("build"));
    /// assert!(!filter.is_ignored("notes.txt"));
    /// ```
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(|line| line.trim_end_matches(['/', '\\']))
                .filter(|line| !line.is_empty()),
        )
    }

    /// Loads `target_dir/.gitignore`. A missing file yields an empty filter.
    pub fn load(target_dir: &Path) -> io::Result<Self> {
        let path = target_dir.join(IGNORE_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let filter = Self::parse(&content);
                debug!(
                    "Loaded {} ignore pattern(s) from {}",
                    filter.len(),
                    path.display()
                );
                Ok(filter)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No ignore file at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true if `file_name` matches any pattern.
    pub fn is_ignored(&self, file_name: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let options = match_options();
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(file_name, options))
    }
}

/// Case sensitivity follows the host filesystem convention.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: !cfg!(any(windows, target_os = "macos")),
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}
