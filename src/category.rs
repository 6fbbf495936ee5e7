//! Extension-based classification of files into category folders.
//!
//! A [`CategoryRules`] value is an ordered list of category labels, each owning
//! a set of lowercase extensions (with their leading `.`). Lookups go through
//! an extension index built once when the rules are assembled; when the same
//! extension is listed under several categories the earliest one wins.
//!
//! # Examples
//!
//! ```
//! use sweep::category::CategoryRules;
//!
//! let rules = CategoryRules::default();
//! assert_eq!(rules.classify("photo.JPG"), "Images");
//! assert_eq!(rules.classify("notes.txt"), "Documents");
//! assert_eq!(rules.classify("data.xyz"), "Others");
//! ```

use crate::resolver::split_name;
use std::collections::HashMap;

/// Label returned when no category claims an extension.
pub const OTHERS: &str = "Others";

/// Folder that receives dotfiles when dotfile handling is enabled.
pub const DOTFILE_CATEGORY: &str = "Config";

/// Built-in categories, in evaluation order.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Images", &[".png", ".jpg", ".jpeg", ".webp", ".gif", ".svg"]),
    ("Videos", &[".mp4", ".mkv", ".mov", ".avi"]),
    ("Documents", &[".md", ".txt", ".pdf", ".docx", ".pptv", ".csv"]),
    ("Archives", &[".zip", ".7z", ".rar", ".tar"]),
    ("Executables", &[".exe", ".msi", ".sh", ".bat"]),
    ("Music", &[".mp3", ".wav"]),
];

/// A single category label and the extensions it claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Folder name the matching files are moved into.
    pub label: String,
    /// Normalised extensions (lowercase, leading `.`).
    pub extensions: Vec<String>,
}

/// Ordered category rule set with a precomputed extension index.
#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    extension_map: HashMap<String, usize>,
}

impl CategoryRules {
    /// Creates an empty rule set. Every file classifies as [`OTHERS`].
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            extension_map: HashMap::new(),
        }
    }

    /// Builds a rule set from `(label, extensions)` pairs, keeping their order.
    pub fn from_pairs<I, L, E, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, E)>,
        L: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::new();
        for (label, extensions) in pairs {
            rules.add_category(label, extensions);
        }
        rules
    }

    /// Appends a category after the existing ones.
    ///
    /// If `label` is already present its extensions are replaced in place,
    /// so the category keeps its original position.
    pub fn add_category<L, E, S>(&mut self, label: L, extensions: E)
    where
        L: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let label = label.into();
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| ext.len() > 1)
            .collect();

        match self.rules.iter_mut().find(|rule| rule.label == label) {
            Some(rule) => rule.extensions = extensions,
            None => self.rules.push(CategoryRule { label, extensions }),
        }
        self.rebuild_index();
    }

    /// Returns true if a category with this label exists.
    pub fn contains_label(&self, label: &str) -> bool {
        self.rules.iter().any(|rule| rule.label == label)
    }

    /// Iterates over the categories in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Maps an extension (with or without the leading `.`, any case) to its
    /// category label, or [`OTHERS`] if no category claims it.
    ///
    /// ```
    /// use sweep::category::CategoryRules;
    ///
    /// let rules = CategoryRules::default();
    /// assert_eq!(rules.classify_extension(".ZIP"), "Archives");
    /// assert_eq!(rules.classify_extension("mp3"), "Music");
    /// assert_eq!(rules.classify_extension(""), "Others");
    /// ```
    pub fn classify_extension(&self, extension: &str) -> &str {
        self.extension_map
            .get(&normalize_extension(extension))
            .map(|&index| self.rules[index].label.as_str())
            .unwrap_or(OTHERS)
    }

    /// Classifies a file by the extension of its name.
    ///
    /// Dotfiles are not special-cased here: `.env` has no extension and
    /// therefore classifies as [`OTHERS`].
    pub fn classify(&self, file_name: &str) -> &str {
        let (_, extension) = split_name(file_name);
        self.classify_extension(extension)
    }

    fn rebuild_index(&mut self) {
        self.extension_map.clear();
        for (index, rule) in self.rules.iter().enumerate() {
            for ext in &rule.extensions {
                // First category listing an extension keeps it.
                self.extension_map.entry(ext.clone()).or_insert(index);
            }
        }
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::from_pairs(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(label, extensions)| (*label, extensions.iter())),
        )
    }
}

/// Lowercases an extension and makes sure it starts with a single `.`.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}
