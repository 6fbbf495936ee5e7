//! Collision-free destination naming.
//!
//! Both the organizer and the undo engine funnel their destination paths
//! through [`unique_path`]. The two callers use different suffixes so that a
//! renamed file tells you which side produced it:
//!
//! - organizing: `report.pdf` → `report_1.pdf`, `report_2.pdf`, ...
//! - restoring:  `report.pdf` → `report_restored_1.pdf`, ...
//!
//! Only existence is queried; nothing here touches the filesystem otherwise.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Naming convention used when the desired path is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictStyle {
    /// `stem_N.ext`, used when moving into a category folder.
    Organize,
    /// `stem_restored_N.ext`, used when moving back to the original location.
    Restore,
}

impl ConflictStyle {
    fn candidate(self, stem: &OsStr, extension: &OsStr, counter: u64) -> OsString {
        let mut name = stem.to_os_string();
        match self {
            ConflictStyle::Organize => name.push(format!("_{counter}")),
            ConflictStyle::Restore => name.push(format!("_restored_{counter}")),
        }
        name.push(extension);
        name
    }
}

/// Splits a file name into stem and extension (extension keeps its `.`).
///
/// Leading dots belong to the stem, so `.env` has no extension while
/// `.env.local` has `.local`. Only the last suffix counts as the extension.
///
/// ```
/// use sweep::resolver::split_name;
///
/// assert_eq!(split_name("notes.txt"), ("notes", ".txt"));
/// assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_name(".env"), (".env", ""));
/// assert_eq!(split_name("README"), ("README", ""));
/// ```
pub fn split_name(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(position) => name.split_at(leading_dots + position),
        None => (name, ""),
    }
}

/// [`split_name`] for names that may not be valid UTF-8.
///
/// Non-UTF-8 names fall back to [`Path::file_stem`] and
/// [`Path::extension`], so the bytes are carried over untouched.
pub fn split_os_name(name: &OsStr) -> (OsString, OsString) {
    if let Some(name) = name.to_str() {
        let (stem, extension) = split_name(name);
        return (stem.into(), extension.into());
    }

    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(extension)) => {
            let mut dotted = OsString::from(".");
            dotted.push(extension);
            (stem.to_os_string(), dotted)
        }
        _ => (name.to_os_string(), OsString::new()),
    }
}

/// Returns true if anything, including a dangling symlink, sits at `path`.
pub fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Returns `folder/name` if it is free, otherwise the first free
/// suffixed variant according to `style`.
pub fn unique_path(folder: &Path, name: impl AsRef<OsStr>, style: ConflictStyle) -> PathBuf {
    let name = name.as_ref();
    let desired = folder.join(name);
    if !is_occupied(&desired) {
        return desired;
    }

    let (stem, extension) = split_os_name(name);
    let mut counter: u64 = 1;
    loop {
        let candidate = folder.join(style.candidate(&stem, &extension, counter));
        if !is_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Resolves a free destination for `desired_name` inside a category folder.
pub fn resolve(destination_folder: &Path, desired_name: impl AsRef<OsStr>) -> PathBuf {
    unique_path(destination_folder, desired_name, ConflictStyle::Organize)
}

/// Resolves where a file should be restored to.
///
/// Returns `original` itself when it is free, otherwise a `_restored_N`
/// sibling of it.
pub fn resolve_restore(original: &Path) -> PathBuf {
    let folder = original.parent().unwrap_or_else(|| Path::new(""));
    match original.file_name() {
        Some(name) => unique_path(folder, name, ConflictStyle::Restore),
        None => original.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_name_variants() {
        assert_eq!(split_name("a.txt"), ("a", ".txt"));
        assert_eq!(split_name(".env.local"), (".env", ".local"));
        assert_eq!(split_name("..hidden"), ("..hidden", ""));
        assert_eq!(split_name("notes."), ("notes", "."));
        assert_eq!(split_name(""), ("", ""));
    }

    #[test]
    fn test_resolve_free_path_is_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let resolved = resolve(temp_dir.path(), "a.txt");
        assert_eq!(resolved, temp_dir.path().join("a.txt"));
    }

    #[test]
    fn test_resolve_counts_up_on_conflict() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        fs::write(folder.join("a.txt"), "first").unwrap();
        let second = resolve(folder, "a.txt");
        assert_eq!(second, folder.join("a_1.txt"));

        fs::write(&second, "second").unwrap();
        let third = resolve(folder, "a.txt");
        assert_eq!(third, folder.join("a_2.txt"));
    }

    #[test]
    fn test_resolve_never_returns_existing_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        for _ in 0..5 {
            let path = resolve(folder, "report.pdf");
            assert!(!path.exists());
            fs::write(&path, "x").unwrap();
        }
        assert!(folder.join("report_4.pdf").exists());
    }

    #[test]
    fn test_resolve_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();
        fs::write(folder.join("Makefile"), "").unwrap();
        fs::write(folder.join(".env"), "").unwrap();

        assert_eq!(resolve(folder, "Makefile"), folder.join("Makefile_1"));
        assert_eq!(resolve(folder, ".env"), folder.join(".env_1"));
    }

    #[test]
    fn test_resolve_restore_uses_restored_suffix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let original = temp_dir.path().join("photo.png");

        assert_eq!(resolve_restore(&original), original);

        fs::write(&original, "new").unwrap();
        let first = resolve_restore(&original);
        assert_eq!(first, temp_dir.path().join("photo_restored_1.png"));

        fs::write(&first, "newer").unwrap();
        assert_eq!(
            resolve_restore(&original),
            temp_dir.path().join("photo_restored_2.png")
        );
    }

    #[test]
    fn test_directory_counts_as_occupied() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        assert_eq!(
            resolve(temp_dir.path(), "docs"),
            temp_dir.path().join("docs_1")
        );
    }

    // macOS refuses file names that are not valid UTF-8.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_resolve_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        fs::write(folder.join(name), "x").unwrap();

        let resolved = resolve(folder, name);
        assert_eq!(
            resolved.file_name().unwrap().as_bytes(),
            b"caf\xe9_1.txt"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_split_os_name_non_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let (stem, extension) = split_os_name(OsStr::from_bytes(b"caf\xe9.tar.gz"));
        assert_eq!(stem.as_bytes(), b"caf\xe9.tar");
        assert_eq!(extension, OsString::from(".gz"));
    }
}
