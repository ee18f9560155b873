//! Manifest refreshing
//!
//! Two independent pipelines, one per manifest format, sharing the
//! streaming hasher and the entry updater defined here.

pub mod cfg;
pub mod json;

use crate::error::Result;
use crate::util::hash::{DEFAULT_BLOCK_SIZE, digest_matches, sha256_file};
use std::fmt;
use std::path::{Path, PathBuf};

/// Resource grouping inside a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Songs,
    Bibles,
    Themes,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Songs => write!(f, "songs"),
            Category::Bibles => write!(f, "bibles"),
            Category::Themes => write!(f, "themes"),
        }
    }
}

/// A manifest record pointing at a file and carrying its checksum
pub trait HashedEntry {
    /// Path of the file relative to its category directory
    fn file_name(&self) -> &str;

    /// Currently stored digest, if any
    fn sha256(&self) -> Option<&str>;

    fn set_sha256(&mut self, digest: String);
}

/// Options shared by both pipelines
#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Read size used when streaming files through the hasher
    pub block_size: usize,

    /// Compare stored hashes without rewriting the manifest
    pub check: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            check: false,
        }
    }
}

/// What happened to a single entry during a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub category: Category,
    pub name: String,
    pub path: PathBuf,
    pub previous: Option<String>,
    pub sha256: String,
}

impl EntryOutcome {
    /// True when the stored hash did not match the file on disk
    pub fn is_stale(&self) -> bool {
        !self
            .previous
            .as_deref()
            .is_some_and(|prev| digest_matches(&self.sha256, prev))
    }
}

/// Result of running one pipeline over a manifest
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub manifest: PathBuf,
    pub entries: Vec<EntryOutcome>,
    /// Whether the manifest file was rewritten
    pub written: bool,
}

impl RefreshReport {
    /// Entries whose stored hash was missing or out of date
    pub fn stale(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|e| e.is_stale())
    }
}

/// Hash the file an entry points at and store the digest in the entry.
///
/// `progress` is called with the resolved path before the file is read.
pub fn refresh_entry<E, P>(
    entry: &mut E,
    category: Category,
    name: &str,
    base_dir: &Path,
    block_size: usize,
    progress: &mut P,
) -> Result<EntryOutcome>
where
    E: HashedEntry + ?Sized,
    P: FnMut(&Path),
{
    let path = base_dir.join(entry.file_name());
    progress(&path);

    let digest = sha256_file(&path, block_size)?;
    tracing::debug!("{} {} -> {}", category, name, digest);

    let previous = entry.sha256().map(str::to_string);
    entry.set_sha256(digest.clone());

    Ok(EntryOutcome {
        category,
        name: name.to_string(),
        path,
        previous,
        sha256: digest,
    })
}

/// Directory that category directories in a manifest are relative to
pub(crate) fn manifest_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestEntry {
        file_name: String,
        sha256: Option<String>,
    }

    impl HashedEntry for TestEntry {
        fn file_name(&self) -> &str {
            &self.file_name
        }

        fn sha256(&self) -> Option<&str> {
            self.sha256.as_deref()
        }

        fn set_sha256(&mut self, digest: String) {
            self.sha256 = Some(digest);
        }
    }

    #[test]
    fn test_refresh_entry_updates_hash() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("en.sqlite"), b"abc").unwrap();

        let mut entry = TestEntry {
            file_name: "en.sqlite".to_string(),
            sha256: Some("stale".to_string()),
        };
        let mut seen = Vec::new();
        let outcome = refresh_entry(
            &mut entry,
            Category::Songs,
            "en",
            temp.path(),
            65536,
            &mut |path: &Path| seen.push(path.to_path_buf()),
        )
        .unwrap();

        let expected = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert_eq!(entry.sha256.as_deref(), Some(expected));
        assert_eq!(entry.file_name, "en.sqlite");
        assert_eq!(outcome.previous.as_deref(), Some("stale"));
        assert_eq!(outcome.path, temp.path().join("en.sqlite"));
        assert!(outcome.is_stale());
        assert_eq!(seen, vec![temp.path().join("en.sqlite")]);
    }

    #[test]
    fn test_refresh_entry_missing_file_leaves_entry() {
        let temp = TempDir::new().unwrap();
        let mut entry = TestEntry {
            file_name: "gone.sqlite".to_string(),
            sha256: Some("old".to_string()),
        };

        let result = refresh_entry(
            &mut entry,
            Category::Themes,
            "gone",
            temp.path(),
            16,
            &mut |_: &Path| {},
        );
        assert!(result.is_err());
        assert_eq!(entry.sha256.as_deref(), Some("old"));
    }

    #[test]
    fn test_outcome_staleness() {
        let mut outcome = EntryOutcome {
            category: Category::Bibles,
            name: "kjv".to_string(),
            path: PathBuf::from("kjv.sqlite"),
            previous: None,
            sha256: "abcd".to_string(),
        };
        assert!(outcome.is_stale());

        outcome.previous = Some("ABCD".to_string());
        assert!(!outcome.is_stale());
    }

    #[test]
    fn test_manifest_dir() {
        assert_eq!(manifest_dir(Path::new("../download.cfg")), Path::new(".."));
        assert_eq!(manifest_dir(Path::new("download.cfg")), Path::new("."));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Songs.to_string(), "songs");
        assert_eq!(Category::Bibles.to_string(), "bibles");
        assert_eq!(Category::Themes.to_string(), "themes");
    }
}
