//! Package selection rules
//!
//! Decides which entries of a package group end up in the kit. Debug
//! artifacts are recognized by file name with glob patterns; empty files and
//! anything that is not a regular file are skipped as well.

use std::fmt;
use std::fs::Metadata;

use glob::Pattern;

use crate::error::Result;

/// Name patterns of debug-symbol and debug-source packages.
pub const DEBUG_ARTIFACT_PATTERNS: &[&str] = &["*-debuginfo-*", "*-debugsource-*"];

/// Outcome of classifying a single package-group entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Copy into the kit
    Include,
    /// Name matches a debug artifact pattern
    DebugArtifact,
    /// Zero bytes long
    Empty,
    /// Directory or other non-regular entry
    NotAFile,
}

impl Selection {
    /// Whether the entry is copied.
    pub fn is_included(self) -> bool {
        self == Selection::Include
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Selection::Include => "included",
            Selection::DebugArtifact => "debug artifact",
            Selection::Empty => "empty file",
            Selection::NotAFile => "not a regular file",
        };
        f.write_str(reason)
    }
}

/// Name-based exclusion rules for package entries
#[derive(Debug, Clone)]
pub struct PackageFilter {
    excludes: Vec<Pattern>,
}

impl PackageFilter {
    /// Build a filter excluding names that match any of `patterns`.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let excludes = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { excludes })
    }

    /// Whether `file_name` is a debug artifact.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(file_name))
    }

    /// Classify an entry from its name and (symlink-followed) metadata.
    ///
    /// The name check runs first, so a zero-length debug package reports as
    /// a debug artifact.
    pub fn classify(&self, file_name: &str, metadata: &Metadata) -> Selection {
        self.classify_parts(file_name, metadata.is_file(), metadata.len())
    }

    /// Classify from the individual facts; [`classify`](Self::classify) delegates here.
    pub fn classify_parts(&self, file_name: &str, is_file: bool, len: u64) -> Selection {
        if self.is_excluded(file_name) {
            Selection::DebugArtifact
        } else if !is_file {
            Selection::NotAFile
        } else if len == 0 {
            Selection::Empty
        } else {
            Selection::Include
        }
    }
}

impl Default for PackageFilter {
    fn default() -> Self {
        let excludes = DEBUG_ARTIFACT_PATTERNS
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();
        Self { excludes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_excludes_debug_packages() {
        let filter = PackageFilter::default();
        assert!(filter.is_excluded("kernel-debuginfo-6.1.0.x86_64.rpm"));
        assert!(filter.is_excluded("glibc-debugsource-2.38.rpm"));
        assert!(filter.is_excluded("a-debuginfo-1.0.rpm"));
    }

    #[test]
    fn test_default_keeps_regular_packages() {
        let filter = PackageFilter::default();
        assert!(!filter.is_excluded("a-1.0.rpm"));
        assert!(!filter.is_excluded("debuginfo.rpm"));
        // The pattern needs a dash on both sides.
        assert!(!filter.is_excluded("a-debuginfo.rpm"));
        assert!(!filter.is_excluded("debuginfo-1.0.rpm"));
    }

    #[test]
    fn test_classify_parts_order() {
        let filter = PackageFilter::default();
        assert_eq!(
            filter.classify_parts("a-debuginfo-1.rpm", true, 0),
            Selection::DebugArtifact
        );
        assert_eq!(filter.classify_parts("subdir", false, 4096), Selection::NotAFile);
        assert_eq!(filter.classify_parts("empty.rpm", true, 0), Selection::Empty);
        assert_eq!(filter.classify_parts("a-1.0.rpm", true, 100), Selection::Include);
    }

    #[test]
    fn test_classify_from_metadata() {
        let temp = TempDir::new().unwrap();
        let pkg = temp.path().join("a-1.0.rpm");
        let empty = temp.path().join("empty.rpm");
        let dir = temp.path().join("nested");
        fs::write(&pkg, vec![1u8; 100]).unwrap();
        fs::write(&empty, b"").unwrap();
        fs::create_dir(&dir).unwrap();

        let filter = PackageFilter::default();
        assert_eq!(
            filter.classify("a-1.0.rpm", &fs::metadata(&pkg).unwrap()),
            Selection::Include
        );
        assert_eq!(
            filter.classify("empty.rpm", &fs::metadata(&empty).unwrap()),
            Selection::Empty
        );
        assert_eq!(
            filter.classify("nested", &fs::metadata(&dir).unwrap()),
            Selection::NotAFile
        );
    }

    #[test]
    fn test_custom_patterns() {
        let filter = PackageFilter::new(&["*.src.rpm"]).unwrap();
        assert!(filter.is_excluded("a-1.0.src.rpm"));
        assert!(!filter.is_excluded("a-debuginfo-1.0.rpm"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(PackageFilter::new(&["[unclosed"]).is_err());
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(Selection::DebugArtifact.to_string(), "debug artifact");
        assert_eq!(Selection::Empty.to_string(), "empty file");
        assert!(Selection::Include.is_included());
        assert!(!Selection::NotAFile.is_included());
    }
}
