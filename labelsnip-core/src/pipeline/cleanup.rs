// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::SnipError;
use crate::ut::path::{list_dirs, list_files, snippet_annotation_stem};
use crate::ut::track::progress_warn;

/// Counts of a stale snippet removal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub skipped: usize,
}

// Files that vanished or are locked are skipped, everything else is fatal
fn is_skippable(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::ResourceBusy
    )
}

/// Remove all snippets previously generated from an annotation
///
/// Label folders (`root/label`) and nested annotation folders
/// (`root/annotation/label`) are both searched so either layout is covered.
///
/// # Arguments
///
/// * `root` - Snippet directory
/// * `annotation_stem` - Stem of the annotation file (e.g. page1)
pub fn remove_stale_snippets<P: AsRef<Path>>(
    root: P,
    annotation_stem: &str,
) -> Result<CleanupReport, SnipError> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for dir in list_dirs(root)? {
        candidates.extend(list_files(&dir)?);

        for nested in list_dirs(&dir)? {
            candidates.extend(list_files(&nested)?);
        }
    }

    let mut report = CleanupReport::default();

    for file in candidates {
        let is_stale = file
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(snippet_annotation_stem)
            .is_some_and(|stem| stem == annotation_stem);

        if !is_stale {
            continue;
        }

        match std::fs::remove_file(&file) {
            Ok(()) => report.removed += 1,
            Err(err) if is_skippable(&err) => {
                progress_warn(&format!("Could not remove {}: {}", file.display(), err));
                report.skipped += 1;
            }
            Err(err) => {
                return Err(SnipError::CleanupError {
                    path: file,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Remove empty label folders and empty annotation folders
///
/// Failures are ignored. Returns the number of removed folders.
pub fn remove_empty_folders<P: AsRef<Path>>(root: P) -> usize {
    let mut removed = 0;

    for dir in list_dirs(root).unwrap_or_default() {
        for nested in list_dirs(&dir).unwrap_or_default() {
            if std::fs::remove_dir(&nested).is_ok() {
                removed += 1;
            }
        }

        if std::fs::remove_dir(&dir).is_ok() {
            removed += 1;
        }
    }

    removed
}

#[cfg(test)]
mod test {

    use super::*;

    fn touch(path: PathBuf) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn test_remove_stale_by_label() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        touch(root.join("Text/page1-0.jpg"));
        touch(root.join("Text/page1-1.jpg"));
        touch(root.join("Figure/page1-2.jpg"));
        touch(root.join("Text/page10-0.jpg"));
        touch(root.join("Text/page2-0.jpg"));

        let report = remove_stale_snippets(root, "page1").unwrap();

        assert_eq!(report, CleanupReport { removed: 3, skipped: 0 });
        assert!(!root.join("Text/page1-0.jpg").exists());
        assert!(!root.join("Figure/page1-2.jpg").exists());
        assert!(root.join("Text/page10-0.jpg").exists());
        assert!(root.join("Text/page2-0.jpg").exists());
    }

    #[test]
    fn test_remove_stale_by_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        touch(root.join("page1/Text/page1-0.jpg"));
        touch(root.join("page1/Figure/page1-1.jpg"));
        touch(root.join("page2/Text/page2-0.jpg"));

        let report = remove_stale_snippets(root, "page1").unwrap();

        assert_eq!(report.removed, 2);
        assert!(root.join("page2/Text/page2-0.jpg").exists());
    }

    #[test]
    fn test_remove_stale_missing_root() {
        assert!(remove_stale_snippets("does_not_exist/", "page1").is_err());
    }

    #[test]
    fn test_remove_empty_folders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("Empty")).unwrap();
        std::fs::create_dir_all(root.join("page1/Text")).unwrap();
        touch(root.join("Text/page2-0.jpg"));
        touch(root.join(".labels"));

        assert_eq!(remove_empty_folders(root), 3);
        assert!(!root.join("Empty").exists());
        assert!(!root.join("page1").exists());
        assert!(root.join("Text/page2-0.jpg").exists());
        assert!(root.join(".labels").exists());
    }

    #[test]
    fn test_skippable_errors() {
        let not_found = std::io::Error::from(ErrorKind::NotFound);
        let other = std::io::Error::from(ErrorKind::InvalidData);
        assert!(is_skippable(&not_found));
        assert!(!is_skippable(&other));
    }
}
