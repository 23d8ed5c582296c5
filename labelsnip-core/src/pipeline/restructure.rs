// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::error::SnipError;
use crate::pipeline::SaveMode;
use crate::ut::path::{list_dirs, list_files, snippet_annotation_stem};
use crate::ut::track::{progress_log, progress_warn, thousands_format};

/// Counts of a folder layout conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestructureReport {
    pub from: SaveMode,
    pub to: SaveMode,
    pub moved: usize,
    pub skipped: usize,
    pub folders_removed: usize,
}

/// Location of a snippet in the other folder layout
///
/// The label is the name of the folder holding the snippet and the
/// annotation stem is taken from the snippet name.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use labelsnip_core::pipeline::{SaveMode, counterpart_path};
///
/// let root = Path::new("Snippets");
///
/// assert_eq!(
///     counterpart_path(root, Path::new("Snippets/Text/page1-0.jpg"), SaveMode::ByLabel),
///     Some(Path::new("Snippets/page1/Text/page1-0.jpg").to_path_buf())
/// );
///
/// assert_eq!(
///     counterpart_path(root, Path::new("Snippets/page1/Text/page1-0.jpg"), SaveMode::ByAnnotation),
///     Some(Path::new("Snippets/Text/page1-0.jpg").to_path_buf())
/// );
/// ```
pub fn counterpart_path(root: &Path, snippet: &Path, from: SaveMode) -> Option<PathBuf> {
    let file_name = snippet.file_name()?;
    let label = snippet.parent()?.file_name()?;

    match from {
        SaveMode::ByLabel => {
            let stem = snippet_annotation_stem(file_name.to_str()?)?;
            Some(root.join(stem).join(label).join(file_name))
        }
        SaveMode::ByAnnotation => Some(root.join(label).join(file_name)),
    }
}

fn collect_snippets(root: &Path, mode: SaveMode) -> Result<Vec<PathBuf>, SnipError> {
    let mut label_dirs: Vec<PathBuf> = Vec::new();

    for dir in list_dirs(root)? {
        match mode {
            SaveMode::ByLabel => label_dirs.push(dir),
            SaveMode::ByAnnotation => label_dirs.extend(list_dirs(&dir)?),
        }
    }

    let mut snippets = Vec::new();
    for dir in label_dirs {
        snippets.extend(list_files(&dir)?);
    }

    Ok(snippets)
}

// Remove a folder and its empty parents, never touching the root itself
fn remove_empty_parents(root: &Path, folder: &Path) -> usize {
    let mut removed = 0;
    let mut current = Some(folder);

    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || std::fs::remove_dir(dir).is_err() {
            break;
        }

        removed += 1;
        current = dir.parent();
    }

    removed
}

/// Convert a snippet directory between the label and annotation layouts
///
/// The current layout is read from the marker file (label layout when no
/// marker exists). Every snippet is moved, emptied folders are removed and
/// the marker is swapped.
///
/// # Arguments
///
/// * `root` - Snippet directory
/// * `verbose` - Print progress to console
pub fn restructure<P: AsRef<Path>>(root: P, verbose: bool) -> Result<RestructureReport, SnipError> {
    let root = root.as_ref();

    if !root.is_dir() {
        return Err(SnipError::DirError(format!(
            "Snippet directory {} does not exist",
            root.display()
        )));
    }

    let from = SaveMode::read_marker(root).unwrap_or_default();
    let to = from.toggled();

    let snippets = collect_snippets(root, from)?;

    progress_log(
        &format!(
            "Moving {} snippets from {} to {} layout.",
            thousands_format(snippets.len()),
            from,
            to
        ),
        verbose,
    );

    let mut report = RestructureReport {
        from,
        to,
        moved: 0,
        skipped: 0,
        folders_removed: 0,
    };

    for snippet in snippets {
        let Some(target) = counterpart_path(root, &snippet, from) else {
            progress_warn(&format!(
                "{} is not a snippet and was left in place.",
                snippet.display()
            ));
            report.skipped += 1;
            continue;
        };

        let move_error = |message: String| SnipError::MoveError {
            path: snippet.clone(),
            message,
        };

        if target.exists() {
            return Err(move_error(format!("{} already exists", target.display())));
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|err| move_error(err.to_string()))?;
        }

        std::fs::rename(&snippet, &target).map_err(|err| move_error(err.to_string()))?;
        report.moved += 1;

        if let Some(folder) = snippet.parent() {
            report.folders_removed += remove_empty_parents(root, folder);
        }
    }

    to.write_marker(root)?;

    progress_log(
        &format!(
            "Complete. {} snippets moved, {} folders removed, sorted by {}.",
            thousands_format(report.moved),
            report.folders_removed,
            to
        ),
        verbose,
    );

    Ok(report)
}
