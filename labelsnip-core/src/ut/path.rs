// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::constant::{ANNOTATION_EXTENSION, SHAPE_INDEX_SEPARATOR};
use crate::error::SnipError;

/// Convert Windows style separators in externally provided paths
///
/// # Examples
///
/// ```
/// use labelsnip_core::ut::path::normalize_separators;
/// assert_eq!(normalize_separators(r".\images\page1.png"), "./images/page1.png");
/// ```
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve the image reference of an annotation file
///
/// References starting with `./` or `../` are relative to the annotations
/// directory and absolute references are kept. Any other relative reference
/// is resolved against the annotations directory, falling back to the
/// reference as-is only when the image is missing there but exists.
///
/// # Arguments
///
/// * `reference` - Image path as stored in the annotation file
/// * `annotations_dir` - Directory holding the annotation file
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use labelsnip_core::ut::path::resolve_image_reference;
///
/// let dir = Path::new("/data/annotations");
///
/// assert_eq!(
///     resolve_image_reference(r".\page1.png", dir),
///     Path::new("/data/annotations/page1.png")
/// );
///
/// assert_eq!(
///     resolve_image_reference("../scans/page1.png", dir),
///     Path::new("/data/annotations/../scans/page1.png")
/// );
///
/// assert_eq!(
///     resolve_image_reference("/scans/page1.png", dir),
///     Path::new("/scans/page1.png")
/// );
/// ```
pub fn resolve_image_reference(reference: &str, annotations_dir: &Path) -> PathBuf {
    let reference = normalize_separators(reference);

    if let Some(rest) = reference.strip_prefix("./") {
        return annotations_dir.join(rest);
    }

    if reference.starts_with("../") {
        return annotations_dir.join(&reference);
    }

    let path = PathBuf::from(&reference);

    if path.is_absolute() {
        return path;
    }

    let local = annotations_dir.join(&path);

    if local.exists() || !path.exists() {
        local
    } else {
        path
    }
}

/// Extract the annotation stem from a snippet file name
///
/// The stem is everything before the last `-` of the name without its
/// extension, e.g. `page-1-3.jpg` belongs to annotation `page-1`.
///
/// # Examples
///
/// ```
/// use labelsnip_core::ut::path::snippet_annotation_stem;
///
/// assert_eq!(snippet_annotation_stem("page1-0.jpg"), Some("page1"));
/// assert_eq!(snippet_annotation_stem("page-1-12.jpg"), Some("page-1"));
/// assert_eq!(snippet_annotation_stem("notes.txt"), None);
/// ```
pub fn snippet_annotation_stem(file_name: &str) -> Option<&str> {
    let name = Path::new(file_name).file_stem()?.to_str()?;
    let (stem, _) = name.rsplit_once(SHAPE_INDEX_SEPARATOR)?;
    Some(stem)
}

/// File stem of a path as an owned string
pub fn file_stem_string<P: AsRef<Path>>(path: P) -> Result<String, SnipError> {
    path.as_ref()
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| SnipError::NoFileError(format!("Invalid file name {}", path.as_ref().display())))
}

/// Check if a path points to a hidden entry (e.g. marker files)
pub fn is_hidden<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn list_entries(directory: &Path) -> Result<Vec<PathBuf>, SnipError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|err| SnipError::DirError(format!("{}: {}", directory.display(), err)))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| !is_hidden(path))
        .collect();

    entries.sort_unstable();
    Ok(entries)
}

/// Collect the visible sub-directories of a directory in sorted order
pub fn list_dirs<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, SnipError> {
    let mut entries = list_entries(directory.as_ref())?;
    entries.retain(|path| path.is_dir());
    Ok(entries)
}

/// Collect the visible files of a directory in sorted order
pub fn list_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, SnipError> {
    let mut entries = list_entries(directory.as_ref())?;
    entries.retain(|path| path.is_file());
    Ok(entries)
}

/// Collect annotation files directly inside a directory
///
/// # Examples
///
/// ```no_run
/// use labelsnip_core::ut::path::collect_annotation_files;
/// let files = collect_annotation_files("annotations/");
/// ```
pub fn collect_annotation_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, SnipError> {
    let mut files = list_files(directory)?;

    files.retain(|path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(ANNOTATION_EXTENSION))
    });

    Ok(files)
}
