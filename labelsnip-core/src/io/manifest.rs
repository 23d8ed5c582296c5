// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::constant::{ANNOTATION_EXTENSION, MANIFEST_FILE, MANIFEST_HEADER};
use crate::error::SnipError;
use crate::pipeline::SaveMode;
use crate::ut::path::{list_dirs, list_files, snippet_annotation_stem};

/// Listing of the annotation files that contributed to a snippet directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    stems: BTreeSet<String>,
}

impl Manifest {
    /// Scan a snippet directory for the annotation stems of its snippets
    ///
    /// # Arguments
    ///
    /// * `root` - Snippet directory
    /// * `mode` - Folder layout used to locate the label folders
    pub fn scan<P: AsRef<Path>>(root: P, mode: SaveMode) -> Result<Manifest, SnipError> {
        let mut label_dirs: Vec<PathBuf> = Vec::new();

        for dir in list_dirs(root)? {
            match mode {
                SaveMode::ByLabel => label_dirs.push(dir),
                SaveMode::ByAnnotation => label_dirs.extend(list_dirs(&dir)?),
            }
        }

        let mut stems = BTreeSet::new();

        for dir in label_dirs {
            for file in list_files(&dir)? {
                if let Some(stem) = file
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(snippet_annotation_stem)
                {
                    stems.insert(stem.to_string());
                }
            }
        }

        Ok(Manifest { stems })
    }

    /// Annotation stems in lexicographic order
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.stems.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Manifest file contents
    pub fn render(&self) -> String {
        let mut contents = format!("{}\n\n", MANIFEST_HEADER);

        for stem in &self.stems {
            contents.push_str(&format!("{}.{}\n", stem, ANNOTATION_EXTENSION));
        }

        contents
    }

    /// Replace the manifest file of a snippet directory
    pub fn save<P: AsRef<Path>>(&self, root: P) -> Result<PathBuf, SnipError> {
        let path = root.as_ref().join(MANIFEST_FILE);

        std::fs::write(&path, self.render())
            .map_err(|err| SnipError::DirError(format!("{}: {}", path.display(), err)))?;

        Ok(path)
    }

    /// Rebuild the manifest of a snippet directory from scratch
    pub fn rebuild<P: AsRef<Path>>(root: P, mode: SaveMode) -> Result<Manifest, SnipError> {
        let manifest = Manifest::scan(&root, mode)?;
        manifest.save(&root)?;
        Ok(manifest)
    }
}
