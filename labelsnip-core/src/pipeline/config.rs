// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::constant::{DEFAULT_ARCHIVE_DIR, DEFAULT_SNIPPET_DIR};
use crate::error::SnipError;
use crate::pipeline::SaveMode;
use crate::ut::track::{progress_log, progress_warn};

/// Settings of a processing run as requested by a caller
///
/// Output and archive directories default to `Snippets` and `Archive`
/// inside of the annotations directory.
///
/// # Examples
///
/// ```no_run
/// use labelsnip_core::pipeline::{ProcessOptions, SaveMode};
///
/// let config = ProcessOptions::new("annotations/")
///     .with_save_mode(Some(SaveMode::ByAnnotation))
///     .with_verbose(true)
///     .resolve()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    input_dir: PathBuf,
    output_dir: Option<PathBuf>,
    archive_dir: Option<PathBuf>,
    save_mode: Option<SaveMode>,
    skip_invalid: bool,
    verbose: bool,
}

/// Fully resolved settings of a processing run
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub save_mode: SaveMode,
    pub skip_invalid: bool,
    pub verbose: bool,
}

impl ProcessOptions {
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: None,
            archive_dir: None,
            save_mode: None,
            skip_invalid: false,
            verbose: false,
        }
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_archive_dir(mut self, archive_dir: Option<PathBuf>) -> Self {
        self.archive_dir = archive_dir;
        self
    }

    pub fn with_save_mode(mut self, save_mode: Option<SaveMode>) -> Self {
        self.save_mode = save_mode;
        self
    }

    pub fn with_skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Create missing directories and settle the save mode
    ///
    /// A marker already present in the output directory always wins over
    /// the requested mode. Without a marker the requested mode (or
    /// `ByLabel`) is chosen and recorded.
    pub fn resolve(self) -> Result<ProcessConfig, SnipError> {
        if !self.input_dir.is_dir() {
            return Err(SnipError::DirError(format!(
                "Annotations directory {} does not exist",
                self.input_dir.display()
            )));
        }

        let output_dir = self
            .output_dir
            .unwrap_or_else(|| self.input_dir.join(DEFAULT_SNIPPET_DIR));

        let archive_dir = self
            .archive_dir
            .unwrap_or_else(|| self.input_dir.join(DEFAULT_ARCHIVE_DIR));

        for dir in [&output_dir, &archive_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|err| SnipError::DirError(format!("{}: {}", dir.display(), err)))?;
        }

        let save_mode = match (SaveMode::read_marker(&output_dir), self.save_mode) {
            (Some(existing), Some(requested)) if existing != requested => {
                progress_warn(&format!(
                    "Snippet directory is already sorted by {}, ignoring requested mode {}.",
                    existing, requested
                ));
                existing
            }
            (Some(existing), _) => existing,
            (None, requested) => {
                let mode = requested.unwrap_or_default();
                mode.write_marker(&output_dir)?;
                progress_log(&format!("Saving by {} activated.", mode), self.verbose);
                mode
            }
        };

        Ok(ProcessConfig {
            input_dir: self.input_dir,
            output_dir,
            archive_dir,
            save_mode,
            skip_invalid: self.skip_invalid,
            verbose: self.verbose,
        })
    }
}
