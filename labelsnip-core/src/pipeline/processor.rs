// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};
use kdam::BarExt;

use crate::error::SnipError;
use crate::geo::{compute_bounding_rectangle, rasterize_polygon_mask, scale_points, truncate_points};
use crate::im::{Density, composite, read_density};
use crate::io::{AnnotationRecord, Manifest, SnippetOutcome, SnippetWriter};
use crate::pipeline::cleanup::{CleanupReport, remove_empty_folders, remove_stale_snippets};
use crate::pipeline::ProcessConfig;
use crate::ut::path::{collect_annotation_files, resolve_image_reference};
use crate::ut::track::{progress_bar, progress_log, progress_warn, thousands_format};

/// Outcome of processing a single annotation file
#[derive(Debug, Clone, Default)]
pub struct RecordReport {
    pub stem: String,
    pub image: PathBuf,
    pub density: Option<Density>,
    pub cleanup: CleanupReport,
    pub written: Vec<PathBuf>,
    pub empty: usize,
    pub labels: BTreeMap<String, usize>,
    pub archived: PathBuf,
}

/// Outcome of processing a directory of annotation files
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub skipped: Vec<String>,
    pub labels: BTreeMap<String, usize>,
    pub written: usize,
    pub empty: usize,
    pub stale_removed: usize,
    pub stale_skipped: usize,
    pub folders_removed: usize,
    pub manifest: Manifest,
}

impl BatchReport {
    fn add(&mut self, record: RecordReport) {
        self.processed.push(record.stem);
        self.written += record.written.len();
        self.empty += record.empty;
        self.stale_removed += record.cleanup.removed;
        self.stale_skipped += record.cleanup.skipped;

        for (label, count) in record.labels {
            *self.labels.entry(label).or_insert(0) += count;
        }
    }
}

/// Turns annotation files into snippets
///
/// Every record passes through the same stages in order: it is loaded,
/// snippets of earlier runs are removed, the source image is opened, all
/// shapes are cut out and written, and finally the annotation file is
/// moved into the archive.
pub struct AnnotationProcessor<'a> {
    config: &'a ProcessConfig,
    writer: SnippetWriter,
}

impl<'a> AnnotationProcessor<'a> {
    pub fn new(config: &'a ProcessConfig) -> Self {
        Self {
            config,
            writer: SnippetWriter::new(&config.output_dir, config.save_mode),
        }
    }

    /// Process and archive one annotation file
    pub fn process_record<P: AsRef<Path>>(&self, path: P) -> Result<RecordReport, SnipError> {
        let path = path.as_ref();
        let verbose = self.config.verbose;

        let record = AnnotationRecord::open(path)?;

        let cleanup = remove_stale_snippets(&self.config.output_dir, &record.stem)?;
        progress_log(
            &format!(
                "{} earlier snippets of {} removed ({} skipped).",
                cleanup.removed, record.stem, cleanup.skipped
            ),
            verbose,
        );

        let image_path = resolve_image_reference(&record.image_path, &self.config.input_dir);
        let (image, density) = open_source_image(&image_path)?;

        if density.is_none() {
            progress_log(
                &format!(
                    "Density of {} unavailable, output density set to {}.",
                    image_path.display(),
                    Density::default()
                ),
                verbose,
            );
        }

        let mut report = RecordReport {
            stem: record.stem.clone(),
            image: image_path,
            density,
            cleanup,
            ..Default::default()
        };

        self.process_shapes(&record, &image, density.unwrap_or_default(), &mut report)?;

        drop(image);

        report.archived = archive_record(path, &self.config.archive_dir)?;
        progress_log(
            &format!("Archived {}.", report.archived.display()),
            verbose,
        );

        Ok(report)
    }

    fn process_shapes(
        &self,
        record: &AnnotationRecord,
        image: &RgbaImage,
        density: Density,
        report: &mut RecordReport,
    ) -> Result<(), SnipError> {
        let ratio = record.ratio();
        let valid_ratio = ratio.is_finite() && ratio > 0.0;

        if !valid_ratio {
            progress_warn(&format!(
                "Invalid density ratio {} in {}, no snippets will be written.",
                ratio, record.stem
            ));
        }

        let mut pb = progress_bar(record.shapes.len(), &record.stem, self.config.verbose);

        for (index, shape) in record.shapes.iter().enumerate() {
            let shape_stem = format!("{}-{}", record.stem, index);
            *report.labels.entry(shape.label.clone()).or_insert(0) += 1;

            let outcome = if valid_ratio {
                let scaled = scale_points(&shape.points, ratio);
                let rect = compute_bounding_rectangle(&scaled, 1.0);
                let mask = rasterize_polygon_mask(
                    &truncate_points(&scaled, 1.0),
                    image.width(),
                    image.height(),
                );

                let snippet = composite(image, &mask, &rect)?;

                self.writer
                    .write(&snippet, &shape.label, &record.stem, &shape_stem, density)?
            } else {
                SnippetOutcome::Empty
            };

            match outcome {
                SnippetOutcome::Written(path) => report.written.push(path),
                SnippetOutcome::Empty => {
                    if valid_ratio {
                        progress_warn(&format!(
                            "Shape {} ({}) spans zero pixels and was not written.",
                            shape_stem, shape.label
                        ));
                    }
                    report.empty += 1;
                }
            }

            pb.update(1).ok();
        }

        if self.config.verbose {
            eprintln!();
        }

        Ok(())
    }
}

/// Open a source image as RGBA together with its pixel density
fn open_source_image(path: &Path) -> Result<(RgbaImage, Option<Density>), SnipError> {
    let read_error = |message: String| SnipError::ImageReadError {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| read_error(err.to_string()))?;

    // Scans of large documents easily exceed the default decoder limits
    reader.no_limits();

    let image = reader
        .decode()
        .map_err(|err| read_error(err.to_string()))?
        .to_rgba8();

    Ok((image, read_density(path)))
}

/// Move a consumed annotation file into the archive directory
fn archive_record(path: &Path, archive_dir: &Path) -> Result<PathBuf, SnipError> {
    let archive_error = |message: &str| SnipError::ArchiveError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let name = path
        .file_name()
        .ok_or_else(|| archive_error("Invalid file name"))?;

    let destination = archive_dir.join(name);

    if destination.exists() {
        return Err(archive_error(&format!(
            "{} already exists",
            destination.display()
        )));
    }

    std::fs::rename(path, &destination).map_err(|err| archive_error(&err.to_string()))?;

    Ok(destination)
}

/// Process every annotation file of the configured input directory
///
/// Afterwards empty folders are removed from the snippet directory and the
/// manifest is rebuilt. A failing record aborts the batch, except for
/// decode errors when `skip_invalid` is set.
pub fn process_batch(config: &ProcessConfig) -> Result<BatchReport, SnipError> {
    let verbose = config.verbose;
    let files = collect_annotation_files(&config.input_dir)?;

    progress_log(
        &format!(
            "Detected {} annotation files, saving by {}.",
            thousands_format(files.len()),
            config.save_mode
        ),
        verbose,
    );

    let processor = AnnotationProcessor::new(config);
    let mut batch = BatchReport::default();

    for file in files {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        progress_log(&format!("Processing {}.", name), verbose);

        match processor.process_record(&file) {
            Ok(record) => batch.add(record),
            Err(err) if err.is_decode() && config.skip_invalid => {
                progress_warn(&format!("Skipping {}. {}", name, err));
                batch.skipped.push(name);
            }
            Err(err) => return Err(err),
        }
    }

    batch.folders_removed = remove_empty_folders(&config.output_dir);
    progress_log(
        &format!("{} empty folders removed.", batch.folders_removed),
        verbose,
    );

    progress_log(
        &format!(
            "Complete. {} snippets written from {} annotation files.",
            thousands_format(batch.written),
            thousands_format(batch.processed.len())
        ),
        verbose,
    );

    for (label, count) in &batch.labels {
        progress_log(&format!("{}: {}", label, thousands_format(count)), verbose);
    }

    batch.manifest = Manifest::rebuild(&config.output_dir, config.save_mode)?;
    progress_log(
        &format!(
            "Manifest lists {} annotation files.",
            thousands_format(batch.manifest.len())
        ),
        verbose,
    );

    Ok(batch)
}
