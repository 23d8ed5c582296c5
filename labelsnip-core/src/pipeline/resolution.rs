// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::constant::{ANNOTATION_EXTENSION, PPI_SUFFIX};
use crate::error::SnipError;
use crate::io::AnnotationRecord;

/// File name of a rescaled annotation
///
/// # Examples
///
/// ```
/// use labelsnip_core::pipeline::rescaled_file_name;
///
/// assert_eq!(rescaled_file_name("page1", 300.0), "page1_300ppi.json");
/// assert_eq!(rescaled_file_name("page1", 72.5), "page1_72.5ppi.json");
/// ```
pub fn rescaled_file_name(stem: &str, target_ppi: f64) -> String {
    format!("{}_{}{}.{}", stem, target_ppi, PPI_SUFFIX, ANNOTATION_EXTENSION)
}

/// Write a copy of an annotation file with coordinates for another resolution
///
/// Every point is multiplied by `target_ppi / src_ppi` and stored without
/// rounding. Images and snippets are left untouched.
///
/// # Arguments
///
/// * `path` - Annotation file
/// * `src_ppi` - Resolution the annotation was created at
/// * `target_ppi` - Resolution of the image the annotation should match
/// * `output_dir` - Output directory, defaults to the directory of `path`
pub fn rescale_annotation<P: AsRef<Path>>(
    path: P,
    src_ppi: f64,
    target_ppi: f64,
    output_dir: Option<&Path>,
) -> Result<PathBuf, SnipError> {
    for (name, ppi) in [("Source", src_ppi), ("Target", target_ppi)] {
        if !ppi.is_finite() || ppi <= 0.0 {
            return Err(SnipError::ConfigError(format!(
                "{} resolution must be a positive number (got {})",
                name, ppi
            )));
        }
    }

    let path = path.as_ref();
    let mut record = AnnotationRecord::open(path)?;

    record.rescale(target_ppi / src_ppi);

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let output = output_dir.join(rescaled_file_name(&record.stem, target_ppi));
    record.save(&output)?;

    Ok(output)
}
