// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SnipError;
use crate::geo::{Point, ppi_ratio, scale_points};
use crate::ut::path::file_stem_string;

/// One labelled polygon of an annotation file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub label: String,

    pub points: Vec<Point>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A decoded annotation file
///
/// Only the fields needed for snippet extraction are typed. All other
/// fields of the file (e.g. `imageData`, `flags`, `shape_type`) are kept
/// in `extra` so a rewritten file loses nothing.
///
/// # Examples
///
/// ```
/// use labelsnip_core::io::AnnotationRecord;
///
/// let record = AnnotationRecord::from_json_str(
///     "page1",
///     r#"{"imagePath": "./page1.png", "shapes": [
///         {"label": "Text", "points": [[10, 10], [50, 10], [50, 40]]}
///     ]}"#,
/// )
/// .unwrap();
///
/// assert_eq!(record.stem, "page1");
/// assert_eq!(record.shapes[0].points[1], [50., 10.]);
/// assert_eq!(record.ratio(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(skip)]
    pub stem: String,

    #[serde(rename = "imagePath")]
    pub image_path: String,

    pub shapes: Vec<Shape>,

    #[serde(rename = "srcPPI", default, skip_serializing_if = "Option::is_none")]
    pub src_ppi: Option<f64>,

    #[serde(rename = "targetPPI", default, skip_serializing_if = "Option::is_none")]
    pub target_ppi: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationRecord {
    /// Open and validate an annotation file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<AnnotationRecord, SnipError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|err| SnipError::DecodeError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

        let mut record: AnnotationRecord = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| SnipError::DecodeError {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        record.stem = file_stem_string(path)?;
        record.validate().map_err(|message| SnipError::DecodeError {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(record)
    }

    /// Decode and validate an annotation from a json string
    pub fn from_json_str(stem: &str, contents: &str) -> Result<AnnotationRecord, SnipError> {
        let decode_error = |message: String| SnipError::DecodeError {
            path: stem.into(),
            message,
        };

        let mut record: AnnotationRecord =
            serde_json::from_str(contents).map_err(|err| decode_error(err.to_string()))?;

        record.stem = stem.to_string();
        record.validate().map_err(decode_error)?;

        Ok(record)
    }

    /// Write the annotation as json
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnipError> {
        let path = path.as_ref();
        let write_error =
            |message: String| SnipError::DirError(format!("{}: {}", path.display(), message));

        let file = File::create(path).map_err(|err| write_error(err.to_string()))?;

        serde_json::to_writer(BufWriter::new(file), self)
            .map_err(|err| write_error(err.to_string()))
    }

    /// Ratio between target and source density of this record
    pub fn ratio(&self) -> f64 {
        ppi_ratio(self.src_ppi, self.target_ppi)
    }

    /// Multiply all shape coordinates by a ratio, keeping fractions
    pub fn rescale(&mut self, ratio: f64) {
        for shape in self.shapes.iter_mut() {
            shape.points = scale_points(&shape.points, ratio);
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.image_path.trim().is_empty() {
            return Err("Field imagePath is empty".to_string());
        }

        if let Some(ppi) = [self.src_ppi, self.target_ppi]
            .into_iter()
            .flatten()
            .find(|v| !v.is_finite())
        {
            return Err(format!("Invalid pixel density {}", ppi));
        }

        Ok(())
    }
}
