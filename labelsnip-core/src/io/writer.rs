// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::RgbImage;
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};

use crate::constant::{LABEL_REPLACEMENT, LABEL_RESERVED_CHARS, SNIPPET_EXTENSION};
use crate::error::SnipError;
use crate::im::Density;
use crate::pipeline::SaveMode;

/// Result of writing a single snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetOutcome {
    /// The snippet was written to the given path
    Written(PathBuf),
    /// The snippet spans zero pixels and nothing was written
    Empty,
}

/// Replace characters that collide with reserved path characters
///
/// # Examples
///
/// ```
/// use labelsnip_core::io::sanitize_label;
/// assert_eq!(sanitize_label("A:B*C"), "A-B-C");
/// assert_eq!(sanitize_label("R&D"), "R-D");
/// ```
pub fn sanitize_label(label: &str) -> String {
    label.replace(LABEL_RESERVED_CHARS, &LABEL_REPLACEMENT.to_string())
}

/// Persists snippets into a snippet directory following a save mode
#[derive(Debug, Clone)]
pub struct SnippetWriter {
    root: PathBuf,
    mode: SaveMode,
}

impl SnippetWriter {
    pub fn new<P: AsRef<Path>>(root: P, mode: SaveMode) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            mode,
        }
    }

    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    /// Folder a snippet of the given label and annotation belongs to
    pub fn snippet_dir(&self, label: &str, annotation_stem: &str) -> PathBuf {
        let label = sanitize_label(label);

        match self.mode {
            SaveMode::ByLabel => self.root.join(label),
            SaveMode::ByAnnotation => self.root.join(annotation_stem).join(label),
        }
    }

    /// Full path of a snippet file
    pub fn snippet_path(&self, label: &str, annotation_stem: &str, shape_stem: &str) -> PathBuf {
        self.snippet_dir(label, annotation_stem)
            .join(format!("{}.{}", shape_stem, SNIPPET_EXTENSION))
    }

    /// Write a snippet as jpeg with embedded density, creating folders as needed
    ///
    /// # Arguments
    ///
    /// * `image` - Flattened RGB snippet
    /// * `label` - Unsanitized shape label
    /// * `annotation_stem` - Stem of the annotation file the shape belongs to
    /// * `shape_stem` - Snippet file name without extension (e.g. page1-0)
    /// * `density` - Pixel density written into the jpeg header
    pub fn write(
        &self,
        image: &RgbImage,
        label: &str,
        annotation_stem: &str,
        shape_stem: &str,
        density: Density,
    ) -> Result<SnippetOutcome, SnipError> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(SnippetOutcome::Empty);
        }

        let folder = self.snippet_dir(label, annotation_stem);

        std::fs::create_dir_all(&folder)
            .map_err(|err| SnipError::DirError(format!("{}: {}", folder.display(), err)))?;

        let path = folder.join(format!("{}.{}", shape_stem, SNIPPET_EXTENSION));

        let write_error = |message: String| SnipError::ImageWriteError {
            path: path.clone(),
            message,
        };

        let file = File::create(&path).map_err(|err| write_error(err.to_string()))?;
        let mut writer = BufWriter::new(file);

        {
            let mut encoder = JpegEncoder::new(&mut writer);
            encoder.set_pixel_density(PixelDensity {
                density: (density.x, density.y),
                unit: PixelDensityUnit::Inches,
            });

            encoder
                .encode_image(image)
                .map_err(|err| write_error(err.to_string()))?;
        }

        writer.flush().map_err(|err| write_error(err.to_string()))?;

        Ok(SnippetOutcome::Written(path))
    }
}

#[cfg(test)]
mod test {

    use image::Rgb;

    use super::*;
    use crate::im::read_density;

    #[test]
    fn test_snippet_path_by_label() {
        let writer = SnippetWriter::new("Snippets", SaveMode::ByLabel);
        assert_eq!(
            writer.snippet_path("A:B*C", "page1", "page1-0"),
            Path::new("Snippets/A-B-C/page1-0.jpg")
        );
    }

    #[test]
    fn test_snippet_path_by_annotation() {
        let writer = SnippetWriter::new("Snippets", SaveMode::ByAnnotation);
        assert_eq!(
            writer.snippet_path("Text", "page1", "page1-3"),
            Path::new("Snippets/page1/Text/page1-3.jpg")
        );
    }

    #[test]
    fn test_write_with_density() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnippetWriter::new(dir.path(), SaveMode::ByAnnotation);
        let image = RgbImage::from_pixel(7, 5, Rgb([255, 255, 255]));

        let outcome = writer
            .write(&image, "R&D", "page1", "page1-0", Density { x: 300, y: 300 })
            .unwrap();

        let path = dir.path().join("page1").join("R-D").join("page1-0.jpg");
        assert_eq!(outcome, SnippetOutcome::Written(path.clone()));

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (7, 5));
        assert_eq!(read_density(&path), Some(Density { x: 300, y: 300 }));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnippetWriter::new(dir.path(), SaveMode::ByLabel);

        let small = RgbImage::new(2, 2);
        let large = RgbImage::new(4, 3);

        writer
            .write(&small, "Text", "page1", "page1-0", Density::default())
            .unwrap();
        writer
            .write(&large, "Text", "page1", "page1-0", Density::default())
            .unwrap();

        let saved = image::open(dir.path().join("Text/page1-0.jpg")).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 3));
    }

    #[test]
    fn test_write_empty_snippet() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnippetWriter::new(dir.path(), SaveMode::ByLabel);

        let outcome = writer
            .write(&RgbImage::new(0, 4), "Text", "page1", "page1-0", Density::default())
            .unwrap();

        assert_eq!(outcome, SnippetOutcome::Empty);
        assert!(!dir.path().join("Text").exists());
    }
}
