// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::constant::{MARKER_BY_ANNOTATION, MARKER_BY_LABEL};
use crate::error::SnipError;

/// Folder layout of a snippet directory
///
/// * `ByLabel` - `root/label/snippet.jpg`
/// * `ByAnnotation` - `root/annotation/label/snippet.jpg`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    #[default]
    ByLabel,
    ByAnnotation,
}

impl SaveMode {
    /// Name of the marker file recording this mode
    pub fn marker(&self) -> &'static str {
        match self {
            SaveMode::ByLabel => MARKER_BY_LABEL,
            SaveMode::ByAnnotation => MARKER_BY_ANNOTATION,
        }
    }

    /// The other layout
    pub fn toggled(&self) -> SaveMode {
        match self {
            SaveMode::ByLabel => SaveMode::ByAnnotation,
            SaveMode::ByAnnotation => SaveMode::ByLabel,
        }
    }

    /// Read the mode recorded in a snippet directory, if any
    pub fn read_marker<P: AsRef<Path>>(root: P) -> Option<SaveMode> {
        let root = root.as_ref();

        if root.join(MARKER_BY_ANNOTATION).is_file() {
            Some(SaveMode::ByAnnotation)
        } else if root.join(MARKER_BY_LABEL).is_file() {
            Some(SaveMode::ByLabel)
        } else {
            None
        }
    }

    /// Record this mode in a snippet directory, replacing the other marker
    pub fn write_marker<P: AsRef<Path>>(&self, root: P) -> Result<(), SnipError> {
        let root = root.as_ref();
        let other = root.join(self.toggled().marker());

        if other.exists() {
            std::fs::remove_file(&other)
                .map_err(|err| SnipError::DirError(format!("{}: {}", other.display(), err)))?;
        }

        let marker = root.join(self.marker());
        std::fs::write(&marker, "")
            .map_err(|err| SnipError::DirError(format!("{}: {}", marker.display(), err)))
    }
}

impl FromStr for SaveMode {
    type Err = SnipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "label" | "labels" => Ok(SaveMode::ByLabel),
            "2" | "annotation" | "annotations" | "papyri" => Ok(SaveMode::ByAnnotation),
            other => Err(SnipError::ConfigError(format!(
                "Save mode must be one of: labels, annotations (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SaveMode::ByLabel => write!(f, "labels"),
            SaveMode::ByAnnotation => write!(f, "annotations"),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("labels".parse::<SaveMode>().unwrap(), SaveMode::ByLabel);
        assert_eq!("1".parse::<SaveMode>().unwrap(), SaveMode::ByLabel);
        assert_eq!(
            "Annotations".parse::<SaveMode>().unwrap(),
            SaveMode::ByAnnotation
        );
        assert_eq!("2".parse::<SaveMode>().unwrap(), SaveMode::ByAnnotation);
        assert!(matches!(
            "3".parse::<SaveMode>(),
            Err(SnipError::ConfigError(_))
        ));
    }

    #[test]
    fn test_marker_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(SaveMode::read_marker(dir.path()), None);

        SaveMode::ByLabel.write_marker(dir.path()).unwrap();
        assert_eq!(SaveMode::read_marker(dir.path()), Some(SaveMode::ByLabel));

        SaveMode::ByAnnotation.write_marker(dir.path()).unwrap();
        assert_eq!(
            SaveMode::read_marker(dir.path()),
            Some(SaveMode::ByAnnotation)
        );
        assert!(!dir.path().join(MARKER_BY_LABEL).exists());
    }

    #[test]
    fn test_annotation_marker_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MARKER_BY_LABEL), "").unwrap();
        std::fs::write(dir.path().join(MARKER_BY_ANNOTATION), "").unwrap();

        assert_eq!(
            SaveMode::read_marker(dir.path()),
            Some(SaveMode::ByAnnotation)
        );
    }
}
