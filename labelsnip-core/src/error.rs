// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnipError {
    #[error("[labelsnip::ConfigError] Invalid configuration. {0}")]
    ConfigError(String),

    #[error("[labelsnip::DecodeError] Annotation file {} could not be decoded. {}", .path.display(), .message)]
    DecodeError { path: PathBuf, message: String },

    #[error("[labelsnip::ImageReadError] Failed to read image {}. {}", .path.display(), .message)]
    ImageReadError { path: PathBuf, message: String },

    #[error("[labelsnip::ImageWriteError] Failed to write snippet {}. {}", .path.display(), .message)]
    ImageWriteError { path: PathBuf, message: String },

    #[error("[labelsnip::CleanupError] Failed to remove {}. {}", .path.display(), .message)]
    CleanupError { path: PathBuf, message: String },

    #[error("[labelsnip::ArchiveError] Failed to archive {}. {}", .path.display(), .message)]
    ArchiveError { path: PathBuf, message: String },

    #[error("[labelsnip::MoveError] Failed to move snippet {}. {}", .path.display(), .message)]
    MoveError { path: PathBuf, message: String },

    #[error("[labelsnip::MaskError] Failed to apply mask. {0}")]
    MaskError(String),

    #[error("[labelsnip::NoFileError] File could not be found. {0}.")]
    NoFileError(String),

    #[error("[labelsnip::DirError] Directory could not be read or created. {0}.")]
    DirError(String),
}

impl SnipError {
    /// Decode errors are the only record-level failures that may be skipped
    pub fn is_decode(&self) -> bool {
        matches!(self, SnipError::DecodeError { .. })
    }
}
