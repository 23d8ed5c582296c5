// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

pub mod annotation;
pub mod manifest;
pub mod writer;

pub use annotation::{AnnotationRecord, Shape};
pub use manifest::Manifest;
pub use writer::{SnippetOutcome, SnippetWriter, sanitize_label};
