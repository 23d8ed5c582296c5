// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

pub mod cleanup;
pub mod config;
pub mod mode;
pub mod processor;
pub mod resolution;
pub mod restructure;

pub use cleanup::{CleanupReport, remove_empty_folders, remove_stale_snippets};
pub use config::{ProcessConfig, ProcessOptions};
pub use mode::SaveMode;
pub use processor::{AnnotationProcessor, BatchReport, RecordReport, process_batch};
pub use resolution::{rescale_annotation, rescaled_file_name};
pub use restructure::{RestructureReport, counterpart_path, restructure};
