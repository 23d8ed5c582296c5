// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Marker files recording the folder layout of a snippet directory
pub const MARKER_BY_LABEL: &str = ".labels";
pub const MARKER_BY_ANNOTATION: &str = ".papyri";

// Default folder names relative to the annotations directory
pub const DEFAULT_SNIPPET_DIR: &str = "Snippets";
pub const DEFAULT_ARCHIVE_DIR: &str = "Archive";

// Annotation files are recognised by this extension
pub const ANNOTATION_EXTENSION: &str = "json";

// Snippets are always written as jpeg
pub const SNIPPET_EXTENSION: &str = "jpg";

// Separator between annotation stem and shape index in snippet names
pub const SHAPE_INDEX_SEPARATOR: char = '-';

// Output density when the source image carries none
pub const DEFAULT_DENSITY: (u16, u16) = (96, 96);

// Characters in labels that collide with reserved path characters
pub const LABEL_RESERVED_CHARS: [char; 3] = [':', '&', '*'];
pub const LABEL_REPLACEMENT: char = '-';

// Background used when flattening transparent pixels
pub const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

// Manifest of contributing annotation files
pub const MANIFEST_FILE: &str = "content.txt";
pub const MANIFEST_HEADER: &str = "Snippets have been generated from following annotation files:";

// Suffix used by the resolution rewrite, e.g. page1_300ppi.json
pub const PPI_SUFFIX: &str = "ppi";
