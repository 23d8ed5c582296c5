// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

pub mod mask;
pub mod rect;
pub mod scale;

pub use mask::{Mask, rasterize_polygon_mask};
pub use rect::{BoundingRectangle, compute_bounding_rectangle, truncate_points};
pub use scale::{ppi_ratio, scale_points};

/// A floating point (x, y) vertex as stored in annotation files
pub type Point = [f64; 2];

/// An integer (x, y) vertex in pixel space
pub type PixelPoint = [i64; 2];
