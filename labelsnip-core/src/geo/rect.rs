// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::geo::{PixelPoint, Point};

/// An axis-aligned rectangle in pixel space
///
/// The top-left corner may lie outside of an image (e.g. for negative
/// coordinates), the spans are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingRectangle {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl BoundingRectangle {
    /// Number of pixels covered by the rectangle
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Check if the rectangle spans zero pixels
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Scale and truncate points to integer pixel coordinates
///
/// Fractional parts are discarded toward zero, which is what the
/// rectangle and the rasterized mask of a shape are both built on.
///
/// # Examples
///
/// ```
/// use labelsnip_core::geo::truncate_points;
///
/// let pixels = truncate_points(&[[1.9, 2.5], [-0.5, 3.0]], 1.0);
/// assert_eq!(pixels, vec![[1, 2], [0, 3]]);
/// ```
pub fn truncate_points(points: &[Point], ratio: f64) -> Vec<PixelPoint> {
    points
        .iter()
        .map(|&[x, y]| [(x * ratio) as i64, (y * ratio) as i64])
        .collect()
}

/// Compute the minimal bounding rectangle of scaled points
///
/// # Arguments
///
/// * `points` - Polygon vertices in (x, y) format
/// * `ratio` - Scaling factor applied before truncation
///
/// # Examples
///
/// ```
/// use labelsnip_core::geo::compute_bounding_rectangle;
///
/// let points = [[10., 10.], [50., 10.], [50., 40.], [10., 40.]];
/// let rect = compute_bounding_rectangle(&points, 1.0);
///
/// assert_eq!((rect.x, rect.y, rect.w, rect.h), (10, 10, 40, 30));
/// ```
pub fn compute_bounding_rectangle(points: &[Point], ratio: f64) -> BoundingRectangle {
    let pixels = truncate_points(points, ratio);

    let Some(&[fx, fy]) = pixels.first() else {
        return BoundingRectangle::default();
    };

    let mut min_x = fx;
    let mut min_y = fy;
    let mut max_x = fx;
    let mut max_y = fy;

    for &[x, y] in &pixels {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    BoundingRectangle {
        x: min_x,
        y: min_y,
        w: span(min_x, max_x),
        h: span(min_y, max_y),
    }
}

fn span(min: i64, max: i64) -> u32 {
    u32::try_from(max.saturating_sub(min)).unwrap_or(u32::MAX)
}
