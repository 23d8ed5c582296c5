// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use image::{Rgb, RgbImage, RgbaImage};

use crate::constant::BACKGROUND_RGB;
use crate::error::SnipError;
use crate::geo::{BoundingRectangle, Mask};

/// Crop a polygon region and flatten it onto an opaque white background
///
/// The alpha of every pixel is taken from the mask (mask * 255), the source
/// alpha channel is ignored. Pixels of the rectangle that fall outside of the
/// source image are treated as fully transparent.
///
/// # Arguments
///
/// * `source` - Source image in RGBA format
/// * `mask` - Polygon mask with the same dimensions as the source
/// * `rect` - Region to crop
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use labelsnip_core::geo::{compute_bounding_rectangle, rasterize_polygon_mask};
/// use labelsnip_core::im::composite;
///
/// let source = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
/// let mask = rasterize_polygon_mask(&[[2, 2], [5, 2], [5, 5], [2, 5]], 8, 8);
/// let rect = compute_bounding_rectangle(&[[2., 2.], [5., 2.], [5., 5.], [2., 5.]], 1.0);
///
/// let snippet = composite(&source, &mask, &rect).unwrap();
/// assert_eq!(snippet.dimensions(), (3, 3));
/// ```
pub fn composite(
    source: &RgbaImage,
    mask: &Mask,
    rect: &BoundingRectangle,
) -> Result<RgbImage, SnipError> {
    if source.width() != mask.width() || source.height() != mask.height() {
        return Err(SnipError::MaskError(format!(
            "Mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            source.width(),
            source.height()
        )));
    }

    let (width, height) = (source.width() as i64, source.height() as i64);

    Ok(RgbImage::from_fn(rect.w, rect.h, |col, row| {
        let x = rect.x + col as i64;
        let y = rect.y + row as i64;

        if x < 0 || y < 0 || x >= width || y >= height {
            return Rgb(BACKGROUND_RGB);
        }

        let pixel = source.get_pixel(x as u32, y as u32);
        let alpha = (mask.get(x, y) as f32 * 255.0) / 255.0;

        Rgb([
            flatten(BACKGROUND_RGB[0], pixel[0], alpha),
            flatten(BACKGROUND_RGB[1], pixel[1], alpha),
            flatten(BACKGROUND_RGB[2], pixel[2], alpha),
        ])
    }))
}

fn flatten(background: u8, value: u8, alpha: f32) -> u8 {
    (background as f32 * (1.0 - alpha) + value as f32 * alpha) as u8
}
