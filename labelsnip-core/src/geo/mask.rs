// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::geo::PixelPoint;

/// A single-channel, row-major binary mask
///
/// Values are 1 inside a polygon (including its outline) and 0 elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    w: u32,
    h: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Initialize an empty mask
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            w: width,
            h: height,
            data: vec![0; width as usize * height as usize],
        }
    }

    /// Width of the mask
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the mask
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Mask value at (x, y), or 0 when out of bounds
    pub fn get(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return 0;
        }

        self.data[y as usize * self.w as usize + x as usize]
    }

    /// Number of pixels set to 1
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Return a reference to the raw row-major values
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    fn set(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && x < self.w as i64 && y < self.h as i64 {
            let index = y as usize * self.w as usize + x as usize;
            self.data[index] = 1;
        }
    }
}

/// Fill a closed polygon and its outline onto a canvas of the given size
///
/// Vertices are implicitly connected last-to-first. Parts of the polygon
/// outside of the canvas are clipped.
///
/// # Arguments
///
/// * `points` - Integer polygon vertices in (x, y) format
/// * `width` - Canvas width
/// * `height` - Canvas height
///
/// # References
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
///
/// # Examples
///
/// ```
/// use labelsnip_core::geo::rasterize_polygon_mask;
///
/// let mask = rasterize_polygon_mask(&[[1, 1], [0, 1], [1, 0], [0, 0]], 3, 3);
///
/// assert_eq!(mask.as_raw(), &[1, 1, 0, 1, 1, 0, 0, 0, 0]);
/// ```
pub fn rasterize_polygon_mask(points: &[PixelPoint], width: u32, height: u32) -> Mask {
    let mut mask = Mask::new(width, height);

    if points.is_empty() || width == 0 || height == 0 {
        return mask;
    }

    let mut y_min = i64::MAX;
    let mut y_max = i64::MIN;
    for p in points {
        y_min = y_min.min(p[1]);
        y_max = y_max.max(p[1]);
    }

    y_min = y_min.clamp(0, height as i64 - 1);
    y_max = y_max.clamp(0, height as i64 - 1);

    let mut closed: Vec<PixelPoint> = points.to_vec();
    closed.push(points[0]);

    let edges: Vec<&[PixelPoint]> = closed.windows(2).collect();
    let mut intersections: Vec<i64> = Vec::new();

    // Scanline fill
    for y in y_min..=y_max {
        for edge in &edges {
            let [x0, y0] = edge[0];
            let [x1, y1] = edge[1];

            if (y0 <= y && y1 >= y) || (y1 <= y && y0 >= y) {
                if y0 == y1 {
                    intersections.push(x0);
                    intersections.push(x1);
                } else if y0 == y || y1 == y {
                    if y1 > y {
                        intersections.push(x0);
                    }
                    if y0 > y {
                        intersections.push(x1);
                    }
                } else {
                    let fraction = (y - y0) as f64 / (y1 - y0) as f64;
                    let inter = x0 as f64 + fraction * (x1 - x0) as f64;
                    intersections.push(inter.round() as i64);
                }
            }
        }

        intersections.sort_unstable();
        intersections.chunks_exact(2).for_each(|range| {
            let from = range[0].max(0);
            let to = range[1].min(width as i64 - 1);

            for x in from..=to {
                mask.set(x, y);
            }
        });

        intersections.clear();
    }

    for edge in &edges {
        draw_line(&mut mask, edge[0], edge[1]);
    }

    mask
}

// Bresenham line, clipped to the canvas
fn draw_line(mask: &mut Mask, start: PixelPoint, end: PixelPoint) {
    let [x0, y0] = start;
    let [x1, y1] = end;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        mask.set(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_mask_rectangle_inclusive() {
        let mask = rasterize_polygon_mask(&[[1, 1], [4, 1], [4, 3], [1, 3]], 6, 5);

        for y in 0..5 {
            for x in 0..6 {
                let inside = (1..=4).contains(&x) && (1..=3).contains(&y);
                assert_eq!(mask.get(x, y), inside as u8, "({}, {})", x, y);
            }
        }

        assert_eq!(mask.count(), 12);
    }

    #[test]
    fn test_mask_triangle() {
        let mask = rasterize_polygon_mask(&[[0, 0], [4, 0], [0, 4]], 5, 5);

        assert_eq!(mask.get(0, 0), 1);
        assert_eq!(mask.get(4, 0), 1);
        assert_eq!(mask.get(0, 4), 1);
        assert_eq!(mask.get(1, 1), 1);
        assert_eq!(mask.get(4, 4), 0);
        assert_eq!(mask.get(3, 3), 0);
    }

    #[test]
    fn test_mask_clipped_to_canvas() {
        let mask = rasterize_polygon_mask(&[[-5, -5], [20, -5], [20, 20], [-5, 20]], 4, 3);
        assert_eq!(mask.count(), 12);
    }

    #[test]
    fn test_mask_outside_canvas() {
        let mask = rasterize_polygon_mask(&[[10, 10], [12, 10], [12, 12]], 4, 4);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_mask_degenerate_line() {
        let mask = rasterize_polygon_mask(&[[0, 2], [3, 2], [1, 2]], 4, 4);

        for x in 0..4 {
            assert_eq!(mask.get(x, 2), 1);
        }

        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn test_mask_empty_inputs() {
        assert_eq!(rasterize_polygon_mask(&[], 3, 3).count(), 0);
        assert_eq!(rasterize_polygon_mask(&[[0, 0], [1, 1], [0, 1]], 0, 0).count(), 0);
    }
}
