// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use crate::geo::Point;

/// Ratio between target and source pixel density
///
/// Missing values default to 1, so a record without density
/// information is never rescaled.
///
/// # Examples
///
/// ```
/// use labelsnip_core::geo::ppi_ratio;
///
/// assert_eq!(ppi_ratio(None, None), 1.0);
/// assert_eq!(ppi_ratio(Some(600.0), Some(300.0)), 0.5);
/// ```
pub fn ppi_ratio(src_ppi: Option<f64>, target_ppi: Option<f64>) -> f64 {
    target_ppi.unwrap_or(1.0) / src_ppi.unwrap_or(1.0)
}

/// Multiply every coordinate by a ratio without any rounding
pub fn scale_points(points: &[Point], ratio: f64) -> Vec<Point> {
    points.iter().map(|&[x, y]| [x * ratio, y * ratio]).collect()
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_scale_keeps_fractions() {
        let scaled = scale_points(&[[1., 3.], [10., 7.]], 1.5);
        assert_eq!(scaled, vec![[1.5, 4.5], [15., 10.5]]);
    }

    #[test]
    fn test_scale_round_trip() {
        let points = [[12.25, 99.5], [0.1, 0.2], [4031.7, 2999.9]];
        let (t1, t2) = (72.0, 300.0);

        let there = scale_points(&points, t2 / t1);
        let back = scale_points(&there, t1 / t2);

        for (a, b) in points.iter().zip(back.iter()) {
            assert!((a[0] - b[0]).abs() < 1e-9);
            assert!((a[1] - b[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ppi_ratio_partial() {
        assert_eq!(ppi_ratio(Some(2.0), None), 0.5);
        assert_eq!(ppi_ratio(None, Some(3.0)), 3.0);
    }

    #[test]
    fn test_ppi_ratio_zero_source() {
        assert!(!ppi_ratio(Some(0.0), Some(300.0)).is_finite());
    }
}
