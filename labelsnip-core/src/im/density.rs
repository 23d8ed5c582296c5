// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tiff::decoder::ifd::Value;
use tiff::tags::Tag;

use crate::constant::DEFAULT_DENSITY;

const INCH_PER_METER: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;

/// Horizontal and vertical pixel density in dots per inch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Density {
    pub x: u16,
    pub y: u16,
}

impl Default for Density {
    fn default() -> Self {
        Self {
            x: DEFAULT_DENSITY.0,
            y: DEFAULT_DENSITY.1,
        }
    }
}

impl std::fmt::Display for Density {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Read the pixel density stored in an image header
///
/// Supports the JFIF header (falling back to EXIF) of jpeg files, the pHYs
/// chunk of png files, the resolution tags of tiff files, the info header of
/// bmp files and the EXIF chunk of webp files. Returns `None` when the file
/// carries no usable density information.
pub fn read_density<P: AsRef<Path>>(path: P) -> Option<Density> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => {
            read_jfif_density(path).or_else(|| read_exif_density(path))
        }
        Some("png") => read_png_density(path),
        Some("tif") | Some("tiff") => read_tiff_density(path),
        Some("bmp") => read_bmp_density(path),
        Some("webp") => read_exif_density(path),
        _ => None,
    }
}

fn read_png_density(path: &Path) -> Option<Density> {
    let file = File::open(path).ok()?;
    let reader = png::Decoder::new(BufReader::new(file)).read_info().ok()?;
    let dims = reader.info().pixel_dims?;

    match dims.unit {
        png::Unit::Meter => density_from_f64(
            dims.xppu as f64 * INCH_PER_METER,
            dims.yppu as f64 * INCH_PER_METER,
        ),
        png::Unit::Unspecified => None,
    }
}

fn read_tiff_density(path: &Path) -> Option<Density> {
    let file = File::open(path).ok()?;
    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file)).ok()?;

    // Inch is the default resolution unit of a tiff file
    let unit = decoder
        .find_tag(Tag::ResolutionUnit)
        .ok()
        .flatten()
        .and_then(|value| value.into_u32().ok())
        .unwrap_or(2);

    let x = tiff_rational(decoder.find_tag(Tag::XResolution).ok()??)?;
    let y = tiff_rational(decoder.find_tag(Tag::YResolution).ok()??)?;

    resolution_density(unit, x, y)
}

fn tiff_rational(value: Value) -> Option<f64> {
    match value {
        Value::Rational(n, d) if d != 0 => Some(n as f64 / d as f64),
        Value::Unsigned(n) => Some(n as f64),
        Value::Short(n) => Some(n as f64),
        _ => None,
    }
}

fn read_exif_density(path: &Path) -> Option<Density> {
    let file = File::open(path).ok()?;
    let exif = exif::Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;

    let rational = |tag: exif::Tag| -> Option<f64> {
        match exif.get_field(tag, exif::In::PRIMARY)?.value {
            exif::Value::Rational(ref values) => values.first().map(|r| r.to_f64()),
            _ => None,
        }
    };

    let unit = exif
        .get_field(exif::Tag::ResolutionUnit, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(2);

    resolution_density(
        unit,
        rational(exif::Tag::XResolution)?,
        rational(exif::Tag::YResolution)?,
    )
}

// Tiff and EXIF resolution units: 1 none, 2 inch, 3 centimeter
fn resolution_density(unit: u32, x: f64, y: f64) -> Option<Density> {
    match unit {
        2 => density_from_f64(x, y),
        3 => density_from_f64(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => None,
    }
}

fn read_bmp_density(path: &Path) -> Option<Density> {
    let mut header = [0u8; 46];
    File::open(path).ok()?.read_exact(&mut header).ok()?;
    parse_bmp_density(&header)
}

// File header, info header size, then pixels per meter at offsets 38 and 42
fn parse_bmp_density(header: &[u8]) -> Option<Density> {
    if header.len() < 46 || &header[0..2] != b"BM" {
        return None;
    }

    let info_size = u32::from_le_bytes([header[14], header[15], header[16], header[17]]);
    if info_size < 40 {
        return None;
    }

    let x = i32::from_le_bytes([header[38], header[39], header[40], header[41]]) as f64;
    let y = i32::from_le_bytes([header[42], header[43], header[44], header[45]]) as f64;

    density_from_f64(x * INCH_PER_METER, y * INCH_PER_METER)
}

fn read_jfif_density(path: &Path) -> Option<Density> {
    let mut header = [0u8; 18];
    File::open(path).ok()?.read_exact(&mut header).ok()?;
    parse_jfif_density(&header)
}

// SOI, APP0 marker, length, "JFIF\0", version, units, x density, y density
fn parse_jfif_density(header: &[u8]) -> Option<Density> {
    if header.len() < 18 || header[0..4] != [0xFF, 0xD8, 0xFF, 0xE0] || &header[6..11] != b"JFIF\0"
    {
        return None;
    }

    let units = header[13];
    let x = u16::from_be_bytes([header[14], header[15]]) as f64;
    let y = u16::from_be_bytes([header[16], header[17]]) as f64;

    match units {
        1 => density_from_f64(x, y),
        2 => density_from_f64(x * CM_PER_INCH, y * CM_PER_INCH),
        _ => None,
    }
}

fn density_from_f64(x: f64, y: f64) -> Option<Density> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let x = x.round();
    let y = y.round();

    if x < 1.0 || y < 1.0 || x > u16::MAX as f64 || y > u16::MAX as f64 {
        return None;
    }

    Some(Density {
        x: x as u16,
        y: y as u16,
    })
}

#[cfg(test)]
mod test {

    use super::*;

    fn jfif(units: u8, x: u16, y: u16) -> Vec<u8> {
        let mut header = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        header.extend_from_slice(b"JFIF\0");
        header.extend_from_slice(&[1, 1, units]);
        header.extend_from_slice(&x.to_be_bytes());
        header.extend_from_slice(&y.to_be_bytes());
        header
    }

    #[test]
    fn test_jfif_inches() {
        assert_eq!(
            parse_jfif_density(&jfif(1, 300, 150)),
            Some(Density { x: 300, y: 150 })
        );
    }

    #[test]
    fn test_jfif_centimeters() {
        assert_eq!(
            parse_jfif_density(&jfif(2, 118, 118)),
            Some(Density { x: 300, y: 300 })
        );
    }

    #[test]
    fn test_jfif_aspect_only() {
        assert_eq!(parse_jfif_density(&jfif(0, 1, 1)), None);
    }

    #[test]
    fn test_not_jfif() {
        assert_eq!(parse_jfif_density(&[0u8; 18]), None);
        assert_eq!(parse_jfif_density(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(read_density("does_not_exist.bmp"), None);
        assert_eq!(read_density("does_not_exist.png"), None);
    }

    // Little endian tiff structure with XResolution, YResolution, ResolutionUnit
    fn exif_tiff(x: u32, y: u32, unit: u16) -> Vec<u8> {
        let mut data = b"II".to_vec();
        data.extend_from_slice(&42u16.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());

        for (tag, offset) in [(0x011Au16, 50u32), (0x011B, 58)] {
            data.extend_from_slice(&tag.to_le_bytes());
            data.extend_from_slice(&5u16.to_le_bytes());
            data.extend_from_slice(&1u32.to_le_bytes());
            data.extend_from_slice(&offset.to_le_bytes());
        }

        data.extend_from_slice(&0x0128u16.to_le_bytes());
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&unit.to_le_bytes());
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&0u32.to_le_bytes());

        for value in [x, y] {
            data.extend_from_slice(&value.to_le_bytes());
            data.extend_from_slice(&1u32.to_le_bytes());
        }

        data
    }

    fn exif_jpeg(prefix: &[u8], x: u32, y: u32, unit: u16) -> Vec<u8> {
        let tiff = exif_tiff(x, y, unit);
        let mut data = prefix.to_vec();
        data.extend_from_slice(&[0xFF, 0xE1]);
        data.extend_from_slice(&((tiff.len() + 8) as u16).to_be_bytes());
        data.extend_from_slice(b"Exif\0\0");
        data.extend_from_slice(&tiff);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    fn png_with_density(path: &Path, unit: png::Unit, ppu: u32) {
        let file = File::create(path).unwrap();
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), 2, 2);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppu,
            yppu: ppu,
            unit,
        }));
        encoder
            .write_header()
            .unwrap()
            .write_image_data(&[255u8; 12])
            .unwrap();
    }

    fn tiff_with_density(path: &Path, unit: tiff::tags::ResolutionUnit, n: u32, d: u32) {
        use tiff::encoder::{Rational, TiffEncoder, colortype};

        let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
        let mut image = encoder.new_image::<colortype::RGB8>(4, 4).unwrap();
        image.resolution(unit, Rational { n, d });
        image.write_data(&[255u8; 48]).unwrap();
    }

    #[test]
    fn test_png_density() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("page.png");
        png_with_density(&path, png::Unit::Meter, 11811);
        assert_eq!(read_density(&path), Some(Density { x: 300, y: 300 }));

        let path = dir.path().join("aspect.png");
        png_with_density(&path, png::Unit::Unspecified, 1);
        assert_eq!(read_density(&path), None);
    }

    #[test]
    fn test_png_without_density() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");

        image::RgbImage::new(2, 2).save(&path).unwrap();
        assert_eq!(read_density(&path), None);
    }

    #[test]
    fn test_tiff_density() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("page.tif");
        tiff_with_density(&path, tiff::tags::ResolutionUnit::Inch, 600, 1);
        assert_eq!(read_density(&path), Some(Density { x: 600, y: 600 }));

        let path = dir.path().join("page.TIFF");
        tiff_with_density(&path, tiff::tags::ResolutionUnit::Centimeter, 11811, 50);
        assert_eq!(read_density(&path), Some(Density { x: 600, y: 600 }));

        let path = dir.path().join("unitless.tif");
        tiff_with_density(&path, tiff::tags::ResolutionUnit::None, 1, 1);
        assert_eq!(read_density(&path), None);
    }

    #[test]
    fn test_exif_jpeg_density() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("scan.jpg");
        std::fs::write(&path, exif_jpeg(&[0xFF, 0xD8], 400, 400, 2)).unwrap();
        assert_eq!(read_density(&path), Some(Density { x: 400, y: 400 }));

        let path = dir.path().join("scan_cm.jpeg");
        std::fs::write(&path, exif_jpeg(&[0xFF, 0xD8], 118, 59, 3)).unwrap();
        assert_eq!(read_density(&path), Some(Density { x: 300, y: 150 }));
    }

    #[test]
    fn test_jfif_aspect_only_falls_back_to_exif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");

        // APP0 segment including its empty thumbnail size
        let mut prefix = jfif(0, 1, 1);
        prefix.extend_from_slice(&[0, 0]);

        std::fs::write(&path, exif_jpeg(&prefix, 200, 200, 2)).unwrap();
        assert_eq!(read_density(&path), Some(Density { x: 200, y: 200 }));
    }

    #[test]
    fn test_bmp_density() {
        let mut header = vec![0u8; 46];
        header[0..2].copy_from_slice(b"BM");
        header[14..18].copy_from_slice(&40u32.to_le_bytes());
        header[38..42].copy_from_slice(&11811i32.to_le_bytes());
        header[42..46].copy_from_slice(&5906i32.to_le_bytes());

        assert_eq!(
            parse_bmp_density(&header),
            Some(Density { x: 300, y: 150 })
        );

        header[38..42].copy_from_slice(&0i32.to_le_bytes());
        assert_eq!(parse_bmp_density(&header), None);

        header[14..18].copy_from_slice(&12u32.to_le_bytes());
        assert_eq!(parse_bmp_density(&header), None);
    }

    #[test]
    fn test_non_finite_density() {
        assert_eq!(density_from_f64(f64::NAN, 300.0), None);
        assert_eq!(density_from_f64(300.0, f64::INFINITY), None);
        assert_eq!(resolution_density(1, 300.0, 300.0), None);
    }

    #[test]
    fn test_default_density() {
        assert_eq!(Density::default(), Density { x: 96, y: 96 });
    }
}
