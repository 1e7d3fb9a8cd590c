//! Decode round-trip tests.
//!
//! Encoded scans are wrapped in a minimal JFIF file and decoded with the
//! `image` crate; the result must be close to the input.

use baseline_jpeg::color::{Plane, SourceImage};
use baseline_jpeg::jpeg::{encode_scan, HuffmanTables, QuantTables, ScanOptions, Subsampling};
use image::GenericImageView;

mod support;
use support::container::{wrap, Frame};
use support::synthetic::{self, Planes};

fn rgb_source(planes: &Planes, width: u32, height: u32) -> SourceImage<'_> {
    SourceImage::rgb(
        Plane::packed(&planes[0], width, height).unwrap(),
        Plane::packed(&planes[1], width, height).unwrap(),
        Plane::packed(&planes[2], width, height).unwrap(),
    )
    .unwrap()
}

/// Encode, wrap and decode; returns interleaved RGB.
fn roundtrip_rgb(planes: &Planes, width: u32, height: u32, quality: u8, options: ScanOptions) -> Vec<u8> {
    let quant = QuantTables::with_quality(quality);
    let huffman = HuffmanTables::standard();
    let segment = encode_scan(&rgb_source(planes, width, height), &quant, huffman, &options)
        .expect("encode");
    let frame = Frame {
        width,
        height,
        gray: false,
        subsampling: options.subsampling,
    };
    let jpeg = wrap(&segment, frame, &quant, huffman);

    let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg)
        .expect("decode wrapped scan");
    assert_eq!(decoded.dimensions(), (width, height));
    decoded.to_rgb8().into_raw()
}

fn mean_abs_error(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let total: u64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs() as u64)
        .sum();
    total as f64 / a.len() as f64
}

#[test]
fn test_gradient_444_roundtrip() {
    let (w, h) = (64, 48);
    let planes = synthetic::gradient(w, h);
    let decoded = roundtrip_rgb(&planes, w, h, 90, ScanOptions::fast());
    let err = mean_abs_error(&decoded, &synthetic::interleave(&planes));
    assert!(err < 3.0, "mean abs error {err}");
}

#[test]
fn test_gradient_420_roundtrip() {
    let (w, h) = (64, 48);
    let planes = synthetic::gradient(w, h);
    let decoded = roundtrip_rgb(&planes, w, h, 90, ScanOptions::compact());
    let err = mean_abs_error(&decoded, &synthetic::interleave(&planes));
    assert!(err < 4.0, "mean abs error {err}");
}

#[test]
fn test_partial_mcus_roundtrip() {
    // Neither dimension is a multiple of 8 or 16
    for options in [ScanOptions::fast(), ScanOptions::compact()] {
        let (w, h) = (37, 21);
        let planes = synthetic::gradient(w, h);
        let decoded = roundtrip_rgb(&planes, w, h, 95, options);
        let err = mean_abs_error(&decoded, &synthetic::interleave(&planes));
        assert!(err < 4.0, "{:?}: mean abs error {err}", options.subsampling);
    }
}

#[test]
fn test_block_aligned_checkerboard_is_near_exact() {
    // 8x8 cells line up with blocks, so every block is flat
    let (w, h) = (32, 32);
    let planes = synthetic::checkerboard(w, h, 8);
    let decoded = roundtrip_rgb(&planes, w, h, 100, ScanOptions::fast());
    let err = mean_abs_error(&decoded, &synthetic::interleave(&planes));
    assert!(err < 1.5, "mean abs error {err}");
}

#[test]
fn test_solid_color_roundtrip() {
    let (w, h) = (16, 16);
    let planes = synthetic::solid(w, h, [200, 40, 90]);
    let decoded = roundtrip_rgb(&planes, w, h, 85, ScanOptions::compact());
    for px in decoded.chunks_exact(3) {
        assert!((px[0] as i32 - 200).abs() <= 6, "{px:?}");
        assert!((px[1] as i32 - 40).abs() <= 6, "{px:?}");
        assert!((px[2] as i32 - 90).abs() <= 6, "{px:?}");
    }
}

#[test]
fn test_noise_decodes_without_error() {
    // Dense AC content exercises long codes and byte stuffing
    let (w, h) = (40, 24);
    let planes = synthetic::noise(w, h, 7);
    for quality in [50, 100] {
        let decoded = roundtrip_rgb(&planes, w, h, quality, ScanOptions::fast());
        assert_eq!(decoded.len(), (w * h * 3) as usize);
    }
}

#[test]
fn test_gray_roundtrip() {
    let (w, h) = (30, 17);
    let data: Vec<u8> = (0..w * h).map(|i| ((i % w) * 8) as u8).collect();
    let image = SourceImage::Gray(Plane::packed(&data, w, h).unwrap());
    let quant = QuantTables::with_quality(92);
    let huffman = HuffmanTables::standard();
    let segment = encode_scan(&image, &quant, huffman, &ScanOptions::default()).unwrap();

    let frame = Frame {
        width: w,
        height: h,
        gray: true,
        subsampling: Subsampling::S444,
    };
    let jpeg = wrap(&segment, frame, &quant, huffman);
    let decoded = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg)
        .unwrap()
        .to_luma8()
        .into_raw();
    let err = mean_abs_error(&decoded, &data);
    assert!(err < 3.0, "mean abs error {err}");
}
