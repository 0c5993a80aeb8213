#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::NonZeroUsize;

use super::*;
use crate::image::PixelFormat;

fn nz(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

#[test]
fn source_view_validates_layout() {
    let data = vec![0u8; 24];
    assert!(SourceImage::new(&data, nz(2), nz(3), 4, nz(8)).is_ok());
    // Last row may omit its padding
    assert!(SourceImage::new(&data[..22], nz(2), nz(3), 3, nz(8)).is_ok());
    assert!(SourceImage::new(&data, nz(2), nz(3), 0, nz(8)).is_err());
    assert!(SourceImage::new(&data, nz(2), nz(3), 5, nz(10)).is_err());
    assert!(SourceImage::new(&data, nz(2), nz(3), 4, nz(7)).is_err());
    assert!(SourceImage::new(&data[..23], nz(2), nz(3), 4, nz(8)).is_err());
}

#[test]
fn source_rows_skip_padding() {
    let data: Vec<u8> = (0..12).collect();
    let view = SourceImage::new(&data, nz(2), nz(2), 2, nz(6)).unwrap();
    assert_eq!(view.row(0), &[0, 1, 2, 3]);
    assert_eq!(view.row(1), &[6, 7, 8, 9]);
}

#[test]
fn kernel_table_covers_formats() {
    use FilterKind as K;

    for bpp in 1..=4 {
        assert!(select_kernels(K::Linear, bpp).is_ok());
        assert!(select_kernels(K::LinearAlphaNorm, bpp).is_ok());
        assert!(select_kernels(K::Srgb, bpp).is_ok());
        assert!(select_kernels(K::SrgbAlphaNorm, bpp).is_ok());
    }
    for kind in [
        K::NormalMap,
        K::NormalMapAlphaNorm,
        K::NormalMapSustain,
        K::NormalMapSustainAlphaNorm,
        K::WaterMap,
    ] {
        assert!(select_kernels(kind, 3).is_ok(), "{kind:?}");
        assert!(select_kernels(kind, 4).is_ok(), "{kind:?}");
        assert!(select_kernels(kind, 1).is_err(), "{kind:?}");
        assert!(select_kernels(kind, 2).is_err(), "{kind:?}");
    }
    assert!(select_kernels(K::PlantMap, 4).is_ok());
    assert!(select_kernels(K::PlantMap, 3).is_err());
    for kind in [K::Foliage, K::Sky, K::Fog] {
        assert!(select_kernels(kind, 4).is_err(), "{kind:?}");
    }
    assert!(select_kernels(K::Linear, 5).is_err());
}

#[test]
fn rejects_invalid_options() {
    let src = vec![0u8; 16];
    let mut dst = vec![0u8; 16];
    let bad = ResizeOptions {
        hopcount: 0,
        ..ResizeOptions::default()
    };
    assert!(reduce_by_divisor(&mut dst, &src, nz(4), nz(4), 1, nz(4), nz(2), &bad).is_err());
    assert!(reduce_to_size(&mut dst, &src, nz(4), nz(4), 1, nz(4), nz(2), nz(2), &bad).is_err());
    assert!(reduce_half_box(&mut dst, &src, nz(4), nz(4), 1, nz(4), &bad).is_err());

    let bad = ResizeOptions {
        alpha: f32::NAN,
        ..ResizeOptions::default()
    };
    assert!(reduce_half_box(&mut dst, &src, nz(4), nz(4), 1, nz(4), &bad).is_err());
}

#[test]
fn rejects_bad_source_layout() {
    let opts = ResizeOptions::default();
    let src = vec![0u8; 16];
    let mut dst = vec![0u8; 16];
    // Stride shorter than a row
    assert!(reduce_by_divisor(&mut dst, &src, nz(4), nz(4), 2, nz(4), nz(2), &opts).is_err());
    // Buffer shorter than the image
    assert!(reduce_half_box(&mut dst, &src, nz(4), nz(5), 1, nz(4), &opts).is_err());
    assert!(reduce_to_size(&mut dst, &src, nz(4), nz(4), 0, nz(4), nz(2), nz(2), &opts).is_err());
}

#[test]
fn half_box_rounds_size_up() {
    let opts = ResizeOptions::default();
    let src = vec![100u8; 5 * 3];
    let mut dst = vec![0u8; 3 * 2];
    reduce_half_box(&mut dst, &src, nz(5), nz(3), 1, nz(5), &opts).unwrap();
    assert_eq!(dst, vec![100; 6]);

    let mut short = vec![0u8; 5];
    assert!(reduce_half_box(&mut short, &src, nz(5), nz(3), 1, nz(5), &opts).is_err());
}

#[test]
fn image_wrappers_keep_format() {
    let opts = ResizeOptions {
        filter: FilterKind::SrgbAlphaNorm,
        ..ResizeOptions::default()
    };
    let pixels: Vec<u8> = [40u8, 80, 120, 255]
        .iter()
        .copied()
        .cycle()
        .take(10 * 6 * 4)
        .collect();
    let src = Image::from_raw(pixels, nz(10), nz(6), PixelFormat::Bgra32, 4, nz(40)).unwrap();

    let divided = reduce_image_by_divisor(&src, nz(4), &opts).unwrap();
    assert_eq!(divided.format(), PixelFormat::Bgra32);
    assert_eq!((divided.width().get(), divided.height().get()), (3, 2));

    let sized = reduce_image_to_size(&src, nz(7), nz(5), &opts).unwrap();
    assert_eq!((sized.width().get(), sized.height().get()), (7, 5));
    assert_eq!(sized.data().len(), 7 * 5 * 4);

    let halved = reduce_image_half_box(&src, &opts).unwrap();
    assert_eq!((halved.width().get(), halved.height().get()), (5, 3));
    for px in halved.data().chunks_exact(4) {
        assert_eq!(px[3], 255);
        assert!(px[0].abs_diff(40) <= 1);
    }

    assert!(reduce_image_to_size(&src, nz(11), nz(5), &opts).is_err());
}

#[test]
fn image_wrappers_honor_stride() {
    let mut pixels = Vec::new();
    for _ in 0..4 {
        pixels.extend([90u8; 4]);
        pixels.extend([255u8; 2]);
    }
    let src = Image::from_raw(pixels, nz(4), nz(4), PixelFormat::Grayscale, 1, nz(6)).unwrap();
    let halved = reduce_image_half_box(&src, &ResizeOptions::default()).unwrap();
    assert_eq!(halved.data(), &[90; 4]);
    assert_eq!(halved.bytes_per_line().get(), 2);
}
