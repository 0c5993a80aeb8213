#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::NonZeroUsize;

use pastey::paste;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;

use super::{core_range, reduce};
use crate::{
    filter::{FilterContext, Linear},
    kernel::StaticMatrix,
    params::{FilterKind, ResizeOptions},
    reduce::SourceImage,
};

fn nz(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

fn random_image(len: usize) -> Vec<u8> {
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    (0..len).map(|_| rng.random()).collect()
}

fn options(filter: FilterKind) -> ResizeOptions {
    ResizeOptions {
        filter,
        ..ResizeOptions::default()
    }
}

fn run(
    src: &[u8],
    width: usize,
    height: usize,
    bpp: usize,
    divisor: usize,
    options: &ResizeOptions,
) -> Vec<u8> {
    let image = SourceImage::new(src, nz(width), nz(height), bpp, nz(width * bpp)).unwrap();
    let mut dst = vec![0u8; width.div_ceil(divisor) * height.div_ceil(divisor) * bpp];
    reduce(&mut dst, &image, nz(divisor), options).unwrap();
    dst
}

#[test]
fn core_range_excludes_wrapping_columns() {
    let matrix = StaticMatrix::new(nz(2), 2, 2.0).unwrap();
    assert_eq!(matrix.size(), 4);
    assert_eq!(matrix.offset(), -1);
    // Column 0 starts at -1; column 3 would read source 5..9.
    assert_eq!(core_range(&matrix, 8, 2, 4), 1..3);
}

#[test]
fn core_range_empty_when_kernel_wider_than_image() {
    let matrix = StaticMatrix::new(nz(4), 3, 2.0).unwrap();
    assert!(matrix.size() > 4);
    assert!(core_range(&matrix, 4, 4, 1).is_empty());
}

#[test]
fn core_range_without_negative_offset() {
    let matrix = StaticMatrix::new(nz(1), 2, 2.0).unwrap();
    let range = core_range(&matrix, 16, 1, 16);
    let offset = matrix.offset();
    for x in range {
        let start = x as isize + offset;
        assert!(start >= 0);
        assert!(start as usize + matrix.size() <= 16);
    }
}

#[test]
fn divisor_one_is_identity() {
    let src = random_image(7 * 5 * 4);
    for filter in [FilterKind::Linear, FilterKind::LinearAlphaNorm] {
        let out = run(&src, 7, 5, 4, 1, &options(filter));
        if filter == FilterKind::Linear {
            assert_eq!(out, src);
        } else {
            for (o, s) in out.chunks_exact(4).zip(src.chunks_exact(4)) {
                if s[3] >= 4 {
                    assert_eq!(o, s);
                } else {
                    assert_eq!(o, [0, 0, 0, 0]);
                }
            }
        }
    }
}

#[test]
fn uniform_color_survives_any_divisor() {
    let color = [37u8, 200, 129, 255];
    for bpp in 1..=4 {
        for divisor in 1..=5 {
            for hopcount in [1, 2, 3] {
                let src: Vec<u8> = (0..13 * 11).flat_map(|_| color[..bpp].to_vec()).collect();
                let options = ResizeOptions {
                    hopcount,
                    alpha: 6.0,
                    ..ResizeOptions::default()
                };
                let out = run(&src, 13, 11, bpp, divisor, &options);
                for px in out.chunks_exact(bpp) {
                    for (c, &v) in px.iter().enumerate() {
                        assert!(
                            v.abs_diff(color[c]) <= 1,
                            "bpp {bpp}, divisor {divisor}, hopcount {hopcount}: {v} vs {}",
                            color[c]
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn output_size_rounds_up() {
    let src = vec![90u8; 5 * 3 * 3];
    let out = run(&src, 5, 3, 3, 2, &ResizeOptions::default());
    assert_eq!(out.len(), 3 * 2 * 3);
    assert!(out.iter().all(|&v| v == 90));
}

#[test]
fn kernel_wraps_horizontally() {
    let mut src = vec![128u8; 8];
    src[7] = 255;
    let out = run(&src, 8, 1, 1, 2, &ResizeOptions::default());
    // Column 7 sits on a negative lobe of output 0 only through the wrap.
    assert!(out[0] < 128);
    assert_eq!(out[1], 128);
}

#[test]
fn srgb_alpha_norm_keeps_solid_red_interior() {
    let mut src = random_image(256 * 256 * 4);
    for y in 96..112 {
        for x in 96..112 {
            let i = (y * 256 + x) * 4;
            src[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
    }
    let options = ResizeOptions::new(FilterKind::SrgbAlphaNorm, 2, 6.0, 1.0, 0.0).unwrap();
    let out = run(&src, 256, 256, 4, 2, &options);
    assert_eq!(out.len(), 128 * 128 * 4);
    for y in 49..55 {
        for x in 49..55 {
            let i = (y * 128 + x) * 4;
            assert_eq!(&out[i..i + 4], &[255, 0, 0, 255], "pixel {x},{y}");
        }
    }
}

#[test]
fn alpha_norm_transparent_region_is_zero() {
    let mut src = random_image(32 * 32 * 4);
    for px in src.chunks_exact_mut(4) {
        px[3] = 0;
    }
    for filter in [FilterKind::LinearAlphaNorm, FilterKind::SrgbAlphaNorm] {
        let out = run(&src, 32, 32, 4, 4, &options(filter));
        assert!(out.iter().all(|&v| v == 0));
    }
}

#[test]
fn normal_maps_stay_unit_length() {
    let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
    let src: Vec<u8> = (0..16 * 16)
        .flat_map(|_| {
            let x: f32 = rng.random_range(-0.7..0.7);
            let y: f32 = rng.random_range(-0.7..0.7);
            let z = (1.0 - x * x - y * y).max(0.0).sqrt();
            [x, y, z].map(|c| (127.5 * (1.0 + c)).round() as u8)
        })
        .collect();
    for filter in [FilterKind::NormalMap, FilterKind::NormalMapSustain] {
        let options = ResizeOptions::new(filter, 2, 4.0, 1.5, 1.0).unwrap();
        let out = run(&src, 16, 16, 3, 2, &options);
        for px in out.chunks_exact(3) {
            let v = [px[0], px[1], px[2]].map(|c| f32::from(c) / 127.5 - 1.0);
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.0).abs() < 0.02, "{filter:?}: length {len}");
        }
    }
}

#[test]
fn specialty_filters_require_pow2() {
    let src = vec![0u8; 12 * 8 * 4];
    let image = SourceImage::new(&src, nz(12), nz(8), 4, nz(48)).unwrap();
    let mut dst = vec![0u8; 6 * 4 * 4];
    for filter in [FilterKind::WaterMap, FilterKind::PlantMap] {
        assert!(reduce(&mut dst, &image, nz(2), &options(filter)).is_err());
    }
    assert!(reduce(&mut dst, &image, nz(2), &options(FilterKind::Linear)).is_ok());
}

#[test]
fn rejects_unsupported_combinations() {
    let src = vec![0u8; 8 * 8 * 3];
    let image = SourceImage::new(&src, nz(8), nz(8), 3, nz(24)).unwrap();
    let mut dst = vec![0u8; 4 * 4 * 3];
    for filter in [FilterKind::PlantMap, FilterKind::Foliage, FilterKind::Sky, FilterKind::Fog] {
        assert!(reduce(&mut dst, &image, nz(2), &options(filter)).is_err());
    }
}

#[test]
fn huge_divisor_is_an_error() {
    let src = vec![0u8; 4];
    let image = SourceImage::new(&src, nz(1), nz(1), 4, nz(4)).unwrap();
    let mut dst = vec![0u8; 4];
    let options = ResizeOptions {
        hopcount: 64,
        ..ResizeOptions::default()
    };
    assert!(reduce(&mut dst, &image, nz(1 << 26), &options).is_err());
}

#[test]
fn rejects_short_destination() {
    let src = vec![0u8; 8 * 8];
    let image = SourceImage::new(&src, nz(8), nz(8), 1, nz(8)).unwrap();
    let mut dst = vec![0u8; 15];
    assert!(reduce(&mut dst, &image, nz(2), &ResizeOptions::default()).is_err());
}

#[test]
fn source_stride_padding_is_ignored() {
    let width = 6;
    let height = 6;
    let stride = 32;
    let mut src = vec![255u8; stride * height];
    for y in 0..height {
        src[y * stride..y * stride + width * 4].fill(60);
    }
    let image = SourceImage::new(&src, nz(width), nz(height), 4, nz(stride)).unwrap();
    let mut dst = vec![0u8; 3 * 3 * 4];
    reduce(&mut dst, &image, nz(2), &ResizeOptions::default()).unwrap();
    assert!(dst.iter().all(|&v| v == 60));
}

macro_rules! create_tests {
    ($module:ident) => {
        paste! {
            #[test]
            fn [<core_linear4_matches_wrapping_kernel_ $module>]() {
                let width = 24;
                let height = 10;
                let src = random_image(width * height * 4);
                let image = SourceImage::new(&src, nz(width), nz(height), 4, nz(width * 4)).unwrap();

                for (divisor, hopcount) in [(2, 2), (3, 2), (4, 3)] {
                    let matrix = StaticMatrix::new(nz(divisor), hopcount, 4.0).unwrap();
                    let new_width = width.div_ceil(divisor);
                    let mut ctx = FilterContext::new(&ResizeOptions::default(), new_width, 4);
                    for x in core_range(&matrix, width, divisor, new_width) {
                        let x0 = (x * divisor) as isize + matrix.offset();
                        for y0 in [0, 3, height - 1] {
                            let mut expected = [0u8; 4];
                            super::rust::apply::<Linear<4>>(
                                &matrix, &image, x0 as usize, y0, &mut ctx, &mut expected,
                            );
                            let mut actual = [0u8; 4];
                            unsafe {
                                super::$module::apply_core_linear4(
                                    &matrix, &image, x0 as usize, y0, &mut ctx, &mut actual,
                                );
                            }
                            assert_eq!(actual, expected, "divisor {divisor}, column {x}, row {y0}");
                        }
                    }
                }
            }

            #[test]
            fn [<core_linear4_uniform_ $module>]() {
                let src: Vec<u8> = (0..16 * 16).flat_map(|_| [1u8, 128, 254, 255]).collect();
                let image = SourceImage::new(&src, nz(16), nz(16), 4, nz(64)).unwrap();
                let matrix = StaticMatrix::new(nz(2), 2, 2.0).unwrap();
                let mut ctx = FilterContext::new(&ResizeOptions::default(), 8, 8);
                let mut out = [0u8; 4];
                unsafe {
                    super::$module::apply_core_linear4(&matrix, &image, 3, 15, &mut ctx, &mut out);
                }
                assert_eq!(out, [1, 128, 254, 255]);
            }
        }
    };
}

create_tests!(rust);

#[cfg(target_feature = "avx2")]
create_tests!(avx2);
