//! sRGB transfer curve conversions.
//!
//! Encoded values live in `0.0..=255.0`, linear values in `0.0..=1.0`. The
//! power-law segments use the approximations in [`crate::util::math`].


use crate::util::math::{fast_pow_5_12, fast_pow_12_5};

const SRGB_LINEAR_CUTOFF: f32 = 0.04045 * 255.0;
const LINEAR_SRGB_CUTOFF: f32 = 0.003_130_8;

/// Converts one sRGB-encoded channel in `0.0..=255.0` to linear light in `0.0..=1.0`.
#[must_use]
#[inline(always)]
pub fn srgb_to_linear(value: f32) -> f32 {
    if value <= SRGB_LINEAR_CUTOFF {
        value * ((1.0 / 12.92) * (1.0 / 255.0))
    } else {
        fast_pow_12_5((value + (0.055 * 255.0)) * ((1.0 / 1.055) * (1.0 / 255.0)))
    }
}

/// Converts one linear-light channel in `0.0..=1.0` to sRGB encoding in `0.0..=255.0`.
///
/// Values outside the unit interval are not clamped; callers round and
/// saturate the result.
#[must_use]
#[inline(always)]
pub fn linear_to_srgb(value: f32) -> f32 {
    if value <= LINEAR_SRGB_CUTOFF {
        value * (12.92 * 255.0)
    } else {
        ((1.055 * 255.0) * fast_pow_5_12(value)) - (0.055 * 255.0)
    }
}

/// Converts the first three lanes of a pixel from sRGB to linear light.
///
/// The fourth lane is returned untouched, so alpha or padding can ride along.
#[must_use]
#[inline(always)]
pub fn srgb_to_linear3(px: [f32; 4]) -> [f32; 4] {
    [
        srgb_to_linear(px[0]),
        srgb_to_linear(px[1]),
        srgb_to_linear(px[2]),
        px[3],
    ]
}

/// Converts the first three lanes of a pixel from linear light to sRGB.
///
/// The fourth lane is returned untouched.
#[must_use]
#[inline(always)]
pub fn linear_to_srgb3(px: [f32; 4]) -> [f32; 4] {
    [
        linear_to_srgb(px[0]),
        linear_to_srgb(px[1]),
        linear_to_srgb(px[2]),
        px[3],
    ]
}
