//! Fast fixed-exponent power approximations.
//!
//! Both estimates work by scaling the IEEE-754 bit pattern of a pre-scaled
//! input, which approximates `log2`, multiplying by the exponent and
//! reinterpreting the result. Each estimate carries a constant factor that the
//! caller folds back in, so the raw outputs are only meaningful inside the
//! formulas in [`crate::srgb`].


const POW_4_5_PRESCALE: f32 = 5_417_434_112.0;
const POW_2_3_PRESCALE: f32 = 6_521_909_350_804_488_192.0;

#[must_use]
#[inline(always)]
fn scaled_bit_pow(value: f32, prescale: f32, exponent: f32) -> f32 {
    let bits = (value * prescale).to_bits();
    f32::from_bits((bits as f32 * exponent + 0.5) as u32)
}

/// Estimates `x^(4/5)` times a fixed constant for `x` in `(0, 1]`.
#[must_use]
#[inline(always)]
pub fn pow_4_5_estimate(x: f32) -> f32 {
    scaled_bit_pow(x, POW_4_5_PRESCALE, 0.8)
}

/// Estimates `x^(2/3)` times a fixed constant for `x` in `(0, 1]`.
#[must_use]
#[inline(always)]
pub fn pow_2_3_estimate(x: f32) -> f32 {
    scaled_bit_pow(x, POW_2_3_PRESCALE, 0.666_666_666_666)
}

/// `x^2.4` for `x` in `(0, 1]`, accurate to a few parts in a thousand.
///
/// Two estimates of the power are built from `x^0.4`, one overshooting and one
/// undershooting, and averaged.
#[must_use]
#[inline(always)]
pub fn fast_pow_12_5(x: f32) -> f32 {
    let x2 = x * x;
    let p = pow_4_5_estimate(x);
    let root = p.sqrt();
    ((x2 * root) + ((x2 * x) / root) / root.sqrt()) * 0.510_118_8
}

/// `x^(5/12)` for `x` in `(0, 1]`, accurate to a few parts in a thousand.
#[must_use]
#[inline(always)]
pub fn fast_pow_5_12(x: f32) -> f32 {
    let p = pow_2_3_estimate(x);
    let v = (x * p) + ((x * x) / p.sqrt());
    (v * 0.529_055_4).sqrt().sqrt()
}
