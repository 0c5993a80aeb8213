//! Kaiser-windowed sinc kernels.
//!
//! Two representations are built from the same window function:
//! [`StaticMatrix`], a normalized square tap matrix for integer divisors that
//! is computed once per image, and [`GenericKernel`], which rebuilds separable
//! taps for every output pixel of an arbitrary-ratio resize and is left
//! unnormalized.

mod generic;
mod static_matrix;


use std::f64::consts::PI;

pub use generic::{AxisTaps, GenericKernel};
pub use static_matrix::StaticMatrix;

/// Number of power series terms used for the modified Bessel function.
const BESSEL_TERMS: u32 = 14;

/// Modified Bessel function of the first kind, order zero.
///
/// This truncated series is only accurate over the argument range a Kaiser
/// window with `alpha <= 16` produces.
#[must_use]
pub fn bessel_i0(x: f64) -> f64 {
    let y = x * x * 0.25;
    let mut term = y;
    let mut sum = 1.0 + term;
    for k in 2..=BESSEL_TERMS {
        let k = f64::from(k);
        term *= y / (k * k);
        sum += term;
    }
    sum
}

/// Unnormalized Kaiser window at `x` in `-1.0..=1.0`.
#[must_use]
pub fn kaiser(x: f64, beta: f64) -> f64 {
    bessel_i0(beta * (1.0 - x * x).max(0.0).sqrt())
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[must_use]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Shape of the window shared by both kernel representations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KaiserWindow {
    hopcount: f64,
    hopcount_inv: f64,
    beta: f64,
    peak_inv: f64,
}

impl KaiserWindow {
    /// `alpha` is expected to be capped already.
    #[must_use]
    pub fn new(hopcount: u32, alpha: f32) -> Self {
        let hopcount = f64::from(hopcount);
        let beta = f64::from(alpha) * PI;
        Self {
            hopcount,
            hopcount_inv: 1.0 / hopcount,
            beta,
            peak_inv: 1.0 / bessel_i0(beta),
        }
    }

    #[must_use]
    pub fn hopcount(&self) -> f64 {
        self.hopcount
    }

    /// Weight of a tap `shift` destination-pixel half-widths from the center.
    ///
    /// Scaled so the center tap is 1.0; sharp windows would otherwise
    /// overflow `f32` once two axes are multiplied together.
    #[must_use]
    #[inline]
    pub fn weight(&self, shift: f64) -> f64 {
        sinc(shift) * kaiser(self.hopcount_inv * shift, self.beta) * self.peak_inv
    }
}
