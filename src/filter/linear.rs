use super::{FilterContext, PixelFilter, alpha_channel};
use crate::{params::MINIMUM_ALPHA, util::round_to_u8};

/// Plain weighted average of all `N` channels.
#[derive(Debug, Clone, Copy)]
pub struct Linear<const N: usize> {
    sums: [f32; N],
}

impl<const N: usize> Default for Linear<N> {
    fn default() -> Self {
        Self { sums: [0.0; N] }
    }
}

impl<const N: usize> Linear<N> {
    /// Normalized channel sums, before rounding.
    #[must_use]
    #[inline(always)]
    pub(super) fn resolve(&self, norm: f32) -> [f32; N] {
        self.sums.map(|s| s * norm)
    }
}

impl<const N: usize> PixelFilter for Linear<N> {
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        for (sum, &c) in self.sums.iter_mut().zip(&px[..N]) {
            *sum += weight * f32::from(c);
        }
    }

    #[inline(always)]
    fn store(self, norm: f32, _ctx: &mut FilterContext, dst: &mut [u8]) {
        for (out, v) in dst[..N].iter_mut().zip(self.resolve(norm)) {
            *out = round_to_u8(v);
        }
    }
}

/// Weighted average where each color contribution is scaled by its alpha.
///
/// Only meaningful for 2 and 4 bytes per pixel, where the last byte is alpha.
#[derive(Debug, Clone, Copy)]
pub struct LinearAlphaNorm<const N: usize> {
    sums: [f32; N],
}

impl<const N: usize> Default for LinearAlphaNorm<N> {
    fn default() -> Self {
        Self { sums: [0.0; N] }
    }
}

impl<const N: usize> LinearAlphaNorm<N> {
    const ALPHA: usize = match alpha_channel(N) {
        Some(a) => a,
        None => panic!("alpha-normalized filters need an alpha channel"),
    };
}

impl<const N: usize> PixelFilter for LinearAlphaNorm<N> {
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        let f = weight * f32::from(px[Self::ALPHA]);
        for c in 0..Self::ALPHA {
            self.sums[c] += f * f32::from(px[c]);
        }
        self.sums[Self::ALPHA] += f;
    }

    #[inline(always)]
    fn store(self, norm: f32, _ctx: &mut FilterContext, dst: &mut [u8]) {
        let alpha_sum = self.sums[Self::ALPHA];
        let alpha = alpha_sum * norm;
        if alpha < MINIMUM_ALPHA {
            dst[..N].fill(0);
            return;
        }
        let inv = 1.0 / alpha_sum;
        for c in 0..Self::ALPHA {
            dst[c] = round_to_u8(self.sums[c] * inv);
        }
        dst[Self::ALPHA] = round_to_u8(alpha);
    }
}
