use super::{FilterContext, PixelFilter, alpha_channel};
use crate::{
    params::MINIMUM_ALPHA,
    srgb::{linear_to_srgb, linear_to_srgb3, srgb_to_linear, srgb_to_linear3},
    util::round_to_u8,
};

/// Number of leading channels that carry sRGB-encoded color.
const fn color_channels(bpp: usize) -> usize {
    match alpha_channel(bpp) {
        Some(a) => a,
        None => bpp,
    }
}

/// Decodes the color channels of `px` to linear light, leaving alpha as is.
#[inline(always)]
fn decode<const N: usize>(px: &[u8]) -> [f32; 4] {
    let mut lanes = [0f32; 4];
    for (lane, &c) in lanes.iter_mut().zip(&px[..N]) {
        *lane = f32::from(c);
    }
    if color_channels(N) >= 3 {
        srgb_to_linear3(lanes)
    } else {
        lanes[0] = srgb_to_linear(lanes[0]);
        lanes
    }
}

/// Encodes linear color lanes back to sRGB, leaving alpha as is.
#[inline(always)]
fn encode<const N: usize>(mut lanes: [f32; 4]) -> [f32; 4] {
    if color_channels(N) >= 3 {
        linear_to_srgb3(lanes)
    } else {
        lanes[0] = linear_to_srgb(lanes[0]);
        lanes
    }
}

/// Weighted average computed in linear light.
#[derive(Debug, Clone, Copy, Default)]
pub struct Srgb<const N: usize> {
    sums: [f32; 4],
}

impl<const N: usize> PixelFilter for Srgb<N> {
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        let lanes = decode::<N>(px);
        for (sum, v) in self.sums.iter_mut().zip(lanes) {
            *sum += weight * v;
        }
    }

    #[inline(always)]
    fn store(self, norm: f32, _ctx: &mut FilterContext, dst: &mut [u8]) {
        let lanes = encode::<N>(self.sums.map(|s| s * norm));
        for (out, v) in dst[..N].iter_mut().zip(lanes) {
            *out = round_to_u8(v);
        }
    }
}

/// Linear-light average with color weighted by alpha.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgbAlphaNorm<const N: usize> {
    sums: [f32; 4],
}

impl<const N: usize> SrgbAlphaNorm<N> {
    const ALPHA: usize = match alpha_channel(N) {
        Some(a) => a,
        None => panic!("alpha-normalized filters need an alpha channel"),
    };
}

impl<const N: usize> PixelFilter for SrgbAlphaNorm<N> {
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        let f = weight * f32::from(px[Self::ALPHA]);
        let lanes = decode::<N>(px);
        for c in 0..Self::ALPHA {
            self.sums[c] += f * lanes[c];
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
        let lanes = encode::<N>(self.sums.map(|s| s * inv));
        for c in 0..Self::ALPHA {
            dst[c] = round_to_u8(lanes[c]);
        }
        dst[Self::ALPHA] = round_to_u8(alpha);
    }
}
