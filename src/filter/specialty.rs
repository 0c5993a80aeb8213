use super::{FilterContext, Linear, PixelFilter};
use crate::util::round_to_u8;

/// Water surface maps: a 2D flow direction in red/green and a binary foam
/// mask in blue.
///
/// The direction is renormalized when averaging shortens it below 0.75;
/// longer directions are encoded as they are. The mask is
/// dithered so that partially covered areas keep their overall coverage
/// instead of banding.
#[derive(Debug, Clone, Copy)]
pub struct Water<const N: usize> {
    inner: Linear<N>,
}

impl<const N: usize> Default for Water<N> {
    fn default() -> Self {
        Self {
            inner: Linear::default(),
        }
    }
}

/// Directions shorter than this are stretched back to unit length.
const RENORMALIZE_BELOW: f32 = 0.75;
/// Masks at or below this coverage are left untouched.
const MASK_FLOOR: f32 = 0.1;
const MASK_SOLID: f32 = 0.45;
const MASK_WEAK: f32 = 0.3;

/// Quantizes a fractional mask coverage to 0 or 1, carrying the error.
#[must_use]
pub(crate) fn dither_mask(coverage: f32, carry: &mut f32) -> f32 {
    if coverage <= MASK_FLOOR {
        return coverage;
    }
    *carry += coverage;
    let bit = if coverage > MASK_SOLID {
        1.0
    } else if coverage < MASK_WEAK && *carry < 1.0 {
        0.0
    } else if coverage + *carry < MASK_SOLID {
        0.0
    } else {
        1.0
    };
    *carry -= bit;
    bit
}

impl<const N: usize> PixelFilter for Water<N> {
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        self.inner.add(weight, px);
    }

    fn store(self, norm: f32, ctx: &mut FilterContext, dst: &mut [u8]) {
        let sums = self.inner.resolve(norm);
        let mut x = 2.0 * (sums[0] / 255.0 - 0.5);
        let mut y = 2.0 * (sums[1] / 255.0 - 0.5);
        let len = (x * x + y * y).sqrt();
        if len > 0.0 && len < RENORMALIZE_BELOW {
            x /= len;
            y /= len;
        }
        let mask = dither_mask(sums[2] / 255.0, &mut ctx.dither);

        dst[0] = round_to_u8(255.0 * (0.5 + 0.5 * x));
        dst[1] = round_to_u8(255.0 * (0.5 + 0.5 * y));
        dst[2] = round_to_u8(255.0 * mask);
        if let Some(&alpha) = sums.get(3) {
            dst[3] = round_to_u8(alpha);
        }
    }
}

/// Vegetation maps, whose alpha coverage is boosted by a quarter so that thin
/// foliage does not fade out at coarse levels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plant {
    inner: Linear<4>,
}

const PLANT_ALPHA_BOOST: f32 = 1.25;

impl PixelFilter for Plant {
    const BPP: usize = 4;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        self.inner.add(weight, px);
    }

    #[inline(always)]
    fn store(self, norm: f32, _ctx: &mut FilterContext, dst: &mut [u8]) {
        let sums = self.inner.resolve(norm);
        dst[0] = round_to_u8(sums[0]);
        dst[1] = round_to_u8(sums[1]);
        dst[2] = round_to_u8(sums[2]);
        dst[3] = round_to_u8(sums[3] * PLANT_ALPHA_BOOST);
    }
}
