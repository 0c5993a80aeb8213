use super::{FilterContext, PixelFilter};
use crate::{params::MINIMUM_ALPHA, util::round_to_u8};

/// Half of the byte range; encoded normals are `HALF_RANGE * (1 + v)`.
const HALF_RANGE: f32 = 0.5 * 255.0;
/// Shortest averaged vector that is still renormalized at full strength.
const MIN_LENGTH: f32 = 0.0625;
/// Largest gain the sustain pass may apply to X/Y.
const MAX_SUSTAIN_GAIN: f32 = 8.0;

/// Tangent-space normal map filter.
///
/// `SUSTAIN` tracks how much tangent-plane energy the source taps carried and
/// boosts X/Y of the averaged vector to compensate for flattening.
/// `ALPHA_NORM` weights every tap by its alpha and requires `N == 4`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normal<const N: usize, const SUSTAIN: bool, const ALPHA_NORM: bool> {
    sums: [f32; 3],
    alpha: f32,
    energy: f32,
}

#[inline(always)]
fn renormalize(v: &mut [f32; 3]) {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let scale = HALF_RANGE / len.max(MIN_LENGTH);
    for c in v.iter_mut() {
        *c *= scale;
    }
}

impl<const N: usize, const SUSTAIN: bool, const ALPHA_NORM: bool> PixelFilter
    for Normal<N, SUSTAIN, ALPHA_NORM>
{
    const BPP: usize = N;

    #[inline(always)]
    fn add(&mut self, weight: f32, px: &[u8]) {
        let f = if ALPHA_NORM {
            weight * f32::from(px[3])
        } else {
            weight
        };
        let v = [
            f * (f32::from(px[0]) - HALF_RANGE),
            f * (f32::from(px[1]) - HALF_RANGE),
            f * (f32::from(px[2]) - HALF_RANGE),
        ];
        for (sum, c) in self.sums.iter_mut().zip(v) {
            *sum += c;
        }
        if SUSTAIN {
            let planar = v[0] * v[0] + v[1] * v[1];
            if planar > 0.0 {
                self.energy += planar.sqrt() / (planar + v[2] * v[2]).sqrt();
            }
        }
        if N == 4 {
            self.alpha += if ALPHA_NORM {
                f
            } else {
                weight * f32::from(px[3])
            };
        }
    }

    #[inline(always)]
    fn store(self, norm: f32, ctx: &mut FilterContext, dst: &mut [u8]) {
        let alpha = self.alpha * norm;
        let mut v = self.sums;
        if ALPHA_NORM {
            if alpha < MINIMUM_ALPHA {
                dst[..N].fill(0);
                return;
            }
            let inv = 1.0 / self.alpha;
            v = v.map(|c| c * inv);
        } else {
            v = v.map(|c| c * norm);
        }

        v[0] *= ctx.normal_gain;
        v[1] *= ctx.normal_gain;
        renormalize(&mut v);

        if SUSTAIN {
            let planar = (v[0] * v[0] + v[1] * v[1]).sqrt();
            let target = self.energy * ctx.sustain_factor;
            if planar < target {
                let gain = (target / planar).min(MAX_SUSTAIN_GAIN);
                v[0] *= gain;
                v[1] *= gain;
                renormalize(&mut v);
            }
        }

        for (out, c) in dst.iter_mut().zip(v) {
            *out = round_to_u8(HALF_RANGE + c);
        }
        if N == 4 {
            dst[3] = round_to_u8(alpha);
        }
    }
}
