//! Per-pixel kernel application for every photometric interpretation.
//!
//! Each family accumulates weighted samples through [`PixelFilter::add`] and
//! turns the sums into an output pixel in [`PixelFilter::store`]. The resize
//! drivers decide which source pixels are visited and with which weights.

mod linear;
mod normal;
mod specialty;
mod srgb;


pub use linear::{Linear, LinearAlphaNorm};
pub use normal::Normal;
pub use specialty::{Plant, Water};
pub use srgb::{Srgb, SrgbAlphaNorm};

use crate::params::ResizeOptions;

/// Mutable state threaded through one resize call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterContext {
    /// Carry of the dithered water mask, in `0.0..=1.0` units.
    pub dither: f32,
    pub normal_gain: f32,
    pub sustain_factor: f32,
}

impl FilterContext {
    /// Starts a scan that produces a `dst_width` by `dst_height` image.
    #[must_use]
    pub fn new(options: &ResizeOptions, dst_width: usize, dst_height: usize) -> Self {
        Self {
            dither: if (dst_width | dst_height) > 2 { 0.5 } else { 0.0 },
            normal_gain: options.normal_gain(),
            sustain_factor: options.normal_sustain_factor,
        }
    }
}

/// Accumulator for one output pixel.
pub trait PixelFilter: Default {
    /// Bytes per pixel this filter reads and writes.
    const BPP: usize;

    /// Adds one source pixel. `px` holds at least [`Self::BPP`] bytes.
    fn add(&mut self, weight: f32, px: &[u8]);

    /// Writes the output pixel.
    ///
    /// `norm` is the reciprocal of the applied weight sum, or 1.0 when the
    /// weights were already normalized.
    fn store(self, norm: f32, ctx: &mut FilterContext, dst: &mut [u8]);
}

/// Index of the alpha byte for pixel sizes that carry one.
#[must_use]
pub(crate) const fn alpha_channel(bpp: usize) -> Option<usize> {
    match bpp {
        2 => Some(1),
        4 => Some(3),
        _ => None,
    }
}
