use std::num::NonZeroUsize;

use smallvec::SmallVec;

use super::KaiserWindow;
use crate::params::EdgeMode;

/// One axis of the separable kernel used for arbitrary-ratio reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericKernel {
    window: KaiserWindow,
    scale: f64,
    scale_inv: f64,
    src_len: usize,
}

/// Taps of one axis for a single output coordinate.
///
/// The weights are not normalized. Callers divide by the sum of the taps they
/// actually applied.
#[derive(Debug, Clone, Default)]
pub struct AxisTaps {
    weights: SmallVec<[f32; 16]>,
    offset: usize,
}

impl AxisTaps {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weights: SmallVec::with_capacity(capacity),
            offset: 0,
        }
    }

    #[must_use]
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Source index of the first tap.
    #[must_use]
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether every tap lands inside `0..src_len` without wrapping.
    #[must_use]
    #[inline]
    pub fn is_contiguous(&self, src_len: usize) -> bool {
        self.offset + self.weights.len() <= src_len
    }
}

impl GenericKernel {
    /// # Parameters
    /// - `src_len`: Length of the source axis, in pixels
    /// - `dst_len`: Length of the destination axis, no larger than `src_len`
    /// - `hopcount`: Support half-width, in destination pixels
    /// - `alpha`: Kaiser window sharpness, already capped
    #[must_use]
    pub fn new(src_len: NonZeroUsize, dst_len: NonZeroUsize, hopcount: u32, alpha: f32) -> Self {
        let src = src_len.get() as f64;
        let dst = dst_len.get() as f64;
        Self {
            window: KaiserWindow::new(hopcount, alpha),
            scale: dst / src,
            scale_inv: src / dst,
            src_len: src_len.get(),
        }
    }

    /// Worst-case tap count of a single output coordinate, padded to a multiple of 4.
    #[must_use]
    pub fn max_taps(&self) -> usize {
        ((self.window.hopcount() * self.scale_inv).ceil() as usize + 2 + 3) & !3
    }

    /// Fills `taps` for output coordinate `dst_index`.
    pub fn build(&self, dst_index: usize, edge: EdgeMode, taps: &mut AxisTaps) {
        let source = ((dst_index as f64 + 0.5) * self.scale_inv) - 0.5;
        let hopsize = 0.5 * self.scale_inv;
        let mut min = (-self.window.hopcount() * hopsize + source).ceil() as isize;
        let mut max = (self.window.hopcount() * hopsize + source).floor() as isize;
        let len = self.src_len as isize;

        match edge {
            EdgeMode::Clip => {
                min = min.max(0);
                max = max.min(len - 1);
                // The nearest source pixel is always inside the support.
                if max < min {
                    let nearest = (source.round() as isize).clamp(0, len - 1);
                    min = nearest;
                    max = nearest;
                }
                taps.offset = min as usize;
            }
            EdgeMode::Wrap => {
                taps.offset = min.rem_euclid(len) as usize;
            }
        }

        let shift_scale = 2.0 * self.scale;
        taps.weights.clear();
        taps.weights.extend(
            (min..=max).map(|i| self.window.weight(shift_scale * (i as f64 - source)) as f32),
        );
    }
}
