use std::num::NonZeroUsize;

use anyhow::{Result, bail};
use log::debug;

use super::KaiserWindow;
use crate::util::try_alloc;

/// Square tap matrix for reducing by an exact integer divisor.
///
/// Rows are padded with zero taps to a multiple of four so vector code can
/// read whole groups; the padding does not contribute to the normalization.
#[derive(Debug, Clone)]
pub struct StaticMatrix {
    size: usize,
    row_width: usize,
    offset: isize,
    taps: Vec<f32>,
}

impl StaticMatrix {
    /// Builds the normalized kernel for `divisor`.
    ///
    /// # Parameters
    /// - `divisor`: Integer reduction factor applied to both axes
    /// - `hopcount`: Support half-width, in destination pixels
    /// - `alpha`: Kaiser window sharpness, already capped
    pub fn new(divisor: NonZeroUsize, hopcount: u32, alpha: f32) -> Result<Self> {
        let window = KaiserWindow::new(hopcount, alpha);
        let divisor = divisor.get() as f64;
        let scale = 1.0 / divisor;
        let hopsize = 0.5 * divisor;
        let center = hopsize - 0.5;
        let min = (-window.hopcount() * hopsize + center).ceil() as isize;
        let max = (window.hopcount() * hopsize + center).floor() as isize;
        let size = (max - min + 1) as usize;
        let row_width = (size + 3) & !3;
        let Some(len) = row_width.checked_mul(size) else {
            bail!("Kernel for divisor {divisor} needs {size}x{size} taps, which overflows.");
        };

        let mut taps = try_alloc::<f32>(len)?;
        let mut linear = try_alloc::<f64>(size)?;
        for (i, w) in linear.iter_mut().enumerate() {
            let x = (i as isize + min) as f64;
            *w = window.weight(2.0 * scale * (x - center));
        }

        let mut sum = 0f64;
        for (row, &wy) in taps.chunks_exact_mut(row_width).zip(&linear) {
            for (tap, &wx) in row.iter_mut().zip(&linear) {
                let w = wx * wy;
                *tap = w as f32;
                sum += w;
            }
        }
        if !sum.is_normal() || sum < 0.0 {
            bail!("Kernel for divisor {divisor} has a degenerate tap sum of {sum}.");
        }
        let norm = (1.0 / sum) as f32;
        for tap in &mut taps {
            *tap *= norm;
        }

        debug!("static kernel: divisor {divisor}, {size}x{size} taps, offset {min}");

        Ok(Self {
            size,
            row_width,
            offset: min,
            taps,
        })
    }

    /// Taps per side of the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Padded length of each row in [`Self::taps`].
    #[must_use]
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Source offset of the first tap relative to `dst * divisor`.
    #[must_use]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[must_use]
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Row `y` of the matrix without its padding.
    #[must_use]
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.row_width;
        &self.taps[start..start + self.size]
    }
}
