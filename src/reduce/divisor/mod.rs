#[cfg(target_arch = "x86_64")]
mod avx2;
mod rust;

#[cfg(test)]
mod tests;

use std::{num::NonZeroUsize, ops::Range};

use anyhow::Result;
use cfg_if::cfg_if;
use log::debug;

pub(crate) use self::rust::{apply, apply_core};
use super::{SourceImage, StaticFn, check_destination, check_pow2, select_kernels};
use crate::{
    filter::{FilterContext, Linear},
    kernel::StaticMatrix,
    params::ResizeOptions,
};

/// Core kernel for [`Linear<4>`](crate::filter::Linear), vectorized when the
/// CPU supports it.
pub(crate) fn linear4_core() -> StaticFn {
    cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if crate::util::has_avx2() {
                return apply_core_linear4_avx2;
            }
        }
    }

    rust::apply_core::<Linear<4>>
}

#[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
fn apply_core_linear4_avx2(
    matrix: &StaticMatrix,
    src: &SourceImage,
    x0: usize,
    y0: usize,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    // SAFETY: Only selected after AVX2 support was detected
    unsafe {
        avx2::apply_core_linear4(matrix, src, x0, y0, ctx, dst);
    }
}

/// Output columns whose kernel support lies entirely inside the source row.
///
/// # Parameters
/// - `matrix`: Kernel whose size and offset bound the support
/// - `width`: Width of the source image in pixels
/// - `divisor`: Source pixels per output pixel
/// - `new_width`: Width of the output in pixels
#[must_use]
pub fn core_range(matrix: &StaticMatrix, width: usize, divisor: usize, new_width: usize) -> Range<usize> {
    let offset = matrix.offset();
    let first = if offset >= 0 {
        0
    } else {
        offset.unsigned_abs().div_ceil(divisor)
    };
    let room = width as isize - matrix.size() as isize - offset;
    if room < 0 {
        return 0..0;
    }
    let end = (room as usize / divisor + 1).min(new_width);
    first..end.max(first)
}

/// Reduces `src` by `divisor` on both axes into the tightly packed `dst`.
pub(crate) fn reduce(
    dst: &mut [u8],
    src: &SourceImage,
    divisor: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<()> {
    let bpp = src.bpp();
    let kernels = select_kernels(options.filter, bpp)?;
    check_pow2(options.filter, src.width(), src.height())?;

    let width = src.width().get();
    let height = src.height().get();
    let d = divisor.get();
    let new_width = width.div_ceil(d);
    let new_height = height.div_ceil(d);
    check_destination(dst.len(), new_width, new_height, bpp)?;

    let matrix = StaticMatrix::new(divisor, options.hopcount, options.kaiser_alpha())?;
    let core = core_range(&matrix, width, d, new_width);
    debug!(
        "reduce by {d}: {width}x{height} -> {new_width}x{new_height}, core columns {}..{}, \
         row width {}, tap sum {}",
        core.start,
        core.end,
        matrix.row_width(),
        matrix.taps().iter().sum::<f32>()
    );

    let mut ctx = FilterContext::new(options, new_width, new_height);
    let offset = matrix.offset();
    for (y, dst_row) in dst
        .chunks_exact_mut(new_width * bpp)
        .take(new_height)
        .enumerate()
    {
        let y0 = ((y * d) as isize + offset).rem_euclid(height as isize) as usize;
        for (x, out) in dst_row.chunks_exact_mut(bpp).enumerate() {
            let start = (x * d) as isize + offset;
            if core.contains(&x) {
                (kernels.stat_core)(&matrix, src, start as usize, y0, &mut ctx, out);
            } else {
                let x0 = start.rem_euclid(width as isize) as usize;
                (kernels.stat)(&matrix, src, x0, y0, &mut ctx, out);
            }
        }
    }
    Ok(())
}
