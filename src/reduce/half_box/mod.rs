#[cfg(target_arch = "x86_64")]
mod avx2;
mod rust;


use anyhow::Result;
use cfg_if::cfg_if;

pub(crate) use self::rust::reduce_row;
use super::{HalfBoxFn, SourceImage, check_destination, select_kernels};
use crate::{
    filter::{FilterContext, Linear},
    params::ResizeOptions,
};

/// Box row reduction for [`Linear<4>`](crate::filter::Linear), vectorized
/// when the CPU supports it.
pub(crate) fn linear4_row() -> HalfBoxFn {
    cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if crate::util::has_avx2() {
                return reduce_row_linear4_avx2;
            }
        }
    }

    rust::reduce_row::<Linear<4>>
}

#[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))]
fn reduce_row_linear4_avx2(dst: &mut [u8], row0: &[u8], row1: &[u8], ctx: &mut FilterContext) {
    // SAFETY: Only selected after AVX2 support was detected
    unsafe {
        avx2::reduce_row_linear4(dst, row0, row1, ctx);
    }
}

/// Averages each 2x2 block of `src` into one pixel of the tightly packed
/// `dst`.
///
/// The output size is given explicitly so the cascade can truncate odd
/// dimensions while the public entry point rounds them up. Blocks that run
/// past the last column or row reuse it.
///
/// # Parameters
/// - `dst`: Destination buffer
/// - `src`: Source image
/// - `new_width`: Output width, at most `ceil(width / 2)`
/// - `new_height`: Output height, at most `ceil(height / 2)`
/// - `options`: Filter kind
pub(crate) fn reduce(
    dst: &mut [u8],
    src: &SourceImage,
    new_width: usize,
    new_height: usize,
    options: &ResizeOptions,
) -> Result<()> {
    let bpp = src.bpp();
    let kernels = select_kernels(options.filter, bpp)?;
    check_destination(dst.len(), new_width, new_height, bpp)?;

    let last_row = src.height().get() - 1;
    let mut ctx = FilterContext::new(options, new_width, new_height);
    for (y, dst_row) in dst
        .chunks_exact_mut(new_width * bpp)
        .take(new_height)
        .enumerate()
    {
        let row0 = src.row((2 * y).min(last_row));
        let row1 = src.row((2 * y + 1).min(last_row));
        (kernels.half_box)(dst_row, row0, row1, &mut ctx);
    }
    Ok(())
}
