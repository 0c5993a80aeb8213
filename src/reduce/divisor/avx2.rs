#![allow(clippy::undocumented_unsafe_blocks)]

use std::arch::x86_64::*;

use crate::{filter::FilterContext, kernel::StaticMatrix, reduce::SourceImage, util::round_to_u8};

/// Core static kernel for 4-byte linear pixels.
///
/// All four channels of a pixel are accumulated in one vector. Taps are
/// summed in the same order and with the same separate multiply and add as
/// the portable path, so both produce identical bytes.
///
/// # Parameters
/// - `matrix`: Normalized tap matrix
/// - `src`: Source image
/// - `x0`: First source column of the window; the whole window fits in the row
/// - `y0`: First source row of the window, wrapping past the bottom edge
/// - `_ctx`: Unused, the linear filter carries no state
/// - `dst`: Output pixel
#[target_feature(enable = "avx2")]
pub(super) unsafe fn apply_core_linear4(
    matrix: &StaticMatrix,
    src: &SourceImage,
    x0: usize,
    y0: usize,
    _ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    let size = matrix.size();
    let height = src.height().get();

    let mut acc = _mm_setzero_ps();
    let mut sy = y0;
    for ky in 0..size {
        let window = &src.row(sy)[x0 * 4..(x0 + size) * 4];
        let taps = matrix.row(ky);
        // For performance reasons, check the array bounds once at the start of the loop.
        assert!(window.len() >= taps.len() * 4);

        let ptr = window.as_ptr();
        for (kx, &tap) in taps.iter().enumerate() {
            let bytes = (ptr.add(kx * 4) as *const i32).read_unaligned();
            let pixel = _mm_cvtepi32_ps(_mm_cvtepu8_epi32(_mm_cvtsi32_si128(bytes)));
            acc = _mm_add_ps(acc, _mm_mul_ps(_mm_set1_ps(tap), pixel));
        }
        sy += 1;
        if sy == height {
            sy = 0;
        }
    }

    let mut lanes = [0f32; 4];
    _mm_storeu_ps(lanes.as_mut_ptr(), acc);
    for (out, v) in dst[..4].iter_mut().zip(lanes) {
        *out = round_to_u8(v);
    }
}
