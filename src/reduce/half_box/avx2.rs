#![allow(clippy::undocumented_unsafe_blocks)]

use std::arch::x86_64::*;

use super::rust::reduce_row_from;
use crate::filter::{FilterContext, Linear};

/// Averages 2x2 blocks of 4-byte pixels as `(a + b + c + d + 2) >> 2`.
///
/// # Parameters
/// - `dst`: Output row
/// - `row0`: Upper source row
/// - `row1`: Lower source row
/// - `ctx`: Scan state, passed on to the scalar tail
#[target_feature(enable = "avx2")]
pub(super) unsafe fn reduce_row_linear4(
    dst: &mut [u8],
    row0: &[u8],
    row1: &[u8],
    ctx: &mut FilterContext,
) {
    let dst_width = dst.len() / 4;
    let src_width = row0.len() / 4;
    // For performance reasons, check the array bounds once at the start of the loop.
    assert!(row1.len() >= row0.len());

    let rounding = _mm256_set1_epi16(2);
    let mut x = 0;

    // 4 output pixels from 8 source pixels of each row
    while x + 4 <= dst_width && 2 * x + 8 <= src_width {
        let top = row0.as_ptr().add(x * 8);
        let bottom = row1.as_ptr().add(x * 8);

        let lo = _mm256_add_epi16(
            _mm256_cvtepu8_epi16(_mm_loadu_si128(top as *const __m128i)),
            _mm256_cvtepu8_epi16(_mm_loadu_si128(bottom as *const __m128i)),
        );
        let hi = _mm256_add_epi16(
            _mm256_cvtepu8_epi16(_mm_loadu_si128(top.add(16) as *const __m128i)),
            _mm256_cvtepu8_epi16(_mm_loadu_si128(bottom.add(16) as *const __m128i)),
        );

        // Each 64-bit lane holds one pixel; add even pixels to odd ones.
        let lo = _mm256_add_epi16(
            _mm256_permute4x64_epi64::<0b10_00_10_00>(lo),
            _mm256_permute4x64_epi64::<0b11_01_11_01>(lo),
        );
        let hi = _mm256_add_epi16(
            _mm256_permute4x64_epi64::<0b10_00_10_00>(hi),
            _mm256_permute4x64_epi64::<0b11_01_11_01>(hi),
        );

        let sums = _mm256_permute2x128_si256::<0x20>(lo, hi);
        let avg = _mm256_srli_epi16::<2>(_mm256_add_epi16(sums, rounding));
        let packed = _mm_packus_epi16(
            _mm256_castsi256_si128(avg),
            _mm256_extracti128_si256::<1>(avg),
        );
        _mm_storeu_si128(dst.as_mut_ptr().add(x * 4) as *mut __m128i, packed);
        x += 4;
    }

    reduce_row_from::<Linear<4>>(x, dst, row0, row1, ctx);
}
