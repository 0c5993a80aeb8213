use crate::filter::{FilterContext, PixelFilter};

/// Reduces one output row. `row0` and `row1` are full source rows; the
/// output width is taken from `dst`.
pub(crate) fn reduce_row<F: PixelFilter>(
    dst: &mut [u8],
    row0: &[u8],
    row1: &[u8],
    ctx: &mut FilterContext,
) {
    reduce_row_from::<F>(0, dst, row0, row1, ctx);
}

/// [`reduce_row`] starting at output column `start`.
pub(super) fn reduce_row_from<F: PixelFilter>(
    start: usize,
    dst: &mut [u8],
    row0: &[u8],
    row1: &[u8],
    ctx: &mut FilterContext,
) {
    let last = row0.len() / F::BPP - 1;
    for (x, out) in dst.chunks_exact_mut(F::BPP).enumerate().skip(start) {
        let a = (2 * x).min(last) * F::BPP;
        let b = (2 * x + 1).min(last) * F::BPP;
        let mut filter = F::default();
        filter.add(0.25, &row0[a..]);
        filter.add(0.25, &row0[b..]);
        filter.add(0.25, &row1[a..]);
        filter.add(0.25, &row1[b..]);
        filter.store(1.0, ctx, out);
    }
}

#[cfg(test)]
pub(super) fn reduce_row_linear4(
    dst: &mut [u8],
    row0: &[u8],
    row1: &[u8],
    ctx: &mut FilterContext,
) {
    reduce_row::<crate::filter::Linear<4>>(dst, row0, row1, ctx);
}
