use crate::{
    filter::{FilterContext, PixelFilter},
    kernel::StaticMatrix,
    reduce::SourceImage,
};

/// Applies the matrix at `(x0, y0)`, wrapping around both image edges.
pub(crate) fn apply<F: PixelFilter>(
    matrix: &StaticMatrix,
    src: &SourceImage,
    x0: usize,
    y0: usize,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    let width = src.width().get();
    let height = src.height().get();

    let mut filter = F::default();
    let mut sy = y0;
    for ky in 0..matrix.size() {
        let row = src.row(sy);
        let mut sx = x0;
        for &tap in matrix.row(ky) {
            filter.add(tap, &row[sx * F::BPP..]);
            sx += 1;
            if sx == width {
                sx = 0;
            }
        }
        sy += 1;
        if sy == height {
            sy = 0;
        }
    }
    filter.store(1.0, ctx, dst);
}

/// Applies the matrix at `(x0, y0)` where `x0 + matrix.size()` does not pass
/// the end of the row. Rows still wrap.
pub(crate) fn apply_core<F: PixelFilter>(
    matrix: &StaticMatrix,
    src: &SourceImage,
    x0: usize,
    y0: usize,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    let size = matrix.size();
    let height = src.height().get();

    let mut filter = F::default();
    let mut sy = y0;
    for ky in 0..size {
        let window = &src.row(sy)[x0 * F::BPP..(x0 + size) * F::BPP];
        for (px, &tap) in window.chunks_exact(F::BPP).zip(matrix.row(ky)) {
            filter.add(tap, px);
        }
        sy += 1;
        if sy == height {
            sy = 0;
        }
    }
    filter.store(1.0, ctx, dst);
}

#[cfg(test)]
pub(super) fn apply_core_linear4(
    matrix: &StaticMatrix,
    src: &SourceImage,
    x0: usize,
    y0: usize,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    apply_core::<crate::filter::Linear<4>>(matrix, src, x0, y0, ctx, dst);
}
