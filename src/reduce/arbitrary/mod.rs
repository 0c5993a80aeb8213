
use std::num::NonZeroUsize;

use anyhow::{Result, bail};
use log::debug;

use super::{SourceImage, check_destination, check_pow2, select_kernels};
use crate::{
    filter::{FilterContext, PixelFilter},
    kernel::{AxisTaps, GenericKernel},
    params::ResizeOptions,
};

/// Applies separable taps, wrapping source indices that run past an edge.
pub(crate) fn apply<F: PixelFilter>(
    x_taps: &AxisTaps,
    y_taps: &AxisTaps,
    src: &SourceImage,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    let width = src.width().get();
    let height = src.height().get();

    let mut filter = F::default();
    let mut sum = 0f32;
    let mut sy = y_taps.offset();
    for &wy in y_taps.weights() {
        let row = src.row(sy);
        let mut sx = x_taps.offset();
        for &wx in x_taps.weights() {
            let weight = wx * wy;
            filter.add(weight, &row[sx * F::BPP..]);
            sum += weight;
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
    filter.store(1.0 / sum, ctx, dst);
}

/// Applies separable taps that lie entirely inside the image.
pub(crate) fn apply_core<F: PixelFilter>(
    x_taps: &AxisTaps,
    y_taps: &AxisTaps,
    src: &SourceImage,
    ctx: &mut FilterContext,
    dst: &mut [u8],
) {
    let x0 = x_taps.offset();
    let x1 = x0 + x_taps.weights().len();

    let mut filter = F::default();
    let mut sum = 0f32;
    for (sy, &wy) in (y_taps.offset()..).zip(y_taps.weights()) {
        let window = &src.row(sy)[x0 * F::BPP..x1 * F::BPP];
        for (px, &wx) in window.chunks_exact(F::BPP).zip(x_taps.weights()) {
            let weight = wx * wy;
            filter.add(weight, px);
            sum += weight;
        }
    }
    filter.store(1.0 / sum, ctx, dst);
}

/// Reduces `src` to `new_width` by `new_height` into the tightly packed `dst`.
pub(crate) fn reduce(
    dst: &mut [u8],
    src: &SourceImage,
    new_width: NonZeroUsize,
    new_height: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<()> {
    if new_width > src.width() || new_height > src.height() {
        bail!(
            "Cannot resize {}x{} up to {new_width}x{new_height}, only reduction is supported.",
            src.width(),
            src.height()
        );
    }
    let bpp = src.bpp();
    let kernels = select_kernels(options.filter, bpp)?;
    check_pow2(options.filter, src.width(), src.height())?;
    check_destination(dst.len(), new_width.get(), new_height.get(), bpp)?;

    let alpha = options.kaiser_alpha();
    let x_kernel = GenericKernel::new(src.width(), new_width, options.hopcount, alpha);
    let y_kernel = GenericKernel::new(src.height(), new_height, options.hopcount, alpha);
    let mut x_taps = AxisTaps::with_capacity(x_kernel.max_taps());
    let mut y_taps = AxisTaps::with_capacity(y_kernel.max_taps());
    debug!(
        "reduce to size: {}x{} -> {new_width}x{new_height}, up to {}x{} taps, {:?} edges",
        src.width(),
        src.height(),
        x_kernel.max_taps(),
        y_kernel.max_taps(),
        options.edge
    );

    let width = src.width().get();
    let height = src.height().get();
    let mut ctx = FilterContext::new(options, new_width.get(), new_height.get());
    for (y, dst_row) in dst
        .chunks_exact_mut(new_width.get() * bpp)
        .take(new_height.get())
        .enumerate()
    {
        y_kernel.build(y, options.edge, &mut y_taps);
        let rows_inside = y_taps.is_contiguous(height);
        for (x, out) in dst_row.chunks_exact_mut(bpp).enumerate() {
            x_kernel.build(x, options.edge, &mut x_taps);
            let apply = if rows_inside && x_taps.is_contiguous(width) {
                kernels.dynamic_core
            } else {
                kernels.dynamic
            };
            apply(&x_taps, &y_taps, src, &mut ctx, out);
        }
    }
    Ok(())
}
