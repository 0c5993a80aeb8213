//! Resize drivers: integer divisor, arbitrary size, and 2x2 box.
//!
//! All three share one dispatch table keyed by filter kind and bytes per
//! pixel, resolved once per call before any output is written.

pub mod arbitrary;
pub mod divisor;
pub mod half_box;

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

use anyhow::{Result, bail};

use crate::{
    filter::{
        FilterContext,
        Linear,
        LinearAlphaNorm,
        Normal,
        PixelFilter,
        Plant,
        Srgb,
        SrgbAlphaNorm,
        Water,
    },
    image::Image,
    kernel::{AxisTaps, StaticMatrix},
    params::{FilterKind, ResizeOptions},
    util::half_box_dimension,
};

/// Borrowed view of a source image with an arbitrary row stride.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    data: &'a [u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    bpp: usize,
    stride: usize,
}

impl<'a> SourceImage<'a> {
    /// # Parameters
    /// - `data`: Pixel rows, each `stride` bytes apart
    /// - `width`: Width of the image in pixels
    /// - `height`: Height of the image in pixels
    /// - `bpp`: Bytes per pixel, 1 to 4
    /// - `stride`: Bytes between the starts of consecutive rows
    pub fn new(
        data: &'a [u8],
        width: NonZeroUsize,
        height: NonZeroUsize,
        bpp: usize,
        stride: NonZeroUsize,
    ) -> Result<Self> {
        if !(1..=4).contains(&bpp) {
            bail!("Invalid value for 'bytes_per_pixel', must be 1-4, got {bpp}.");
        }
        let row_len = width.get() * bpp;
        if stride.get() < row_len {
            bail!(
                "Row stride of {} bytes is shorter than a {}-pixel row of {row_len} bytes.",
                stride,
                width
            );
        }
        let required = (height.get() - 1) * stride.get() + row_len;
        if data.len() < required {
            bail!(
                "Source buffer holds {} bytes, but a {}x{} image needs {required}.",
                data.len(),
                width,
                height
            );
        }
        Ok(Self {
            data,
            width,
            height,
            bpp,
            stride: stride.get(),
        })
    }

    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn bpp(&self) -> usize {
        self.bpp
    }

    /// Pixels of row `y`, without the stride padding.
    #[must_use]
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width.get() * self.bpp]
    }
}

/// Applies a static matrix to the window whose top-left source pixel is
/// `(x0, y0)`, both already inside the image.
pub type StaticFn = fn(&StaticMatrix, &SourceImage, usize, usize, &mut FilterContext, &mut [u8]);

/// Applies one output pixel's X and Y taps and normalizes by their realized sum.
pub type DynamicFn = fn(&AxisTaps, &AxisTaps, &SourceImage, &mut FilterContext, &mut [u8]);

/// Reduces one output row from two source rows with a 2x2 box.
pub type HalfBoxFn = fn(&mut [u8], &[u8], &[u8], &mut FilterContext);

/// Kernel-application routines for one (filter kind, bytes per pixel) pair.
#[derive(Clone, Copy)]
pub struct KernelSet {
    /// Static matrix with toroidal wrap on both axes.
    pub stat: StaticFn,
    /// Static matrix whose X support is known to lie inside the row.
    pub stat_core: StaticFn,
    /// Per-pixel taps, wrapping indices that run past the edge.
    pub dynamic: DynamicFn,
    /// Per-pixel taps fully inside the image.
    pub dynamic_core: DynamicFn,
    pub half_box: HalfBoxFn,
}

fn kernel_set<F: PixelFilter>() -> KernelSet {
    KernelSet {
        stat: divisor::apply::<F>,
        stat_core: divisor::apply_core::<F>,
        dynamic: arbitrary::apply::<F>,
        dynamic_core: arbitrary::apply_core::<F>,
        half_box: half_box::reduce_row::<F>,
    }
}

/// Resolves the kernel routines for `filter` on `bpp`-byte pixels.
///
/// Alpha-normalized kinds fall back to their plain counterparts on formats
/// without an alpha channel.
pub fn select_kernels(filter: FilterKind, bpp: usize) -> Result<KernelSet> {
    use FilterKind as K;

    Ok(match (filter, bpp) {
        (K::Linear | K::LinearAlphaNorm, 1) => kernel_set::<Linear<1>>(),
        (K::Linear, 2) => kernel_set::<Linear<2>>(),
        (K::Linear | K::LinearAlphaNorm, 3) => kernel_set::<Linear<3>>(),
        (K::Linear, 4) => KernelSet {
            stat_core: divisor::linear4_core(),
            half_box: half_box::linear4_row(),
            ..kernel_set::<Linear<4>>()
        },
        (K::LinearAlphaNorm, 2) => kernel_set::<LinearAlphaNorm<2>>(),
        (K::LinearAlphaNorm, 4) => kernel_set::<LinearAlphaNorm<4>>(),
        (K::Srgb | K::SrgbAlphaNorm, 1) => kernel_set::<Srgb<1>>(),
        (K::Srgb, 2) => kernel_set::<Srgb<2>>(),
        (K::Srgb | K::SrgbAlphaNorm, 3) => kernel_set::<Srgb<3>>(),
        (K::Srgb, 4) => kernel_set::<Srgb<4>>(),
        (K::SrgbAlphaNorm, 2) => kernel_set::<SrgbAlphaNorm<2>>(),
        (K::SrgbAlphaNorm, 4) => kernel_set::<SrgbAlphaNorm<4>>(),
        (K::NormalMap | K::NormalMapAlphaNorm, 3) => kernel_set::<Normal<3, false, false>>(),
        (K::NormalMap, 4) => kernel_set::<Normal<4, false, false>>(),
        (K::NormalMapAlphaNorm, 4) => kernel_set::<Normal<4, false, true>>(),
        (K::NormalMapSustain | K::NormalMapSustainAlphaNorm, 3) => {
            kernel_set::<Normal<3, true, false>>()
        }
        (K::NormalMapSustain, 4) => kernel_set::<Normal<4, true, false>>(),
        (K::NormalMapSustainAlphaNorm, 4) => kernel_set::<Normal<4, true, true>>(),
        (K::WaterMap, 3) => kernel_set::<Water<3>>(),
        (K::WaterMap, 4) => kernel_set::<Water<4>>(),
        (K::PlantMap, 4) => kernel_set::<Plant>(),
        _ => bail!("Filter {filter:?} is not supported for {bpp} bytes per pixel."),
    })
}

/// Rejects specialty filters on sources that are not a power of two in size.
pub(crate) fn check_pow2(filter: FilterKind, width: NonZeroUsize, height: NonZeroUsize) -> Result<()> {
    if filter.requires_pow2() && !(width.is_power_of_two() && height.is_power_of_two()) {
        bail!("Filter {filter:?} requires power of two dimensions, got {width}x{height}.");
    }
    Ok(())
}

/// Checks that a tightly packed destination of the given size fits in `len` bytes.
pub(crate) fn check_destination(len: usize, width: usize, height: usize, bpp: usize) -> Result<()> {
    let required = width * height * bpp;
    if len < required {
        bail!("Destination buffer holds {len} bytes, but a {width}x{height} image needs {required}.");
    }
    Ok(())
}

/// Reduces both axes by an integer divisor, wrapping the kernel around the
/// image edges.
///
/// The output is `ceil(width / divisor)` by `ceil(height / divisor)` pixels,
/// written tightly packed to `dst`.
///
/// # Parameters
/// - `dst`: Destination buffer, at least `new_width * new_height * bytes_per_pixel` bytes
/// - `src`: Source image rows
/// - `width`: Width of the source image in pixels
/// - `height`: Height of the source image in pixels
/// - `bytes_per_pixel`: Bytes per pixel, 1 to 4
/// - `src_stride`: Bytes between the starts of consecutive source rows
/// - `divisor`: Reduction factor applied to both axes
/// - `options`: Filter kind and kernel shape
pub fn reduce_by_divisor(
    dst: &mut [u8],
    src: &[u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    bytes_per_pixel: usize,
    src_stride: NonZeroUsize,
    divisor: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<()> {
    options.validate()?;
    let src = SourceImage::new(src, width, height, bytes_per_pixel, src_stride)?;
    divisor::reduce(dst, &src, divisor, options)
}

/// Reduces the image to an arbitrary smaller size.
///
/// Taps are rebuilt for every output pixel and normalized by the sum of the
/// taps actually applied. Upsampling on either axis is rejected.
///
/// # Parameters
/// - `dst`: Destination buffer, at least `new_width * new_height * bytes_per_pixel` bytes
/// - `src`: Source image rows
/// - `width`: Width of the source image in pixels
/// - `height`: Height of the source image in pixels
/// - `bytes_per_pixel`: Bytes per pixel, 1 to 4
/// - `src_stride`: Bytes between the starts of consecutive source rows
/// - `new_width`: Width of the output, no larger than `width`
/// - `new_height`: Height of the output, no larger than `height`
/// - `options`: Filter kind, kernel shape and edge policy
pub fn reduce_to_size(
    dst: &mut [u8],
    src: &[u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    bytes_per_pixel: usize,
    src_stride: NonZeroUsize,
    new_width: NonZeroUsize,
    new_height: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<()> {
    options.validate()?;
    let src = SourceImage::new(src, width, height, bytes_per_pixel, src_stride)?;
    arbitrary::reduce(dst, &src, new_width, new_height, options)
}

/// Halves the image with an unweighted 2x2 box, rounding odd sizes up.
///
/// # Parameters
/// - `dst`: Destination buffer, at least `ceil(width / 2) * ceil(height / 2) * bytes_per_pixel` bytes
/// - `src`: Source image rows
/// - `width`: Width of the source image in pixels
/// - `height`: Height of the source image in pixels
/// - `bytes_per_pixel`: Bytes per pixel, 1 to 4
/// - `src_stride`: Bytes between the starts of consecutive source rows
/// - `options`: Filter kind
pub fn reduce_half_box(
    dst: &mut [u8],
    src: &[u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    bytes_per_pixel: usize,
    src_stride: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<()> {
    options.validate()?;
    let src = SourceImage::new(src, width, height, bytes_per_pixel, src_stride)?;
    let new_width = half_box_dimension(width.get());
    let new_height = half_box_dimension(height.get());
    half_box::reduce(dst, &src, new_width, new_height, options)
}

fn source_view(image: &Image) -> Result<SourceImage<'_>> {
    SourceImage::new(
        image.data(),
        image.width(),
        image.height(),
        image.bytes_per_pixel(),
        image.bytes_per_line(),
    )
}

/// [`reduce_by_divisor`] into a newly allocated image of the same format.
pub fn reduce_image_by_divisor(
    src: &Image,
    divisor: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<Image> {
    options.validate()?;
    let view = source_view(src)?;
    let mut dst = Image::allocate_like(
        src,
        src.width().get().div_ceil(divisor.get()),
        src.height().get().div_ceil(divisor.get()),
    )?;
    divisor::reduce(dst.data_mut(), &view, divisor, options)?;
    Ok(dst)
}

/// [`reduce_to_size`] into a newly allocated image of the same format.
pub fn reduce_image_to_size(
    src: &Image,
    new_width: NonZeroUsize,
    new_height: NonZeroUsize,
    options: &ResizeOptions,
) -> Result<Image> {
    options.validate()?;
    let view = source_view(src)?;
    if new_width > src.width() || new_height > src.height() {
        bail!(
            "Cannot resize {}x{} up to {new_width}x{new_height}, only reduction is supported.",
            src.width(),
            src.height()
        );
    }
    let mut dst = Image::allocate_like(src, new_width.get(), new_height.get())?;
    arbitrary::reduce(dst.data_mut(), &view, new_width, new_height, options)?;
    Ok(dst)
}

/// [`reduce_half_box`] into a newly allocated image of the same format.
pub fn reduce_image_half_box(src: &Image, options: &ResizeOptions) -> Result<Image> {
    options.validate()?;
    let view = source_view(src)?;
    let new_width = half_box_dimension(src.width().get());
    let new_height = half_box_dimension(src.height().get());
    let mut dst = Image::allocate_like(src, new_width, new_height)?;
    half_box::reduce(dst.data_mut(), &view, new_width, new_height, options)?;
    Ok(dst)
}
