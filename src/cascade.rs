//! Mipmap chain construction.
//!
//! Level 0 is the caller's image. Every further level halves both dimensions
//! (rounding down, never below 1) until the chain ends at 1x1. Levels of at
//! least 16x16 are filtered straight from two levels up with a combined
//! divisor; smaller levels use the 2x2 box on the previous level.


use std::num::NonZeroUsize;

use anyhow::{Result, bail};
use log::debug;
use smallvec::SmallVec;

use crate::{
    border::propagate_alpha_border,
    params::{CascadeFlags, ResizeOptions},
    reduce::{SourceImage, arbitrary, check_pow2, divisor, half_box, select_kernels},
    util::{mip_dimension, try_alloc},
};

/// Smallest level width and height that is still filtered with the Kaiser
/// kernel instead of the box.
pub const KERNEL_THRESHOLD: usize = 16;

/// How one level is produced from its source level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceMethod {
    HalfBox,
    Divisor(NonZeroUsize),
    Arbitrary,
}

/// Chooses the source level and method for `level`.
///
/// # Parameters
/// - `level`: Level being generated, at least 1
/// - `size`: Dimensions of the generated level
/// - `source_size`: Returns the dimensions of a lower level
#[must_use]
pub fn plan_level(
    level: usize,
    size: (usize, usize),
    source_size: impl Fn(usize) -> (usize, usize),
) -> (usize, ReduceMethod) {
    if size.0 < KERNEL_THRESHOLD || size.1 < KERNEL_THRESHOLD {
        return (level - 1, ReduceMethod::HalfBox);
    }

    let source = level.saturating_sub(2);
    let (src_width, src_height) = source_size(source);
    let divisor = 1usize << (level - source);
    if size.0 * divisor == src_width && size.1 * divisor == src_height {
        if let Some(divisor) = NonZeroUsize::new(divisor) {
            return (source, ReduceMethod::Divisor(divisor));
        }
    }
    (source, ReduceMethod::Arbitrary)
}

/// One generated level holding every layer back to back.
#[derive(Debug, Clone)]
struct MipLevel {
    width: NonZeroUsize,
    height: NonZeroUsize,
    data: Vec<u8>,
}

/// A chain of progressively halved images built from a borrowed base image.
#[derive(Debug)]
pub struct MipmapCascade<'a> {
    width: NonZeroUsize,
    height: NonZeroUsize,
    layer_count: usize,
    bytes_per_pixel: usize,
    bytes_per_line: NonZeroUsize,
    options: ResizeOptions,
    base: &'a [u8],
    levels: SmallVec<[MipLevel; 16]>,
}

impl MipmapCascade<'_> {
    #[must_use]
    pub fn width(&self) -> NonZeroUsize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> NonZeroUsize {
        self.height
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    #[must_use]
    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    /// Number of levels, counting the base image.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len() + 1
    }

    #[must_use]
    pub fn level_size(&self, level: usize) -> Option<(NonZeroUsize, NonZeroUsize)> {
        match level {
            0 => Some((self.width, self.height)),
            _ => self
                .levels
                .get(level - 1)
                .map(|l| (l.width, l.height)),
        }
    }

    /// Row stride of `level`; generated levels are tightly packed.
    #[must_use]
    pub fn bytes_per_line(&self, level: usize) -> Option<NonZeroUsize> {
        match level {
            0 => Some(self.bytes_per_line),
            _ => self.levels.get(level - 1).and_then(|l| {
                l.width.checked_mul(NonZeroUsize::new(self.bytes_per_pixel)?)
            }),
        }
    }

    /// All layers of `level`. Level 0 is the caller's buffer, stride included.
    #[must_use]
    pub fn level(&self, level: usize) -> Option<&[u8]> {
        match level {
            0 => Some(self.base),
            _ => self.levels.get(level - 1).map(|l| l.data.as_slice()),
        }
    }

    /// One layer of `level`.
    #[must_use]
    pub fn layer(&self, level: usize, layer: usize) -> Option<&[u8]> {
        if layer >= self.layer_count {
            return None;
        }
        if level == 0 {
            let size = self.height.get() * self.bytes_per_line.get();
            let start = layer * size;
            let end = (start + size).min(self.base.len());
            return self.base.get(start..end);
        }
        let l = self.levels.get(level - 1)?;
        let size = l.width.get() * l.height.get() * self.bytes_per_pixel;
        l.data.get(layer * size..(layer + 1) * size)
    }

    /// Releases every generated level. The base image is left alone.
    pub fn free(&mut self) {
        self.levels.clear();
    }
}

/// Builds the full mip chain of `base`.
///
/// # Parameters
/// - `base`: Caller-owned level 0, `layer_count * height` rows of `stride` bytes
/// - `width`: Width of the base image in pixels
/// - `height`: Height of one layer in pixels
/// - `layer_count`: Number of array layers stacked vertically in `base`; 0 means 1
/// - `bytes_per_pixel`: Bytes per pixel, 1 to 4
/// - `stride`: Bytes between the starts of consecutive base rows
/// - `options`: Filter kind and kernel shape used for every level
/// - `flags`: Border color propagation; ignored unless `bytes_per_pixel` is 4
pub fn build_mipmap_cascade<'a>(
    base: &'a mut [u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    layer_count: usize,
    bytes_per_pixel: usize,
    stride: NonZeroUsize,
    options: &ResizeOptions,
    flags: CascadeFlags,
) -> Result<MipmapCascade<'a>> {
    options.validate()?;
    let layer_count = layer_count.max(1);
    let Some(total_height) = height.checked_mul(NonZeroUsize::MIN.saturating_add(layer_count - 1))
    else {
        bail!("{layer_count} layers of height {height} overflow the image size.");
    };
    SourceImage::new(base, width, total_height, bytes_per_pixel, stride)?;

    let mut cascade = MipmapCascade {
        width,
        height,
        layer_count,
        bytes_per_pixel,
        bytes_per_line: stride,
        options: *options,
        base: &[],
        levels: SmallVec::new(),
    };
    if width.get() == 1 && height.get() == 1 {
        let base: &'a [u8] = base;
        cascade.base = base;
        return Ok(cascade);
    }

    select_kernels(options.filter, bytes_per_pixel)?;
    check_pow2(options.filter, width, height)?;
    let flags = if bytes_per_pixel == 4 {
        flags
    } else {
        CascadeFlags::empty()
    };

    let mut level_width = width.get();
    let mut level_height = height.get();
    while level_width > 1 || level_height > 1 {
        level_width = mip_dimension(level_width);
        level_height = mip_dimension(level_height);
        let data = try_alloc(level_width * level_height * layer_count * bytes_per_pixel)?;
        cascade.levels.push(MipLevel {
            width: NonZeroUsize::MIN.saturating_add(level_width - 1),
            height: NonZeroUsize::MIN.saturating_add(level_height - 1),
            data,
        });
    }

    if flags.contains(CascadeFlags::COLOR_BORDER_BASE) {
        propagate_alpha_border(base, width, total_height, bytes_per_pixel, stride)?;
    }
    let base: &'a [u8] = base;
    cascade.base = base;

    for layer in 0..layer_count {
        for level in 1..=cascade.levels.len() {
            build_level(&mut cascade, level, layer, flags)?;
        }
    }
    Ok(cascade)
}

fn build_level(
    cascade: &mut MipmapCascade,
    level: usize,
    layer: usize,
    flags: CascadeFlags,
) -> Result<()> {
    let bpp = cascade.bytes_per_pixel;
    let (generated, rest) = cascade.levels.split_at_mut(level - 1);
    let target = &mut rest[0];
    let size = (target.width.get(), target.height.get());

    let base_size = (cascade.width.get(), cascade.height.get());
    let (source_level, method) = plan_level(level, size, |l| {
        if l == 0 {
            base_size
        } else {
            (generated[l - 1].width.get(), generated[l - 1].height.get())
        }
    });
    debug!(
        "mip level {level}, layer {layer}: {}x{} from level {source_level} by {method:?}",
        size.0, size.1
    );

    let src = if source_level == 0 {
        let layer_size = cascade.height.get() * cascade.bytes_per_line.get();
        SourceImage::new(
            &cascade.base[layer * layer_size..],
            cascade.width,
            cascade.height,
            bpp,
            cascade.bytes_per_line,
        )?
    } else {
        let source = &generated[source_level - 1];
        let layer_size = source.width.get() * source.height.get() * bpp;
        SourceImage::new(
            &source.data[layer * layer_size..(layer + 1) * layer_size],
            source.width,
            source.height,
            bpp,
            NonZeroUsize::MIN.saturating_add(source.width.get() * bpp - 1),
        )?
    };

    let layer_size = size.0 * size.1 * bpp;
    let dst = &mut target.data[layer * layer_size..(layer + 1) * layer_size];
    match method {
        ReduceMethod::HalfBox => half_box::reduce(dst, &src, size.0, size.1, &cascade.options)?,
        ReduceMethod::Divisor(divisor) => divisor::reduce(dst, &src, divisor, &cascade.options)?,
        ReduceMethod::Arbitrary => arbitrary::reduce(
            dst,
            &src,
            target.width,
            target.height,
            &cascade.options,
        )?,
    }

    if flags.contains(CascadeFlags::COLOR_BORDER_MIPMAPS) {
        let stride = target.width.saturating_mul(NonZeroUsize::MIN.saturating_add(bpp - 1));
        propagate_alpha_border(dst, target.width, target.height, bpp, stride)?;
    }
    Ok(())
}

/// Releases the generated levels of `cascade`.
pub fn free_mipmap_cascade(cascade: &mut MipmapCascade) {
    cascade.free();
}
