
use std::num::NonZeroUsize;

use anyhow::{Result, bail};

use crate::util::try_alloc;

/// Byte layout of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb24 = 0,
    Bgr24 = 1,
    /// RGB with an unused fourth byte.
    Rgbx32 = 2,
    Bgrx32 = 3,
    Rgba32 = 4,
    Bgra32 = 5,
    Grayscale = 6,
    GrayAlpha = 7,
    /// Opaque bytes of a caller-chosen size.
    Any = 8,
}

impl TryFrom<i64> for PixelFormat {
    type Error = anyhow::Error;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            0 => Self::Rgb24,
            1 => Self::Bgr24,
            2 => Self::Rgbx32,
            3 => Self::Bgrx32,
            4 => Self::Rgba32,
            5 => Self::Bgra32,
            6 => Self::Grayscale,
            7 => Self::GrayAlpha,
            8 => Self::Any,
            _ => bail!("Invalid value for 'format', must be 0-8, got {val}."),
        })
    }
}

impl PixelFormat {
    /// Size of one pixel, or `None` for [`PixelFormat::Any`].
    #[must_use]
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Grayscale => Some(1),
            Self::GrayAlpha => Some(2),
            Self::Rgb24 | Self::Bgr24 => Some(3),
            Self::Rgbx32 | Self::Bgrx32 | Self::Rgba32 | Self::Bgra32 => Some(4),
            Self::Any => None,
        }
    }
}

/// An owned raster image.
///
/// Rows are `bytes_per_line` bytes apart, which is at least
/// `width * bytes_per_pixel`, and the buffer holds exactly `height` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: NonZeroUsize,
    height: NonZeroUsize,
    format: PixelFormat,
    bytes_per_pixel: usize,
    bytes_per_line: NonZeroUsize,
    data: Vec<u8>,
}

fn dimension(value: usize, name: &str) -> Result<NonZeroUsize> {
    let Some(value) = NonZeroUsize::new(value) else {
        bail!("Invalid value for '{name}', must be at least 1, got 0.");
    };
    Ok(value)
}

impl Image {
    /// Allocates a zeroed, tightly packed image.
    pub fn allocate(width: NonZeroUsize, height: NonZeroUsize, format: PixelFormat) -> Result<Self> {
        let Some(bpp) = format.bytes_per_pixel() else {
            bail!("Format {format:?} has no fixed pixel size, use `Image::allocate_raw`.");
        };
        Self::with_layout(width, height, format, bpp)
    }

    /// Allocates a zeroed, tightly packed image of [`PixelFormat::Any`].
    pub fn allocate_raw(width: NonZeroUsize, height: NonZeroUsize, bytes_per_pixel: usize) -> Result<Self> {
        Self::with_layout(width, height, PixelFormat::Any, bytes_per_pixel)
    }

    /// Allocates a tightly packed image with the format of `src`.
    pub(crate) fn allocate_like(src: &Image, width: usize, height: usize) -> Result<Self> {
        Self::with_layout(
            dimension(width, "width")?,
            dimension(height, "height")?,
            src.format,
            src.bytes_per_pixel,
        )
    }

    fn with_layout(
        width: NonZeroUsize,
        height: NonZeroUsize,
        format: PixelFormat,
        bytes_per_pixel: usize,
    ) -> Result<Self> {
        if !(1..=4).contains(&bytes_per_pixel) {
            bail!("Invalid value for 'bytes_per_pixel', must be 1-4, got {bytes_per_pixel}.");
        }
        let Some(line) = width.checked_mul(dimension(bytes_per_pixel, "bytes_per_pixel")?) else {
            bail!("Image width {width} overflows the row size.");
        };
        let Some(len) = line.checked_mul(height) else {
            bail!("Image of {width}x{height} overflows the buffer size.");
        };
        Ok(Self {
            width,
            height,
            format,
            bytes_per_pixel,
            bytes_per_line: line,
            data: try_alloc(len.get())?,
        })
    }

    /// Wraps an existing pixel buffer.
    ///
    /// # Parameters
    /// - `data`: Exactly `height * bytes_per_line` bytes
    /// - `width`: Width of the image in pixels
    /// - `height`: Height of the image in pixels
    /// - `format`: Pixel layout; must agree with `bytes_per_pixel` unless it is [`PixelFormat::Any`]
    /// - `bytes_per_pixel`: Bytes per pixel, 1 to 4
    /// - `bytes_per_line`: Row stride, at least `width * bytes_per_pixel`
    pub fn from_raw(
        data: Vec<u8>,
        width: NonZeroUsize,
        height: NonZeroUsize,
        format: PixelFormat,
        bytes_per_pixel: usize,
        bytes_per_line: NonZeroUsize,
    ) -> Result<Self> {
        if !(1..=4).contains(&bytes_per_pixel) {
            bail!("Invalid value for 'bytes_per_pixel', must be 1-4, got {bytes_per_pixel}.");
        }
        match format.bytes_per_pixel() {
            Some(expected) if expected != bytes_per_pixel => {
                bail!("Format {format:?} has {expected} bytes per pixel, got {bytes_per_pixel}.");
            }
            _ => (),
        }
        if bytes_per_line.get() < width.get() * bytes_per_pixel {
            bail!(
                "Row stride of {bytes_per_line} bytes is shorter than a {width}-pixel row of {} bytes.",
                width.get() * bytes_per_pixel
            );
        }
        let expected_len = height.get() * bytes_per_line.get();
        if data.len() != expected_len {
            bail!(
                "Image buffer holds {} bytes, but {height} rows of {bytes_per_line} bytes need {expected_len}.",
                data.len()
            );
        }
        Ok(Self {
            width,
            height,
            format,
            bytes_per_pixel,
            bytes_per_line,
            data,
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
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[must_use]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    #[must_use]
    pub fn bytes_per_line(&self) -> NonZeroUsize {
        self.bytes_per_line
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixels of row `y`, without the stride padding.
    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.bytes_per_line.get();
        &self.data[start..start + self.width.get() * self.bytes_per_pixel]
    }

    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
