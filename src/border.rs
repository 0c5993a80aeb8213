
use std::num::NonZeroUsize;

use anyhow::{Result, bail};

const ALPHA: usize = 3;

/// Copies the RGB of opaque pixels into their fully transparent neighbors.
///
/// A single scan spreads color one pixel to the right from the last opaque
/// pixel, one pixel to the left into a transparent run that started right
/// before an opaque pixel, and one row up or down between vertically adjacent
/// pixels. Alpha is never changed, so the image looks the same; only filters
/// that later blend transparent texels see the difference.
///
/// Images that are not 4 bytes per pixel are left untouched.
///
/// # Parameters
/// - `data`: Pixel rows, each `stride` bytes apart
/// - `width`: Width of the image in pixels
/// - `height`: Height of the image in pixels
/// - `bytes_per_pixel`: Bytes per pixel; only 4 is processed
/// - `stride`: Bytes between the starts of consecutive rows
pub fn propagate_alpha_border(
    data: &mut [u8],
    width: NonZeroUsize,
    height: NonZeroUsize,
    bytes_per_pixel: usize,
    stride: NonZeroUsize,
) -> Result<()> {
    if bytes_per_pixel != 4 {
        return Ok(());
    }
    let row_len = width.get() * 4;
    let stride = stride.get();
    if stride < row_len {
        bail!("Row stride of {stride} bytes is shorter than a {width}-pixel row of {row_len} bytes.");
    }
    let required = (height.get() - 1) * stride + row_len;
    if data.len() < required {
        bail!(
            "Image buffer holds {} bytes, but a {width}x{height} image needs {required}.",
            data.len()
        );
    }

    let (first, _) = data.split_at_mut(row_len);
    propagate_row(first, None);
    for y in 1..height.get() {
        let (before, current) = data.split_at_mut(y * stride);
        let above = &mut before[(y - 1) * stride..(y - 1) * stride + row_len];
        propagate_row(&mut current[..row_len], Some(above));
    }
    Ok(())
}

fn rgb(px: &[u8]) -> [u8; 3] {
    [px[0], px[1], px[2]]
}

fn propagate_row(row: &mut [u8], mut above: Option<&mut [u8]>) {
    let mut reference: Option<[u8; 3]> = None;
    let mut backtrack = false;

    for x in (0..row.len()).step_by(4) {
        if row[x + ALPHA] != 0 {
            let color = rgb(&row[x..]);
            reference = Some(color);
            if backtrack {
                row[x - 4..x - 1].copy_from_slice(&color);
                backtrack = false;
            }
            if let Some(above) = above.as_deref_mut() {
                if above[x + ALPHA] == 0 {
                    above[x..x + 3].copy_from_slice(&color);
                }
            }
            continue;
        }

        let from_above = above
            .as_deref()
            .filter(|above| above[x + ALPHA] != 0)
            .map(|above| rgb(&above[x..]));
        if let Some(color) = reference.take().or(from_above) {
            row[x..x + 3].copy_from_slice(&color);
            backtrack = false;
        } else {
            backtrack = true;
        }
    }
}
