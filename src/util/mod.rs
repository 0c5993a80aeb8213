pub mod math;

#[cfg(test)]
mod tests;

use anyhow::{Result, bail};

#[cfg(target_arch = "x86_64")]
cpufeatures::new!(cpuid_avx2, "avx2");

#[cfg(target_arch = "x86_64")]
pub use cpuid_avx2::get as has_avx2;

/// Rounds a filtered channel value to the nearest byte, saturating at both ends.
///
/// `NaN` maps to zero.
#[must_use]
#[inline(always)]
pub fn round_to_u8(value: f32) -> u8 {
    // `as` saturates float-to-int casts and sends NaN to zero
    (value + 0.5).clamp(0.0, 255.0) as u8
}

/// Allocates a buffer of `len` default values, reporting allocation failure as
/// an error instead of aborting the process.
pub fn try_alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    if buf.try_reserve_exact(len).is_err() {
        bail!(
            "Failed to allocate {len} elements of {} bytes.",
            size_of::<T>()
        );
    }
    buf.resize(len, T::default());
    Ok(buf)
}

/// Half of a dimension for the next mip level, never dropping below 1.
#[must_use]
pub fn mip_dimension(size: usize) -> usize {
    if size < 2 { 1 } else { size >> 1 }
}

/// Half of a dimension rounded up, as produced by the 2x2 box reduction.
#[must_use]
pub fn half_box_dimension(size: usize) -> usize {
    if size < 2 { 1 } else { (size + 1) / 2 }
}
