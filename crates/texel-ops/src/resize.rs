//! Integer scaling and resampling of pixel buffers.
//!
//! Three independent algorithms, each returning a new buffer:
//!
//! - [`enlarge`] - Integer upscale by pixel replication
//! - [`shrink`] - Integer downscale by box filtering (truncating average)
//! - [`resample`] - Arbitrary size by nearest-sample lookup
//!
//! `shrink` is the one to use for mip levels. `resample` does no area
//! averaging and aliases badly when reducing; it is meant for
//! non-critical scaling only.
//!
//! # Example
//!
//! ```rust
//! use texel_core::PixelBuffer;
//! use texel_ops::resize::{enlarge, shrink};
//!
//! let src = PixelBuffer::filled(2, 2, &[10, 20, 30]);
//! let big = enlarge(&src, 3).unwrap();
//! assert_eq!(big.dimensions(), (6, 6));
//! assert_eq!(shrink(&big, 3).unwrap(), src);
//! ```

use crate::{OpsError, OpsResult};
use texel_core::PixelBuffer;
use tracing::{debug, warn};

pub(crate) fn check_scale(scale: u32) -> OpsResult<()> {
    if scale == 0 {
        warn!("scale must be > 0");
        return Err(OpsError::InvalidParameter("scale must be > 0".into()));
    }
    Ok(())
}

/// Enlarges by an integer factor using nearest-neighbor replication.
///
/// Output is `width * scale x height * scale`; output channel `(x, y, k)`
/// is input channel `(x / scale, y / scale, k)`.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] for a zero scale or when the
/// output size overflows.
pub fn enlarge(src: &PixelBuffer, scale: u32) -> OpsResult<PixelBuffer> {
    check_scale(scale)?;
    let (width, height) = enlarged_dimensions(src, scale)?;
    debug!(width = src.width(), height = src.height(), scale, "Enlarging");

    let mut dst = PixelBuffer::new(width, height, src.bytes_per_pixel());
    if dst.is_empty() || src.is_empty() {
        return Ok(dst);
    }
    for y in 0..height {
        enlarge_row(src, scale as usize, y as usize, dst.row_mut(y));
    }
    Ok(dst)
}

/// Shrinks by an integer factor using a box filter.
///
/// Output is `width / scale x height / scale`; trailing rows and columns
/// that do not fill a whole block are dropped. Every output channel is the
/// unweighted mean of the `scale x scale` source block, truncated toward
/// zero.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] for a zero scale.
///
/// # Example
///
/// ```rust
/// use texel_core::PixelBuffer;
/// use texel_ops::resize::shrink;
///
/// let mut src = PixelBuffer::new(2, 2, 3);
/// src.set_channel(0, 0, 0, 255);
/// src.set_channel(1, 0, 0, 255);
/// src.set_channel(0, 1, 0, 255);
/// let half = shrink(&src, 2).unwrap();
/// assert_eq!(half.channel(0, 0, 0), 191); // 765 / 4, truncated
/// ```
pub fn shrink(src: &PixelBuffer, scale: u32) -> OpsResult<PixelBuffer> {
    check_scale(scale)?;
    let (width, height) = (src.width() / scale, src.height() / scale);
    debug!(width = src.width(), height = src.height(), scale, "Shrinking");

    let mut dst = PixelBuffer::new(width, height, src.bytes_per_pixel());
    if dst.is_empty() {
        return Ok(dst);
    }
    for y in 0..height {
        shrink_row(src, scale as usize, y as usize, dst.row_mut(y));
    }
    Ok(dst)
}

/// Resizes to `new_width x new_height` by nearest-sample lookup.
///
/// Destination `(x, y)` reads source
/// `(floor(x / new_width * width), floor(y / new_height * height))`.
/// When `src` is empty the destination is all zeros. Bytes per pixel is
/// kept.
pub fn resample(src: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    debug!(
        width = src.width(),
        height = src.height(),
        new_width,
        new_height,
        "Resampling"
    );
    let mut dst = PixelBuffer::new(new_width, new_height, src.bytes_per_pixel());
    if dst.is_empty() || src.is_empty() {
        return dst;
    }
    for y in 0..new_height {
        resample_row(src, new_width, new_height, y, dst.row_mut(y));
    }
    dst
}

pub(crate) fn enlarged_dimensions(src: &PixelBuffer, scale: u32) -> OpsResult<(u32, u32)> {
    src.width()
        .checked_mul(scale)
        .zip(src.height().checked_mul(scale))
        .ok_or_else(|| {
            warn!(width = src.width(), height = src.height(), scale, "enlarged size overflows");
            OpsError::InvalidParameter(format!(
                "scale {} overflows {}x{}",
                scale,
                src.width(),
                src.height()
            ))
        })
}

/// Fills output row `y` of an enlarged image. `out` holds exactly the row's pixel bytes.
pub(crate) fn enlarge_row(src: &PixelBuffer, scale: usize, y: usize, out: &mut [u8]) {
    let bpp = src.bytes_per_pixel();
    let src_row = src.row((y / scale) as u32);
    for (x, px) in out.chunks_exact_mut(bpp).enumerate() {
        let s = (x / scale) * bpp;
        px.copy_from_slice(&src_row[s..s + bpp]);
    }
}

pub(crate) fn shrink_row(src: &PixelBuffer, scale: usize, y: usize, out: &mut [u8]) {
    let bpp = src.bytes_per_pixel();
    let area = (scale * scale) as u64;
    for (x, px) in out.chunks_exact_mut(bpp).enumerate() {
        for (k, value) in px.iter_mut().enumerate() {
            let mut sum = 0u64;
            for dy in 0..scale {
                let row = src.row((y * scale + dy) as u32);
                for dx in 0..scale {
                    sum += u64::from(row[(x * scale + dx) * bpp + k]);
                }
            }
            *value = (sum / area) as u8;
        }
    }
}

pub(crate) fn resample_row(src: &PixelBuffer, new_width: u32, new_height: u32, y: u32, out: &mut [u8]) {
    let bpp = src.bytes_per_pixel();
    let sy = (f64::from(y) / f64::from(new_height) * f64::from(src.height())) as u32;
    let src_row = src.row(sy);
    for (x, px) in out.chunks_exact_mut(bpp).enumerate() {
        let sx = (x as f64 / f64::from(new_width) * f64::from(src.width())) as usize;
        px.copy_from_slice(&src_row[sx * bpp..(sx + 1) * bpp]);
    }
}
