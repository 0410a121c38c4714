//! Parallel resize operations using Rayon.
//!
//! Same algorithms as [`crate::resize`], with output rows computed on the
//! Rayon thread pool. Results are byte-identical to the serial versions.
//!
//! # Example
//!
//! ```rust
//! use texel_core::PixelBuffer;
//! use texel_ops::{parallel, resize};
//!
//! let src = PixelBuffer::filled(256, 256, &[10, 20, 30, 40]);
//! assert_eq!(parallel::shrink(&src, 4).unwrap(), resize::shrink(&src, 4).unwrap());
//! ```

use crate::resize::{check_scale, enlarge_row, enlarged_dimensions, resample_row, shrink_row};
use crate::OpsResult;
use rayon::prelude::*;
use texel_core::PixelBuffer;
use tracing::debug;

/// Runs `f(y, row)` for every row of `dst`, where `row` excludes padding.
fn for_each_row<F>(dst: &mut PixelBuffer, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync,
{
    if dst.is_empty() {
        return;
    }
    let row_bytes = dst.row_bytes();
    let pitch = dst.pitch();
    dst.data_mut()
        .par_chunks_mut(pitch)
        .enumerate()
        .for_each(|(y, row)| f(y, &mut row[..row_bytes]));
}

/// Parallel [`resize::enlarge`](crate::resize::enlarge).
pub fn enlarge(src: &PixelBuffer, scale: u32) -> OpsResult<PixelBuffer> {
    check_scale(scale)?;
    let (width, height) = enlarged_dimensions(src, scale)?;
    debug!(width = src.width(), height = src.height(), scale, "Enlarging (parallel)");

    let mut dst = PixelBuffer::new(width, height, src.bytes_per_pixel());
    if !src.is_empty() {
        for_each_row(&mut dst, |y, row| enlarge_row(src, scale as usize, y, row));
    }
    Ok(dst)
}

/// Parallel [`resize::shrink`](crate::resize::shrink).
pub fn shrink(src: &PixelBuffer, scale: u32) -> OpsResult<PixelBuffer> {
    check_scale(scale)?;
    debug!(width = src.width(), height = src.height(), scale, "Shrinking (parallel)");

    let mut dst = PixelBuffer::new(src.width() / scale, src.height() / scale, src.bytes_per_pixel());
    for_each_row(&mut dst, |y, row| shrink_row(src, scale as usize, y, row));
    Ok(dst)
}

/// Parallel [`resize::resample`](crate::resize::resample).
pub fn resample(src: &PixelBuffer, new_width: u32, new_height: u32) -> PixelBuffer {
    let mut dst = PixelBuffer::new(new_width, new_height, src.bytes_per_pixel());
    if !src.is_empty() {
        for_each_row(&mut dst, |y, row| {
            resample_row(src, new_width, new_height, y as u32, row)
        });
    }
    dst
}
