//! Clipped rectangular copy between buffers.
//!
//! [`copy_into`] blits `source` into `dest` at an arbitrary, possibly
//! negative, offset. Negative offsets are clipped against the opposite
//! buffer's origin before the copy rectangle is computed:
//!
//! ```text
//! dest_x < 0    =>  source_x -= dest_x,  dest_x = 0
//! dest_y < 0    =>  source_y -= dest_y,  dest_y = 0
//! source_x < 0  =>  dest_x -= source_x,  source_x = 0
//! source_y < 0  =>  dest_y -= source_y,  source_y = 0
//! ```
//!
//! # Example
//!
//! ```rust
//! use texel_core::PixelBuffer;
//! use texel_ops::composite::copy_into;
//!
//! let src = PixelBuffer::filled(4, 4, &[9, 9, 9]);
//! let mut dst = PixelBuffer::new(4, 4, 3);
//!
//! // Only the right half of src lands in the left half of dst.
//! copy_into(&mut dst, &src, -2, 0, 0, 0).unwrap();
//! assert_eq!(dst.pixel(1, 0), &[9, 9, 9]);
//! assert_eq!(dst.pixel(2, 0), &[0, 0, 0]);
//! ```

use crate::OpsResult;
use texel_core::{Error, PixelBuffer};
use tracing::{trace, warn};

/// Copy rectangle after clipping, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyRegion {
    /// Destination x origin.
    pub dest_x: usize,
    /// Destination y origin.
    pub dest_y: usize,
    /// Source x origin.
    pub source_x: usize,
    /// Source y origin.
    pub source_y: usize,
    /// Copy width.
    pub width: usize,
    /// Copy height.
    pub height: usize,
}

/// Resolves offsets against both buffers' extents.
///
/// Returns `None` when the clipped rectangle has no area.
pub fn clip_region(
    dest: (u32, u32),
    source: (u32, u32),
    dest_x: i64,
    dest_y: i64,
    source_x: i64,
    source_y: i64,
) -> Option<CopyRegion> {
    let (mut dx, mut dy, mut sx, mut sy) = (dest_x, dest_y, source_x, source_y);
    if dx < 0 {
        sx -= dx;
        dx = 0;
    }
    if dy < 0 {
        sy -= dy;
        dy = 0;
    }
    if sx < 0 {
        dx -= sx;
        sx = 0;
    }
    if sy < 0 {
        dy -= sy;
        sy = 0;
    }

    let width = (dest.0 as i64 - dx).min(source.0 as i64 - sx);
    let height = (dest.1 as i64 - dy).min(source.1 as i64 - sy);
    if width <= 0 || height <= 0 {
        return None;
    }

    Some(CopyRegion {
        dest_x: dx as usize,
        dest_y: dy as usize,
        source_x: sx as usize,
        source_y: sy as usize,
        width: width as usize,
        height: height as usize,
    })
}

/// Copies `source` into `dest` with its top-left at `(dest_x, dest_y)`,
/// starting from `(source_x, source_y)` in the source.
///
/// The copy is clipped to both buffers. A clipped rectangle with no area is
/// a silent no-op. Bytes outside the copy rectangle, including row padding,
/// are never written.
///
/// # Errors
///
/// Returns [`Error::ChannelMismatch`] (wrapped) if the buffers have
/// different bytes per pixel; `dest` is left untouched.
pub fn copy_into(
    dest: &mut PixelBuffer,
    source: &PixelBuffer,
    dest_x: i32,
    dest_y: i32,
    source_x: i32,
    source_y: i32,
) -> OpsResult<()> {
    if source.bytes_per_pixel() != dest.bytes_per_pixel() {
        warn!(
            expected = dest.bytes_per_pixel(),
            given = source.bytes_per_pixel(),
            "failed to copy image: bytes per pixel differ"
        );
        return Err(Error::channel_mismatch(dest.bytes_per_pixel(), source.bytes_per_pixel()).into());
    }

    let Some(region) = clip_region(
        dest.dimensions(),
        source.dimensions(),
        dest_x.into(),
        dest_y.into(),
        source_x.into(),
        source_y.into(),
    ) else {
        trace!(dest_x, dest_y, source_x, source_y, "copy clipped away entirely");
        return Ok(());
    };

    let bpp = dest.bytes_per_pixel();
    let (dest_pitch, src_pitch) = (dest.pitch(), source.pitch());
    let span = region.width * bpp;
    let src_data = source.data();
    let dst_data = dest.data_mut();
    for i in 0..region.height {
        let d = (region.dest_y + i) * dest_pitch + region.dest_x * bpp;
        let s = (region.source_y + i) * src_pitch + region.source_x * bpp;
        dst_data[d..d + span].copy_from_slice(&src_data[s..s + span]);
    }
    Ok(())
}
