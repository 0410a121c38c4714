//! RGB <-> RGBA layout conversion.

use crate::OpsResult;
use texel_core::{Error, PixelBuffer};
use tracing::{debug, warn};

fn is_supported(bytes_per_pixel: usize) -> bool {
    matches!(bytes_per_pixel, 3 | 4)
}

/// Remaps every pixel to `target_bpp` bytes.
///
/// A 3-byte source gets a synthesized alpha of 255; a 4-byte source keeps
/// its alpha. Writing a 3-byte target drops alpha. Converting to the same
/// layout returns a copy.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] (wrapped) if `target_bpp` is not 3
/// or 4, or if a non-empty source is not 3 or 4 bytes per pixel.
///
/// # Example
///
/// ```rust
/// use texel_core::PixelBuffer;
/// use texel_ops::convert::convert_format;
///
/// let rgb = PixelBuffer::filled(2, 2, &[1, 2, 3]);
/// let rgba = convert_format(&rgb, 4).unwrap();
/// assert_eq!(rgba.pixel(1, 1), &[1, 2, 3, 255]);
/// assert_eq!(convert_format(&rgba, 3).unwrap(), rgb);
/// ```
pub fn convert_format(src: &PixelBuffer, target_bpp: usize) -> OpsResult<PixelBuffer> {
    if !is_supported(target_bpp) {
        warn!(target_bpp, "failed to convert image: unsupported target format");
        return Err(Error::unsupported_format(format!("{target_bpp} bytes per pixel")).into());
    }
    let mut dst = PixelBuffer::new(src.width(), src.height(), target_bpp);
    if src.pixel_count() == 0 {
        return Ok(dst);
    }
    if !is_supported(src.bytes_per_pixel()) {
        warn!(
            source_bpp = src.bytes_per_pixel(),
            "failed to convert image: unsupported source format"
        );
        return Err(Error::unsupported_format(format!(
            "{} bytes per pixel",
            src.bytes_per_pixel()
        ))
        .into());
    }

    debug!(
        width = src.width(),
        height = src.height(),
        from = src.bytes_per_pixel(),
        to = target_bpp,
        "Converting pixel layout"
    );

    let src_bpp = src.bytes_per_pixel();
    for y in 0..src.height() {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for (s, d) in src_row.chunks_exact(src_bpp).zip(dst_row.chunks_exact_mut(target_bpp)) {
            let alpha = if src_bpp == 4 { s[3] } else { 255 };
            let rgba = [s[0], s[1], s[2], alpha];
            d.copy_from_slice(&rgba[..target_bpp]);
        }
    }
    Ok(dst)
}
