//! Decoder output normalization.
//!
//! Converts decoder-native channel layouts into a [`PixelBuffer`] with 3 or
//! 4 bytes per pixel and an aligned pitch.
//!
//! | Source channels | `masked_alpha = false`        | `masked_alpha = true`        |
//! |-----------------|-------------------------------|------------------------------|
//! | 1               | RGBA, `R = G = B = v`, `A = 255` | RGBA, `R = G = B = 255`, `A = v` |
//! | 3               | RGB, copied                   | error                        |
//! | 4               | RGBA, copied                  | error                        |
//! | other           | error                         | error                        |
//!
//! # Example
//!
//! ```rust
//! use texel_core::DecodedImage;
//! use texel_ops::normalize::{normalize, NormalizeOptions};
//!
//! let gray = DecodedImage::packed(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
//! let rgba = normalize(&gray, NormalizeOptions::default()).unwrap();
//! assert_eq!(rgba.pixel(0, 0), &[10, 10, 10, 255]);
//!
//! let mask = normalize(&gray, NormalizeOptions::new().masked_alpha(true)).unwrap();
//! assert_eq!(mask.pixel(0, 0), &[255, 255, 255, 10]);
//! ```

use crate::{OpsError, OpsResult};
use texel_core::{DecodedImage, ImageSource, PixelBuffer};
use tracing::{debug, warn};

/// Flags controlling [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalizeOptions {
    /// Reject sources that are not square with a power-of-two side.
    pub check_square_power_of_two: bool,
    /// Treat a single-channel source as an alpha mask instead of grayscale.
    pub masked_alpha: bool,
}

impl NormalizeOptions {
    /// Options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`check_square_power_of_two`](Self::check_square_power_of_two).
    pub fn check_square_power_of_two(mut self, on: bool) -> Self {
        self.check_square_power_of_two = on;
        self
    }

    /// Sets [`masked_alpha`](Self::masked_alpha).
    pub fn masked_alpha(mut self, on: bool) -> Self {
        self.masked_alpha = on;
        self
    }
}

fn validate(src: &DecodedImage) -> OpsResult<()> {
    src.validate().inspect_err(|e| {
        warn!(width = src.width, height = src.height, error = %e, "invalid decoded image");
    })?;
    Ok(())
}

fn check_size(src: &DecodedImage, required: bool) -> OpsResult<()> {
    if required && !src.is_square_power_of_two() {
        warn!(
            width = src.width,
            height = src.height,
            "unsupported image size (must be a square with side length 2^n pixels)"
        );
        return Err(OpsError::NotSquarePowerOfTwo {
            width: src.width,
            height: src.height,
        });
    }
    Ok(())
}

/// Normalizes decoded rows into an RGB or RGBA buffer.
///
/// Each side's row stride is respected; the result always uses the aligned
/// pitch.
///
/// # Errors
///
/// - [`OpsError::NotSquarePowerOfTwo`] when the size check is on and fails
/// - [`OpsError::MaskUnsupported`] for `masked_alpha` on a 3- or 4-channel source
/// - [`OpsError::UnsupportedChannels`] for any channel count besides 1, 3, 4
/// - [`OpsError::Core`] if the decoded rows do not fit their declared shape
pub fn normalize(src: &DecodedImage, options: NormalizeOptions) -> OpsResult<PixelBuffer> {
    validate(src)?;
    check_size(src, options.check_square_power_of_two)?;

    debug!(
        width = src.width,
        height = src.height,
        channels = src.bytes_per_pixel,
        masked = options.masked_alpha,
        "Normalizing decoded image"
    );

    match src.bytes_per_pixel {
        1 => Ok(expand_single_channel(src, options.masked_alpha)),
        3 | 4 => {
            if options.masked_alpha {
                warn!(
                    channels = src.bytes_per_pixel,
                    "unsupported mask format (only single-channel images can be masks)"
                );
                return Err(OpsError::MaskUnsupported {
                    channels: src.bytes_per_pixel,
                });
            }
            Ok(copy_rows(src))
        }
        n => {
            warn!(channels = n, "unsupported format (only 1, 3 and 4 channel images are supported)");
            Err(OpsError::UnsupportedChannels(n))
        }
    }
}

/// Builds an RGBA mask from one channel of a multi-channel source.
///
/// RGB are forced to 255 and alpha is taken from `channel` of every source
/// pixel. This is how bitmap sources without a native alpha plane are
/// turned into masks.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] if `channel` is not below the
/// source channel count, plus the size check errors of [`normalize`].
pub fn mask_from_channel(
    src: &DecodedImage,
    channel: usize,
    check_square_power_of_two: bool,
) -> OpsResult<PixelBuffer> {
    validate(src)?;
    check_size(src, check_square_power_of_two)?;
    if channel >= src.bytes_per_pixel {
        warn!(channel, channels = src.bytes_per_pixel, "mask channel out of range");
        return Err(OpsError::InvalidParameter(format!(
            "mask channel {} out of range for {}-channel image",
            channel, src.bytes_per_pixel
        )));
    }

    let mut dst = PixelBuffer::filled(src.width, src.height, &[255, 255, 255, 255]);
    for y in 0..src.height {
        let row = src.row(y);
        for (x, px) in row.chunks_exact(src.bytes_per_pixel).enumerate() {
            dst.set_channel(x as u32, y, 3, px[channel]);
        }
    }
    Ok(dst)
}

/// Decodes `source` and normalizes the result.
///
/// A decoder failure is a resource error: it is logged and returned as
/// [`OpsError::Core`] wrapping [`texel_core::Error::Decode`].
pub fn load<S: ImageSource + ?Sized>(source: &mut S, options: NormalizeOptions) -> OpsResult<PixelBuffer> {
    let decoded = source.decode().map_err(|e| {
        warn!(source = source.name(), error = %e, "failed to load image");
        OpsError::from(e)
    })?;
    normalize(&decoded, options).inspect_err(|e| {
        warn!(source = source.name(), error = %e, "failed to normalize image");
    })
}

fn expand_single_channel(src: &DecodedImage, masked: bool) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height, 4);
    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);
        for (&v, px) in src_row.iter().zip(dst_row.chunks_exact_mut(4)) {
            let rgba = if masked { [255, 255, 255, v] } else { [v, v, v, 255] };
            px.copy_from_slice(&rgba);
        }
    }
    dst
}

fn copy_rows(src: &DecodedImage) -> PixelBuffer {
    let mut dst = PixelBuffer::new(src.width, src.height, src.bytes_per_pixel);
    for y in 0..src.height {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use texel_core::Error;

    fn gray_2x2() -> DecodedImage {
        DecodedImage::packed(2, 2, 1, vec![10, 20, 30, 40]).unwrap()
    }

    #[test]
    fn test_grayscale_expands_to_rgba() {
        let buf = normalize(&gray_2x2(), NormalizeOptions::default()).unwrap();
        assert_eq!(buf.bytes_per_pixel(), 4);
        assert_eq!(buf.pixel(0, 0), &[10, 10, 10, 255]);
        assert_eq!(buf.pixel(1, 1), &[40, 40, 40, 255]);
    }

    #[test]
    fn test_mask_goes_to_alpha() {
        let buf = normalize(&gray_2x2(), NormalizeOptions::new().masked_alpha(true)).unwrap();
        assert_eq!(buf.pixel(0, 0), &[255, 255, 255, 10]);
        assert_eq!(buf.pixel(1, 0), &[255, 255, 255, 20]);
    }

    #[test]
    fn test_rgb_respects_both_strides() {
        // 3x2 RGB, source stride 11 (two junk bytes per row)
        let mut pixels = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                pixels.extend_from_slice(&[x, y, 100]);
            }
            pixels.extend_from_slice(&[0xEE, 0xEE]);
        }
        let src = DecodedImage::new(3, 2, 3, 11, pixels).unwrap();
        let buf = normalize(&src, NormalizeOptions::default()).unwrap();
        assert_eq!(buf.bytes_per_pixel(), 3);
        assert_eq!(buf.pitch(), 12);
        assert_eq!(buf.pixel(2, 1), &[2, 1, 100]);
        assert_eq!(buf.data()[9..12], [0, 0, 0]);
    }

    #[test]
    fn test_rgba_copies_through() {
        let src = DecodedImage::packed(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        let buf = normalize(&src, NormalizeOptions::default()).unwrap();
        assert_eq!(buf.pixel(0, 0), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_masked_multichannel_rejected() {
        let src = DecodedImage::packed(1, 1, 3, vec![1, 2, 3]).unwrap();
        let err = normalize(&src, NormalizeOptions::new().masked_alpha(true)).unwrap_err();
        assert!(matches!(err, OpsError::MaskUnsupported { channels: 3 }));
        assert!(err.is_validation_error());

        let src = DecodedImage::packed(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        let err = normalize(&src, NormalizeOptions::new().masked_alpha(true)).unwrap_err();
        assert!(matches!(err, OpsError::MaskUnsupported { channels: 4 }));
    }

    #[test]
    fn test_unsupported_channels() {
        let src = DecodedImage::packed(1, 1, 2, vec![1, 2]).unwrap();
        let err = normalize(&src, NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, OpsError::UnsupportedChannels(2)));
    }

    #[test]
    fn test_size_check() {
        let wide = DecodedImage::packed(4, 2, 1, vec![0; 8]).unwrap();
        let opts = NormalizeOptions::new().check_square_power_of_two(true);
        assert!(matches!(
            normalize(&wide, opts),
            Err(OpsError::NotSquarePowerOfTwo { width: 4, height: 2 })
        ));
        let npot = DecodedImage::packed(3, 3, 1, vec![0; 9]).unwrap();
        assert!(normalize(&npot, opts).is_err());
        assert!(normalize(&gray_2x2(), opts).is_ok());
        // Without the check, odd sizes are fine.
        assert!(normalize(&wide, NormalizeOptions::default()).is_ok());
    }

    #[test]
    fn test_mask_from_channel() {
        let src = DecodedImage::packed(2, 1, 3, vec![7, 8, 9, 70, 80, 90]).unwrap();
        let buf = mask_from_channel(&src, 0, false).unwrap();
        assert_eq!(buf.pixel(0, 0), &[255, 255, 255, 7]);
        assert_eq!(buf.pixel(1, 0), &[255, 255, 255, 70]);
        assert!(matches!(
            mask_from_channel(&src, 3, false),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_mask_from_channel_padded_rows() {
        // 2x2 RGB, stride 8 (two junk bytes per row)
        let pixels = vec![
            1, 2, 3, 4, 5, 6, 0xEE, 0xEE, //
            7, 8, 9, 10, 11, 12, 0xEE, 0xEE,
        ];
        let src = DecodedImage::new(2, 2, 3, 8, pixels).unwrap();
        let buf = mask_from_channel(&src, 2, true).unwrap();
        assert_eq!(buf.pixel(0, 0), &[255, 255, 255, 3]);
        assert_eq!(buf.pixel(1, 0), &[255, 255, 255, 6]);
        assert_eq!(buf.pixel(0, 1), &[255, 255, 255, 9]);
        assert_eq!(buf.pixel(1, 1), &[255, 255, 255, 12]);
    }

    struct MissingFile;

    impl ImageSource for MissingFile {
        fn name(&self) -> &str {
            "missing.png"
        }

        fn decode(&mut self) -> texel_core::Result<DecodedImage> {
            Err(Error::decode("missing.png", "file not found"))
        }
    }

    #[test]
    fn test_load_resource_failure() {
        let err = load(&mut MissingFile, NormalizeOptions::default()).unwrap_err();
        assert!(err.is_resource_error());
    }

    #[test]
    fn test_load_in_memory() {
        let mut src = gray_2x2();
        let buf = load(&mut src, NormalizeOptions::default()).unwrap();
        assert_eq!(buf.dimensions(), (2, 2));
    }
}
