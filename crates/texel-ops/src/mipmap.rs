//! Mipmap pyramid construction.
//!
//! Each level is produced by [`shrink`]ing the previous one by 2, and is
//! handed to a [`TextureSink`] together with its index, size, layout and
//! row stride. The sink stands in for the graphics API, so the pyramid can
//! be built and checked without a GPU context.
//!
//! ```text
//! level 0: 8x8  --shrink(2)-->  level 1: 4x4  --shrink(2)-->  level 2: 2x2 ...
//! ```
//!
//! # Example
//!
//! ```rust
//! use texel_core::PixelBuffer;
//! use texel_ops::mipmap::{build_mipmaps, MipChain};
//!
//! let base = PixelBuffer::filled(4, 4, &[255, 0, 0, 255]);
//! let mut chain = MipChain::default();
//! let uploaded = build_mipmaps(&base, None, &mut chain).unwrap();
//!
//! assert_eq!(uploaded, 3);
//! let widths: Vec<u32> = chain.levels.iter().map(|l| l.width).collect();
//! assert_eq!(widths, [4, 2, 1]);
//! ```

use crate::resize::shrink;
use crate::texture::SamplerParams;
use crate::OpsResult;
use texel_core::{Error, PixelBuffer};
use tracing::{debug, trace, warn};

/// Pixel layout tag passed along with every uploaded level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UploadFormat {
    /// 3 bytes per pixel.
    Rgb,
    /// 4 bytes per pixel.
    Rgba,
}

impl UploadFormat {
    /// Maps 3 and 4 bytes per pixel to a format tag.
    ///
    /// # Errors
    ///
    /// Any other value is an [`Error::UnsupportedFormat`].
    pub fn from_bytes_per_pixel(bytes_per_pixel: usize) -> texel_core::Result<Self> {
        match bytes_per_pixel {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(Error::unsupported_format(format!(
                "{n} bytes per pixel (mip levels must be RGB or RGBA)"
            ))),
        }
    }

    /// Bytes per pixel for this format.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// One pyramid level as handed to a [`TextureSink`].
#[derive(Debug, Clone, Copy)]
pub struct MipLevel<'a> {
    /// Level index, 0 is full resolution.
    pub level: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout of `pixels`.
    pub format: UploadFormat,
    /// Bytes between row starts. Rows are not assumed to be packed.
    pub row_stride: usize,
    /// Raw bytes, `height * row_stride` long.
    pub pixels: &'a [u8],
}

impl<'a> MipLevel<'a> {
    fn new(level: u32, buffer: &'a PixelBuffer, format: UploadFormat) -> Self {
        Self {
            level,
            width: buffer.width(),
            height: buffer.height(),
            format,
            row_stride: buffer.pitch(),
            pixels: buffer.data(),
        }
    }
}

/// Receiver of sampler configuration and mip level data.
///
/// Implemented by the graphics layer; calls arrive on the thread that runs
/// the pyramid, so an implementation bound to one graphics context should
/// only be driven from that context's thread.
pub trait TextureSink {
    /// Applies sampler state before any level is uploaded.
    fn configure(&mut self, _params: &SamplerParams) {}

    /// Uploads one level.
    fn upload(&mut self, level: &MipLevel<'_>);
}

/// Owned copy of an uploaded level, as recorded by [`MipChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLevel {
    /// Level index.
    pub level: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: UploadFormat,
    /// Row stride of `pixels`.
    pub row_stride: usize,
    /// Raw bytes.
    pub pixels: Vec<u8>,
}

impl StoredLevel {
    /// Rebuilds a [`PixelBuffer`] from the recorded bytes.
    pub fn to_buffer(&self) -> texel_core::Result<PixelBuffer> {
        PixelBuffer::from_raw(
            self.width,
            self.height,
            self.format.bytes_per_pixel(),
            self.pixels.clone(),
        )
    }
}

/// In-memory sink that records everything it receives.
#[derive(Debug, Clone, Default)]
pub struct MipChain {
    /// Sampler parameters from the last [`TextureSink::configure`] call.
    pub params: Option<SamplerParams>,
    /// Uploaded levels in upload order.
    pub levels: Vec<StoredLevel>,
}

impl TextureSink for MipChain {
    fn configure(&mut self, params: &SamplerParams) {
        self.params = Some(*params);
    }

    fn upload(&mut self, level: &MipLevel<'_>) {
        self.levels.push(StoredLevel {
            level: level.level,
            width: level.width,
            height: level.height,
            format: level.format,
            row_stride: level.row_stride,
            pixels: level.pixels.to_vec(),
        });
    }
}

/// Default highest level for an image of the given width: `floor(log2(width))`.
///
/// A zero width yields 0.
#[inline]
pub fn default_max_level(width: u32) -> u32 {
    width.checked_ilog2().unwrap_or(0)
}

/// Producer of successive pyramid levels.
///
/// Yields `(level, buffer)` for levels `0..=max_level`; every buffer after
/// the first is the previous one shrunk by 2. Levels past the image's
/// power-of-two extent come out as zero-area buffers; bounding
/// `max_level` is up to the caller.
#[derive(Debug)]
pub struct MipPyramid {
    current: Option<PixelBuffer>,
    level: u32,
    max_level: u32,
    format: UploadFormat,
}

impl MipPyramid {
    /// Starts a pyramid at `base`.
    ///
    /// `max_level` defaults to [`default_max_level`] of the base width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] (wrapped) unless the base has 3
    /// or 4 bytes per pixel.
    pub fn new(base: PixelBuffer, max_level: Option<u32>) -> OpsResult<Self> {
        let format = UploadFormat::from_bytes_per_pixel(base.bytes_per_pixel()).inspect_err(|e| {
            warn!(error = %e, "cannot build mip pyramid");
        })?;
        let max_level = max_level.unwrap_or_else(|| default_max_level(base.width()));
        Ok(Self {
            current: Some(base),
            level: 0,
            max_level,
            format,
        })
    }

    /// Highest level this pyramid will produce.
    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Layout of every produced level.
    #[inline]
    pub fn format(&self) -> UploadFormat {
        self.format
    }
}

impl Iterator for MipPyramid {
    type Item = (u32, PixelBuffer);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let level = self.level;
        if level < self.max_level {
            // A factor of 2 is always a valid scale.
            self.current = shrink(&current, 2).ok();
            self.level += 1;
        }
        Some((level, current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.current.is_some() {
            (self.max_level - self.level) as usize + 1
        } else {
            0
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for MipPyramid {}

/// Uploads levels `0..=max_level` of `image` into `sink`.
///
/// Returns the number of uploaded levels. There is no recovery once the
/// first level has been handed over.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] (wrapped) unless `image` has 3 or 4
/// bytes per pixel. Nothing is uploaded in that case.
pub fn build_mipmaps<S: TextureSink + ?Sized>(
    image: &PixelBuffer,
    max_level: Option<u32>,
    sink: &mut S,
) -> OpsResult<u32> {
    let pyramid = MipPyramid::new(image.clone(), max_level)?;
    let format = pyramid.format();
    debug!(
        width = image.width(),
        height = image.height(),
        max_level = pyramid.max_level(),
        "Building mipmaps"
    );

    let mut uploaded = 0;
    for (level, buffer) in pyramid {
        trace!(level, width = buffer.width(), height = buffer.height(), "Uploading mip level");
        sink.upload(&MipLevel::new(level, &buffer, format));
        uploaded += 1;
    }
    Ok(uploaded)
}
