//! Error types for texel-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of buffer construction and
//! of the decoder hand-off:
//! - Buffer shape checks (dimensions, stride, backing length)
//! - Pixel layout checks (bytes per pixel, channel mismatch)
//! - Decoder failures (the source produced no image data)
//!
//! Failures split into two classes. Validation failures mean the caller's
//! data has an unsupported shape; resource failures mean no data could be
//! produced at all. See [`Error::is_validation_error`] and
//! [`Error::is_resource_error`].
//!
//! # Usage
//!
//! ```rust
//! use texel_core::{Error, Result};
//!
//! fn require_rgb(bytes_per_pixel: usize) -> Result<()> {
//!     if bytes_per_pixel != 3 {
//!         return Err(Error::channel_mismatch(3, bytes_per_pixel));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_rgb(4).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or feeding pixel buffers.
///
/// # Categories
///
/// - **Shape errors**: [`InvalidDimensions`](Error::InvalidDimensions),
///   [`InvalidStride`](Error::InvalidStride), [`BufferTooSmall`](Error::BufferTooSmall)
/// - **Layout errors**: [`UnsupportedFormat`](Error::UnsupportedFormat),
///   [`ChannelMismatch`](Error::ChannelMismatch)
/// - **Resource errors**: [`Decode`](Error::Decode)
#[derive(Debug, Error)]
pub enum Error {
    /// Image dimensions cannot describe a buffer.
    ///
    /// Returned when a size calculation overflows or the dimensions are
    /// inconsistent with the rest of the description.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Row stride is too small for the given width and pixel size.
    ///
    /// A row stride must be at least `width * bytes_per_pixel`.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride
        min_stride: usize,
        /// Image width
        width: u32,
    },

    /// Backing byte array is shorter than the declared shape needs.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required by the shape
        needed: usize,
        /// Bytes actually supplied
        got: usize,
    },

    /// Pixel layout is not supported for this operation.
    ///
    /// Most transformations only accept 3 (RGB) or 4 (RGBA) bytes per pixel.
    #[error("unsupported pixel format: {format}")]
    UnsupportedFormat {
        /// Format description
        format: String,
    },

    /// Bytes-per-pixel mismatch between source and destination.
    #[error("channel mismatch: expected {expected} bytes per pixel, got {got}")]
    ChannelMismatch {
        /// Expected bytes per pixel
        expected: usize,
        /// Actual bytes per pixel
        got: usize,
    },

    /// A decoder could not produce image data (missing file, corrupt stream).
    #[error("failed to decode \"{source_name}\": {reason}")]
    Decode {
        /// Name of the source, usually a file path
        source_name: String,
        /// Decoder-supplied description
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::Decode`] error.
    #[inline]
    pub fn decode(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the input had an unsupported shape or layout.
    #[inline]
    pub fn is_validation_error(&self) -> bool {
        !self.is_resource_error()
    }

    /// Returns `true` if no image data could be produced.
    #[inline]
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
