//! Error types for buffer operations.

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Error raised by a core buffer or decoder check.
    #[error(transparent)]
    Core(#[from] texel_core::Error),

    /// Source must be square with a power-of-two side.
    #[error("unsupported image size {width}x{height} (must be a square with side length 2^n pixels)")]
    NotSquarePowerOfTwo {
        /// Source width
        width: u32,
        /// Source height
        height: u32,
    },

    /// Decoder-native channel count the normalizer does not understand.
    #[error("unsupported channel count {0} (only 1, 3 and 4 are supported)")]
    UnsupportedChannels(usize),

    /// Masked alpha requested for a multi-channel source.
    #[error("a {channels}-channel image cannot be used as an alpha mask")]
    MaskUnsupported {
        /// Source channel count
        channels: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation needs image data but got the empty sentinel.
    #[error("empty image")]
    EmptyImage,
}

impl OpsError {
    /// Returns `true` if the input had an unsupported shape or layout.
    pub fn is_validation_error(&self) -> bool {
        !self.is_resource_error()
    }

    /// Returns `true` if no image data could be produced.
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_resource_error())
    }
}

/// Result type for buffer operations.
pub type OpsResult<T> = Result<T, OpsError>;
