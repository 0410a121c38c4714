//! # texel-core
//!
//! Core types for texel, an in-memory pixel engine that prepares decoded
//! images for upload to a GPU texture sampler.
//!
//! This crate provides the foundational types used throughout texel:
//!
//! - [`PixelBuffer`] - Owned RGB/RGBA byte buffer with a 4-byte aligned pitch
//! - [`aligned_pitch`] - Row stride rounding shared by every operation
//! - [`DecodedImage`], [`ImageSource`] - The decoder hand-off contract
//! - [`Error`], [`Result`] - Unified error type
//!
//! ## Crate Structure
//!
//! ```text
//! texel-core (this crate)
//!    ^
//!    |
//!    +-- texel-ops (normalize, composite, resize, mipmap)
//! ```
//!
//! Transformations live in `texel-ops` and always return fresh buffers, so
//! independent buffers can be processed from different threads.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod source;

pub use buffer::{aligned_pitch, PixelBuffer, PITCH_ALIGNMENT};
pub use error::{Error, Result};
pub use source::{DecodedImage, ImageSource};

/// Prelude module for convenient imports.
///
/// ```
/// use texel_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{aligned_pitch, PixelBuffer, PITCH_ALIGNMENT};
    pub use crate::error::{Error, Result};
    pub use crate::source::{DecodedImage, ImageSource};
}
