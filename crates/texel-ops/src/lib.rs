//! # texel-ops
//!
//! Pixel-exact operations on [`texel_core::PixelBuffer`] and mip pyramid
//! construction for GPU texture upload.
//!
//! # Modules
//!
//! - [`normalize`] - Decoder output to RGB/RGBA buffers
//! - [`composite`] - Clipped rectangular copy
//! - [`resize`] - Integer enlarge/shrink and nearest-sample resample
//! - [`convert`] - RGB <-> RGBA layout conversion
//! - [`mipmap`] - Mip pyramid producer and upload sink
//! - [`texture`] - Texture-load entry point and sampler configuration
//!
//! Every transformation returns a fresh buffer and leaves its input alone.
//! Failures are logged through `tracing` and returned as [`OpsError`].
//!
//! # Example
//!
//! ```rust
//! use texel_core::DecodedImage;
//! use texel_ops::mipmap::MipChain;
//! use texel_ops::normalize::{normalize, NormalizeOptions};
//! use texel_ops::texture::{load_texture, TextureConfig};
//!
//! let decoded = DecodedImage::packed(4, 4, 1, vec![128; 16]).unwrap();
//! let image = normalize(&decoded, NormalizeOptions::new().check_square_power_of_two(true)).unwrap();
//!
//! let mut chain = MipChain::default();
//! let config = TextureConfig::default().with_max_levels(-1);
//! load_texture(&image, &config, &mut chain).unwrap();
//! assert_eq!(chain.levels.len(), 3);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - Rayon-backed variants of the resize operations
//! - `serde` - Serialization for configuration types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod composite;
pub mod convert;
pub mod mipmap;
pub mod normalize;
pub mod resize;
pub mod texture;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use composite::copy_into;
pub use convert::convert_format;
pub use error::{OpsError, OpsResult};
pub use mipmap::{build_mipmaps, MipChain, MipLevel, MipPyramid, TextureSink, UploadFormat};
pub use normalize::{normalize, NormalizeOptions};
pub use resize::{enlarge, resample, shrink};
pub use texture::{load_texture, SamplerParams, TextureConfig};
