//! Texture-load entry point and sampler configuration.
//!
//! [`load_texture`] turns a [`TextureConfig`] into [`SamplerParams`],
//! hands them to a [`TextureSink`], then uploads the mip pyramid.
//!
//! # Example
//!
//! ```rust
//! use texel_core::PixelBuffer;
//! use texel_ops::mipmap::MipChain;
//! use texel_ops::texture::{load_texture, FilterMode, TextureConfig};
//!
//! let image = PixelBuffer::filled(8, 8, &[0, 128, 255, 255]);
//! let config = TextureConfig::default()
//!     .alpha_channel(true)
//!     .bilinear_filtering(false)
//!     .with_max_levels(-1);
//!
//! let mut chain = MipChain::default();
//! assert_eq!(load_texture(&image, &config, &mut chain).unwrap(), 4);
//! assert_eq!(chain.params.unwrap().mag_filter, FilterMode::Nearest);
//! ```

use crate::mipmap::{build_mipmaps, default_max_level, TextureSink, UploadFormat};
use crate::{OpsError, OpsResult};
use texel_core::PixelBuffer;
use tracing::{debug, warn};

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    /// Nearest texel (point sampling).
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

/// Minification filter. Both variants blend linearly between mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinFilter {
    /// Nearest texel within each level.
    NearestMipmapLinear,
    /// Bilinear within each level (trilinear overall).
    #[default]
    LinearMipmapLinear,
}

/// Options accepted by [`load_texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextureConfig {
    /// Store the texture with an alpha channel.
    pub alpha_channel: bool,
    /// Linear filtering; nearest otherwise.
    pub bilinear_filtering: bool,
    /// Highest mip level to upload. `None` derives it from the width.
    pub max_mip_levels: Option<u32>,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            alpha_channel: false,
            bilinear_filtering: true,
            max_mip_levels: Some(0),
        }
    }
}

impl TextureConfig {
    /// Sets [`alpha_channel`](Self::alpha_channel).
    pub fn alpha_channel(mut self, on: bool) -> Self {
        self.alpha_channel = on;
        self
    }

    /// Sets [`bilinear_filtering`](Self::bilinear_filtering).
    pub fn bilinear_filtering(mut self, on: bool) -> Self {
        self.bilinear_filtering = on;
        self
    }

    /// Sets the level limit using the signed convention where any
    /// negative value means "derive from width".
    pub fn with_max_levels(mut self, levels: i32) -> Self {
        self.max_mip_levels = u32::try_from(levels).ok();
        self
    }

    /// Highest level for an image of the given width.
    pub fn resolve_max_level(&self, width: u32) -> u32 {
        self.max_mip_levels.unwrap_or_else(|| default_max_level(width))
    }
}

/// Sampler state the graphics layer applies before uploading levels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerParams {
    /// Storage format on the GPU side.
    pub internal_format: UploadFormat,
    /// Magnification filter.
    pub mag_filter: FilterMode,
    /// Minification filter.
    pub min_filter: MinFilter,
    /// First level to sample.
    pub base_level: u32,
    /// Last level to sample.
    pub max_level: u32,
    /// Lowest LOD.
    pub min_lod: f32,
    /// Highest LOD.
    pub max_lod: f32,
    /// LOD bias.
    pub lod_bias: f32,
}

impl SamplerParams {
    /// Derives sampler state for a pyramid ending at `max_level`.
    pub fn from_config(config: &TextureConfig, max_level: u32) -> Self {
        let (mag_filter, min_filter) = if config.bilinear_filtering {
            (FilterMode::Linear, MinFilter::LinearMipmapLinear)
        } else {
            (FilterMode::Nearest, MinFilter::NearestMipmapLinear)
        };
        Self {
            internal_format: if config.alpha_channel {
                UploadFormat::Rgba
            } else {
                UploadFormat::Rgb
            },
            mag_filter,
            min_filter,
            base_level: 0,
            max_level,
            min_lod: 0.0,
            max_lod: max_level as f32,
            lod_bias: 0.0,
        }
    }
}

/// Configures `sink` and uploads the mip pyramid of `image`.
///
/// Returns the number of uploaded levels.
///
/// # Errors
///
/// - [`OpsError::EmptyImage`] for the empty sentinel; the sink is not touched
/// - [`texel_core::Error::UnsupportedFormat`] (wrapped) unless `image` has 3
///   or 4 bytes per pixel
pub fn load_texture<S: TextureSink + ?Sized>(
    image: &PixelBuffer,
    config: &TextureConfig,
    sink: &mut S,
) -> OpsResult<u32> {
    if image.is_empty() {
        warn!("skipping empty texture image");
        return Err(OpsError::EmptyImage);
    }
    UploadFormat::from_bytes_per_pixel(image.bytes_per_pixel()).inspect_err(|e| {
        warn!(error = %e, "failed to load texture");
    })?;

    let max_level = config.resolve_max_level(image.width());
    let params = SamplerParams::from_config(config, max_level);
    debug!(
        width = image.width(),
        height = image.height(),
        max_level,
        alpha = config.alpha_channel,
        bilinear = config.bilinear_filtering,
        "Loading texture"
    );

    sink.configure(&params);
    build_mipmaps(image, Some(max_level), sink)
}
