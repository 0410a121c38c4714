//! Decoder hand-off types.
//!
//! Texel does not decode compressed formats itself. A decoder (BMP, PNG, or
//! anything else) hands over rows of already-decoded bytes described by a
//! [`DecodedImage`]. Sources that can fail to produce data implement
//! [`ImageSource`].

use crate::{Error, PixelBuffer, Result};

/// Raw pixel rows as produced by a decoder.
///
/// Channel counts of 1 (grayscale or alpha), 3 (RGB) and 4 (RGBA) are
/// understood by the normalizer. `row_stride` may exceed
/// `width * bytes_per_pixel`; the trailing bytes of a row are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes per pixel of the decoder-native layout.
    pub bytes_per_pixel: usize,
    /// Distance in bytes between the starts of consecutive rows.
    pub row_stride: usize,
    /// Row data, at least `(height - 1) * row_stride + width * bytes_per_pixel` bytes.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Creates a decoded image after checking that the rows fit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStride`] if `row_stride < width * bytes_per_pixel`
    /// and [`Error::BufferTooSmall`] if `pixels` cannot hold every row.
    ///
    /// # Example
    ///
    /// ```rust
    /// use texel_core::DecodedImage;
    ///
    /// let gray = DecodedImage::new(2, 2, 1, 4, vec![10, 20, 0, 0, 30, 40, 0, 0]).unwrap();
    /// assert_eq!(gray.row(1), &[30, 40]);
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_pixel: usize,
        row_stride: usize,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        let image = Self {
            width,
            height,
            bytes_per_pixel,
            row_stride,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Creates a decoded image whose rows are tightly packed.
    pub fn packed(width: u32, height: u32, bytes_per_pixel: usize, pixels: Vec<u8>) -> Result<Self> {
        Self::new(width, height, bytes_per_pixel, width as usize * bytes_per_pixel, pixels)
    }

    /// Number of meaningful bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel
    }

    /// Checks the stride and length invariants.
    pub fn validate(&self) -> Result<()> {
        let row_bytes = (self.width as usize)
            .checked_mul(self.bytes_per_pixel)
            .ok_or_else(|| Error::invalid_dimensions(self.width, self.height, "row size overflows"))?;
        if self.row_stride < row_bytes {
            return Err(Error::InvalidStride {
                stride: self.row_stride,
                min_stride: row_bytes,
                width: self.width,
            });
        }
        if self.height == 0 || row_bytes == 0 {
            return Ok(());
        }
        let needed = (self.height as usize - 1)
            .checked_mul(self.row_stride)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or_else(|| Error::invalid_dimensions(self.width, self.height, "buffer size overflows"))?;
        if self.pixels.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                got: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Returns `true` if the image is square with a power-of-two side.
    #[inline]
    pub fn is_square_power_of_two(&self) -> bool {
        self.width == self.height && self.width.is_power_of_two()
    }

    /// Returns the meaningful bytes of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.row_stride;
        &self.pixels[start..start + self.row_bytes()]
    }
}

impl From<&PixelBuffer> for DecodedImage {
    fn from(buf: &PixelBuffer) -> Self {
        Self {
            width: buf.width(),
            height: buf.height(),
            bytes_per_pixel: buf.bytes_per_pixel(),
            row_stride: buf.pitch(),
            pixels: buf.data().to_vec(),
        }
    }
}

/// Something that can produce decoded pixel rows.
///
/// Implementations wrap a real decoder. A failure to produce any data
/// (missing file, corrupt stream) should be reported as [`Error::Decode`].
pub trait ImageSource {
    /// Human-readable name used in diagnostics, usually a path.
    fn name(&self) -> &str;

    /// Decodes the image.
    fn decode(&mut self) -> Result<DecodedImage>;
}

impl ImageSource for DecodedImage {
    fn name(&self) -> &str {
        "<memory>"
    }

    fn decode(&mut self) -> Result<DecodedImage> {
        self.validate()?;
        Ok(self.clone())
    }
}
