//! Aligned pixel buffer.
//!
//! This module provides the one container every other texel component
//! operates on:
//! - [`PixelBuffer`] - Owned `width x height` array of byte pixels
//! - [`aligned_pitch`] - Row stride rounding used for every new buffer
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom. Each row starts
//! at a multiple of [`PITCH_ALIGNMENT`] bytes, so a row may end in padding:
//!
//! ```text
//! Memory: [R G B R G B R G B . . .]  <- Row 0 (3 pixels, 9 bytes + 3 padding)
//!         [R G B R G B R G B . . .]  <- Row 1
//!         ...
//! ```
//!
//! Channel `c` of pixel `(x, y)` lives at `y * pitch + x * bytes_per_pixel + c`.
//!
//! # Ownership
//!
//! A buffer exclusively owns its bytes. [`Clone`] is a deep byte-for-byte
//! copy; moving hands the allocation over without copying, and
//! [`PixelBuffer::take`] moves out while leaving the empty sentinel behind.
//!
//! # Usage
//!
//! ```rust
//! use texel_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::new(3, 2, 3);
//! assert_eq!(buf.pitch(), 12); // 9 rounded up to a multiple of 4
//!
//! buf.set_channel(2, 1, 0, 200);
//! assert_eq!(buf.channel(2, 1, 0), 200);
//! ```

use crate::{Error, Result};

/// Row stride alignment in bytes for every buffer created by texel.
pub const PITCH_ALIGNMENT: usize = 4;

/// Rounds `pitch` up to the next multiple of `align`.
///
/// Already-aligned values are returned unchanged, so the function is
/// idempotent.
///
/// # Panics
///
/// Panics if `align` is zero.
///
/// # Example
///
/// ```rust
/// use texel_core::aligned_pitch;
///
/// assert_eq!(aligned_pitch(9, 4), 12);
/// assert_eq!(aligned_pitch(12, 4), 12);
/// assert_eq!(aligned_pitch(0, 4), 0);
/// ```
#[inline]
pub const fn aligned_pitch(pitch: usize, align: usize) -> usize {
    let rem = pitch % align;
    if rem == 0 { pitch } else { pitch + align - rem }
}

/// Owned pixel buffer with a 4-byte aligned row stride.
///
/// A buffer with zero width, zero height or zero bytes per pixel is the
/// "no image" sentinel (see [`is_empty`](Self::is_empty)). That state is
/// also the [`Default`].
///
/// Bytes per pixel is fixed for the lifetime of an instance. Texel
/// transformations use 3 (RGB) and 4 (RGBA); other counts can be stored
/// but are rejected by most operations.
#[derive(Default, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    pitch: usize,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// The pitch is `width * bytes_per_pixel` rounded up to
    /// [`PITCH_ALIGNMENT`], and `height * pitch` bytes are allocated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use texel_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::new(5, 4, 3);
    /// assert_eq!(buf.pitch(), 16);
    /// assert_eq!(buf.data().len(), 64);
    /// assert!(buf.data().iter().all(|&b| b == 0));
    /// ```
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize) -> Self {
        let pitch = aligned_pitch(width as usize * bytes_per_pixel, PITCH_ALIGNMENT);
        Self {
            data: vec![0u8; height as usize * pitch],
            width,
            height,
            bytes_per_pixel,
            pitch,
        }
    }

    /// Creates a buffer with every pixel set to `pixel`.
    ///
    /// Bytes per pixel is taken from `pixel.len()`.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Self {
        let mut buf = Self::new(width, height, pixel.len());
        buf.fill(pixel);
        buf
    }

    /// Wraps an existing byte array laid out with the aligned pitch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the shape overflows and
    /// [`Error::BufferTooSmall`] if `data.len() != height * pitch`.
    pub fn from_raw(width: u32, height: u32, bytes_per_pixel: usize, data: Vec<u8>) -> Result<Self> {
        let pitch = (width as usize)
            .checked_mul(bytes_per_pixel)
            .and_then(|raw| raw.checked_next_multiple_of(PITCH_ALIGNMENT))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))?;
        let needed = pitch
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != needed {
            return Err(Error::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            bytes_per_pixel,
            pitch,
        })
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Returns the row stride in bytes.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Returns the number of meaningful bytes in a row, excluding padding.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` for the "no image" sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.bytes_per_pixel == 0
    }

    /// Returns all bytes, padding included (`height * pitch` long).
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns all bytes mutably, padding included.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Moves the contents out, leaving `self` in the empty state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use texel_core::PixelBuffer;
    ///
    /// let mut a = PixelBuffer::new(2, 2, 4);
    /// let b = a.take();
    /// assert!(a.is_empty());
    /// assert_eq!(b.dimensions(), (2, 2));
    /// ```
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.pitch + x as usize * self.bytes_per_pixel
    }

    /// Returns channel `c` of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Bounds are the caller's responsibility; an offset outside the
    /// backing array panics.
    #[inline]
    pub fn channel(&self, x: u32, y: u32, c: usize) -> u8 {
        debug_assert!(
            x < self.width && y < self.height && c < self.bytes_per_pixel,
            "channel ({x}, {y}, {c}) out of bounds"
        );
        self.data[self.offset(x, y) + c]
    }

    /// Returns a mutable reference to channel `c` of pixel `(x, y)`.
    #[inline]
    pub fn channel_mut(&mut self, x: u32, y: u32, c: usize) -> &mut u8 {
        debug_assert!(
            x < self.width && y < self.height && c < self.bytes_per_pixel,
            "channel ({x}, {y}, {c}) out of bounds"
        );
        let offset = self.offset(x, y) + c;
        &mut self.data[offset]
    }

    /// Sets channel `c` of pixel `(x, y)`.
    #[inline]
    pub fn set_channel(&mut self, x: u32, y: u32, c: usize, value: u8) {
        *self.channel_mut(x, y, c) = value;
    }

    /// Returns the bytes of pixel `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        &self.data[offset..offset + self.bytes_per_pixel]
    }

    /// Returns the bytes of pixel `(x, y)` mutably.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.offset(x, y);
        let bpp = self.bytes_per_pixel;
        &mut self.data[offset..offset + bpp]
    }

    /// Returns the pixel bytes of row `y`, without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.pitch;
        &self.data[start..start + self.row_bytes()]
    }

    /// Returns the pixel bytes of row `y` mutably, without padding.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.pitch;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    /// Sets every pixel to `pixel`. Padding bytes are left untouched.
    pub fn fill(&mut self, pixel: &[u8]) {
        debug_assert_eq!(pixel.len(), self.bytes_per_pixel, "fill pixel size");
        if self.is_empty() {
            return;
        }
        for y in 0..self.height {
            for chunk in self.row_mut(y).chunks_exact_mut(pixel.len()) {
                chunk.copy_from_slice(pixel);
            }
        }
    }

    /// Iterates over all pixels with their coordinates.
    ///
    /// # Example
    ///
    /// ```rust
    /// use texel_core::PixelBuffer;
    ///
    /// let buf = PixelBuffer::filled(4, 4, &[1, 2, 3]);
    /// for (_, _, px) in buf.pixels() {
    ///     assert_eq!(px, &[1, 2, 3]);
    /// }
    /// ```
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, &[u8])> + '_ {
        let (width, height) = if self.is_empty() {
            (0, 0)
        } else {
            (self.width, self.height)
        };
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

impl Clone for PixelBuffer {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            ..*self
        }
    }

    /// Deep copy that keeps the existing allocation when it is large enough.
    fn clone_from(&mut self, source: &Self) {
        self.width = source.width;
        self.height = source.height;
        self.bytes_per_pixel = source.bytes_per_pixel;
        self.pitch = source.pitch;
        self.data.clone_from(&source.data);
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_per_pixel", &self.bytes_per_pixel)
            .field("pitch", &self.pitch)
            .finish()
    }
}
