//! Integration tests for texel crates.
//!
//! These tests drive the full path a texture takes: decoded rows ->
//! normalized buffer -> compositing/resizing -> mip pyramid -> sink.

/// Installs a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; output goes through the test harness capture.
pub fn init_logging() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use std::io;
    use std::sync::{Arc, Mutex};
    use texel_core::{aligned_pitch, DecodedImage, Error, ImageSource, PixelBuffer};
    use texel_ops::mipmap::MipLevel;
    use texel_ops::normalize::{load, NormalizeOptions};
    use texel_ops::texture::{FilterMode, MinFilter};
    use texel_ops::{
        build_mipmaps, convert_format, copy_into, enlarge, load_texture, normalize, parallel,
        resample, shrink, MipChain, OpsError, SamplerParams, TextureConfig, TextureSink,
        UploadFormat,
    };

    /// RGB buffer where pixel (x, y) is [x * 16, y * 16, x ^ y].
    fn pattern(width: u32, height: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height, 3);
        for y in 0..height {
            for x in 0..width {
                buf.pixel_mut(x, y)
                    .copy_from_slice(&[(x * 16) as u8, (y * 16) as u8, (x ^ y) as u8]);
            }
        }
        buf
    }

    #[test]
    fn test_aligned_pitch_idempotent() {
        for p in 0..1000 {
            let once = aligned_pitch(p, 4);
            assert_eq!(aligned_pitch(once, 4), once);
            assert!(once >= p);
            assert_eq!(once % 4, 0);
        }
    }

    #[test]
    fn test_rgb_rgba_roundtrip() {
        init_logging();
        for (w, h) in [(1, 1), (3, 2), (5, 7), (16, 16)] {
            let src = pattern(w, h);
            let rgba = convert_format(&src, 4).unwrap();
            assert!(rgba.pixels().all(|(_, _, px)| px[3] == 255));
            assert_eq!(convert_format(&rgba, 3).unwrap(), src);
        }
    }

    #[test]
    fn test_shrink_inverts_enlarge() {
        let src = pattern(7, 5);
        for scale in [1, 2, 3, 8] {
            let big = enlarge(&src, scale).unwrap();
            assert_eq!(big.dimensions(), (7 * scale, 5 * scale));
            assert_eq!(shrink(&big, scale).unwrap(), src);
        }
    }

    #[test]
    fn test_negative_offset_equals_preclipped() {
        init_logging();
        let src = pattern(4, 4);
        let mut clipped = PixelBuffer::new(4, 4, 3);
        let mut manual = PixelBuffer::new(4, 4, 3);
        copy_into(&mut clipped, &src, -2, 0, 0, 0).unwrap();
        copy_into(&mut manual, &src, 0, 0, 2, 0).unwrap();
        assert_eq!(clipped, manual);
        // copy width was 2: columns 2 and 3 stay zero
        for y in 0..4 {
            assert_eq!(clipped.pixel(2, y), &[0, 0, 0]);
            assert_eq!(clipped.pixel(3, y), &[0, 0, 0]);
        }
    }

    #[test]
    fn test_grayscale_and_mask() {
        let gray = DecodedImage::packed(2, 2, 1, vec![10, 20, 30, 40]).unwrap();

        let rgba = normalize(&gray, NormalizeOptions::default()).unwrap();
        assert_eq!(rgba.pixel(0, 0), &[10, 10, 10, 255]);

        let mask = normalize(&gray, NormalizeOptions::new().masked_alpha(true)).unwrap();
        assert_eq!(mask.pixel(0, 0), &[255, 255, 255, 10]);
    }

    #[test]
    fn test_pyramid_4x4_uploads_three_levels() {
        let mut chain = MipChain::default();
        let uploaded = build_mipmaps(&pattern(4, 4), None, &mut chain).unwrap();
        assert_eq!(uploaded, 3);
        let widths: Vec<u32> = chain.levels.iter().map(|l| l.width).collect();
        assert_eq!(widths, [4, 2, 1]);
    }

    #[test]
    fn test_resample_empty_is_zero() {
        let empty = PixelBuffer::new(0, 0, 3);
        for (w, h) in [(1, 1), (3, 9), (64, 2)] {
            let out = resample(&empty, w, h);
            assert_eq!(out.dimensions(), (w, h));
            assert_eq!(out.data().len(), h as usize * aligned_pitch(w as usize * 3, 4));
            assert!(out.data().iter().all(|&b| b == 0));
        }
    }

    /// Sink that checks what a graphics layer would rely on.
    #[derive(Default)]
    struct CheckingSink {
        configured: Option<SamplerParams>,
        uploads: Vec<(u32, u32, u32, UploadFormat)>,
    }

    impl TextureSink for CheckingSink {
        fn configure(&mut self, params: &SamplerParams) {
            assert!(self.uploads.is_empty(), "configure must precede uploads");
            self.configured = Some(*params);
        }

        fn upload(&mut self, level: &MipLevel<'_>) {
            let bpp = level.format.bytes_per_pixel();
            assert!(level.row_stride >= level.width as usize * bpp);
            assert_eq!(level.row_stride % 4, 0);
            assert_eq!(level.pixels.len(), level.height as usize * level.row_stride);
            self.uploads.push((level.level, level.width, level.height, level.format));
        }
    }

    #[test]
    fn test_decode_to_texture_pipeline() {
        init_logging();
        // 8x8 grayscale with a padded stride, as a PNG decoder might hand it over
        let stride = 12;
        let mut pixels = vec![0u8; stride * 8];
        for y in 0..8 {
            for x in 0..8 {
                pixels[y * stride + x] = (x * 32) as u8;
            }
        }
        let mut decoded = DecodedImage::new(8, 8, 1, stride, pixels).unwrap();
        let opts = NormalizeOptions::new().check_square_power_of_two(true);
        let image = load(&mut decoded, opts).unwrap();
        assert_eq!(image.pixel(7, 3), &[224, 224, 224, 255]);

        let config = TextureConfig::default().with_max_levels(-1);
        let mut sink = CheckingSink::default();
        assert_eq!(load_texture(&image, &config, &mut sink).unwrap(), 4);

        let params = sink.configured.unwrap();
        assert_eq!(params.max_level, 3);
        assert_eq!(params.mag_filter, FilterMode::Linear);
        assert_eq!(params.min_filter, MinFilter::LinearMipmapLinear);
        assert_eq!(params.internal_format, UploadFormat::Rgb);
        assert_eq!(
            sink.uploads,
            [
                (0, 8, 8, UploadFormat::Rgba),
                (1, 4, 4, UploadFormat::Rgba),
                (2, 2, 2, UploadFormat::Rgba),
                (3, 1, 1, UploadFormat::Rgba),
            ]
        );
    }

    #[test]
    fn test_last_level_is_mean_of_columns() {
        // Columns 0..8 hold 0, 32, ..., 224; every box average is exact.
        let row: Vec<u8> = (0..8).map(|x| (x * 32) as u8).collect();
        let pixels: Vec<u8> = row.iter().cycle().take(64).copied().collect();
        let image = normalize(
            &DecodedImage::packed(8, 8, 1, pixels).unwrap(),
            NormalizeOptions::default(),
        )
        .unwrap();

        let mut chain = MipChain::default();
        build_mipmaps(&image, None, &mut chain).unwrap();
        let last = chain.levels.last().unwrap();
        // (0 + 32 + ... + 224) / 8 = 112
        assert_eq!(last.pixels, [112, 112, 112, 255]);
    }

    #[test]
    fn test_atlas_assembly() {
        // Paste four tiles into a 4x4 atlas, one of them hanging off the edge.
        let mut atlas = PixelBuffer::new(4, 4, 3);
        let red = PixelBuffer::filled(2, 2, &[255, 0, 0]);
        let green = PixelBuffer::filled(2, 2, &[0, 255, 0]);
        copy_into(&mut atlas, &red, 0, 0, 0, 0).unwrap();
        copy_into(&mut atlas, &green, 3, 3, 0, 0).unwrap();
        copy_into(&mut atlas, &green, -1, 2, 0, 0).unwrap();

        assert_eq!(atlas.pixel(1, 1), &[255, 0, 0]);
        assert_eq!(atlas.pixel(3, 3), &[0, 255, 0]);
        assert_eq!(atlas.pixel(0, 3), &[0, 255, 0]);
        assert_eq!(atlas.pixel(1, 3), &[0, 0, 0]);

        let rgba_tile = PixelBuffer::new(1, 1, 4);
        let err = copy_into(&mut atlas, &rgba_tile, 0, 0, 0, 0).unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_parallel_matches_serial() {
        for (w, h) in [(1, 1), (13, 7), (64, 64), (100, 3)] {
            let src = pattern(w, h);
            assert_eq!(parallel::enlarge(&src, 3).unwrap(), enlarge(&src, 3).unwrap());
            assert_eq!(parallel::shrink(&src, 2).unwrap(), shrink(&src, 2).unwrap());
            assert_eq!(parallel::resample(&src, 17, 29), resample(&src, 17, 29));
        }
    }

    struct BrokenDecoder;

    impl ImageSource for BrokenDecoder {
        fn name(&self) -> &str {
            "textures/missing.bmp"
        }

        fn decode(&mut self) -> texel_core::Result<DecodedImage> {
            Err(Error::decode(self.name(), "no such file"))
        }
    }

    #[test]
    fn test_resource_failure_classification() {
        init_logging();
        let err = load(&mut BrokenDecoder, NormalizeOptions::default()).unwrap_err();
        assert!(err.is_resource_error());
        assert!(err.to_string().contains("missing.bmp"));

        let odd = DecodedImage::packed(3, 3, 3, vec![0; 27]).unwrap();
        let err = normalize(&odd, NormalizeOptions::new().check_square_power_of_two(true))
            .unwrap_err();
        assert!(err.is_validation_error());
        assert!(matches!(err, OpsError::NotSquarePowerOfTwo { width: 3, height: 3 }));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = TextureConfig::default().alpha_channel(true).with_max_levels(-1);
        let json = serde_json::to_string(&config).unwrap();
        let back: TextureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let params = SamplerParams::from_config(&config, 5);
        let json = serde_json::to_string(&params).unwrap();
        let back: SamplerParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: TextureConfig = serde_json::from_str(r#"{ "alpha_channel": true }"#).unwrap();
        assert!(config.alpha_channel);
        assert!(config.bilinear_filtering);
        assert_eq!(config.max_mip_levels, Some(0));

        let opts: NormalizeOptions = serde_json::from_str(r#"{ "masked_alpha": true }"#).unwrap();
        assert!(opts.masked_alpha);
        assert!(!opts.check_square_power_of_two);
    }

    /// Writer collecting formatted log output for inspection.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn warn_lines(&self) -> usize {
            let out = self.0.lock().unwrap();
            String::from_utf8_lossy(&out)
                .lines()
                .filter(|line| line.contains("WARN"))
                .count()
        }
    }

    #[test]
    fn test_failures_are_logged() {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut dst = PixelBuffer::new(2, 2, 4);
            assert!(copy_into(&mut dst, &pattern(2, 2), 0, 0, 0, 0).is_err());
            assert_eq!(capture.warn_lines(), 1);

            let short = DecodedImage {
                width: 4,
                height: 4,
                bytes_per_pixel: 1,
                row_stride: 4,
                pixels: vec![0; 3],
            };
            assert!(normalize(&short, NormalizeOptions::default()).is_err());
            assert_eq!(capture.warn_lines(), 2);

            assert!(shrink(&pattern(4, 4), 0).is_err());
            assert_eq!(capture.warn_lines(), 3);

            assert!(enlarge(&PixelBuffer::new(u32::MAX, 1, 0), 2).is_err());
            assert_eq!(capture.warn_lines(), 4);

            let mut chain = MipChain::default();
            assert!(build_mipmaps(&PixelBuffer::new(4, 4, 1), None, &mut chain).is_err());
            assert_eq!(capture.warn_lines(), 5);
            assert!(chain.levels.is_empty());
        });
    }

    #[test]
    fn test_moves_leave_empty() {
        let mut a = pattern(4, 4);
        let copy = a.clone();
        let moved = a.take();
        assert!(a.is_empty());
        assert_eq!(moved, copy);
    }
}
