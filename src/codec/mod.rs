//! Codec gateway: decode, resize, and encode rasters.
//!
//! All pixel work is delegated to the `image` crate; this module owns the
//! format dispatch, the JPEG quality policy, and the one-time
//! initialization contract.
//!
//! # Initialization
//!
//! [`CodecGateway::ensure_initialised`] runs a probe that pushes a 1×1
//! raster through every supported encoder exactly once per gateway.
//! Concurrent first callers all await the same in-flight future (a
//! guarded `OnceCell`, not a check-then-set flag), so the probe's side
//! effects occur at most once even under a thundering herd of first
//! requests.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::TransformError;
use crate::format::ImageFormat;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Maximum target dimension per side.
///
/// WebP's hard per-side limit; the smallest across the supported codecs.
/// Larger targets fail the resize stage rather than exhausting memory.
pub const MAX_TARGET_DIMENSION: u32 = 16_383;

// =============================================================================
// Codec Gateway
// =============================================================================

/// Gateway to the decode/resize/encode codec operations.
///
/// One gateway serves the whole process; all request handlers share it
/// through the transform service. Apart from the initialization cell the
/// gateway is stateless, so `&self` methods are safe to call
/// concurrently.
pub struct CodecGateway {
    /// One-time initialization guard. Holds the completed probe result;
    /// concurrent initial callers await the same in-flight future.
    init: OnceCell<()>,

    /// Number of times the probe has actually run. Diagnostic only.
    probe_runs: AtomicUsize,

    /// JPEG encode quality (1-100)
    jpeg_quality: u8,
}

impl Default for CodecGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecGateway {
    /// Create a gateway with the default JPEG quality.
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_JPEG_QUALITY)
    }

    /// Create a gateway with a specific JPEG quality (clamped to 1-100).
    pub fn with_quality(jpeg_quality: u8) -> Self {
        Self {
            init: OnceCell::new(),
            probe_runs: AtomicUsize::new(0),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// One-time codec initialization.
    ///
    /// Idempotent and safe under concurrent first use: the probe runs at
    /// most once and every caller observes its outcome. A failed probe is
    /// fatal for the calling request and is not retried within it.
    pub async fn ensure_initialised(&self) -> Result<(), TransformError> {
        self.init
            .get_or_try_init(|| async {
                self.probe_runs.fetch_add(1, Ordering::SeqCst);
                self.run_probe()
            })
            .await?;
        Ok(())
    }

    /// Whether initialization has completed successfully.
    pub fn initialised(&self) -> bool {
        self.init.initialized()
    }

    /// Push a 1×1 raster through every encoder to confirm each codec is
    /// actually usable in this build.
    fn run_probe(&self) -> Result<(), TransformError> {
        let probe = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1,
            1,
            image::Rgba([0x80, 0x80, 0x80, 0xFF]),
        ));

        for format in [
            ImageFormat::Jpeg,
            ImageFormat::Png,
            ImageFormat::Webp,
            ImageFormat::Avif,
        ] {
            self.encode(&probe, format)
                .map_err(|err| TransformError::CodecInit {
                    message: format!("{} probe failed: {}", format.name(), err.detail().unwrap_or("unknown")),
                })?;
        }

        debug!("codec probe completed");
        Ok(())
    }

    /// Decode bytes in the given (sniffed) format into a raster.
    pub fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, TransformError> {
        image::load_from_memory_with_format(bytes, format.codec_format()).map_err(|err| {
            TransformError::Decode {
                message: format!("{}: {}", format.name(), err),
            }
        })
    }

    /// Resize a raster to exactly the resolved target dimensions.
    ///
    /// The target is taken verbatim; aspect policy is the resolver's job.
    pub fn resize(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::Resize {
                message: format!("zero-sized target {}x{}", width, height),
            });
        }
        if width > MAX_TARGET_DIMENSION || height > MAX_TARGET_DIMENSION {
            return Err(TransformError::Resize {
                message: format!(
                    "target {}x{} exceeds the {} pixel per-side limit",
                    width, height, MAX_TARGET_DIMENSION
                ),
            });
        }

        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    /// Encode a raster into the target format.
    pub fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<Bytes, TransformError> {
        let mut output = Cursor::new(Vec::new());

        let result = match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = image.to_rgb8();
                let mut encoder = JpegEncoder::new_with_quality(&mut output, self.jpeg_quality);
                encoder.encode_image(&rgb)
            }
            ImageFormat::Png => image.write_to(&mut output, image::ImageFormat::Png),
            ImageFormat::Webp => {
                // The lossless WebP encoder accepts RGB8/RGBA8 only
                image
                    .to_rgba8()
                    .write_to(&mut output, image::ImageFormat::WebP)
            }
            ImageFormat::Avif => image
                .to_rgba8()
                .write_to(&mut output, image::ImageFormat::Avif),
        };

        result.map_err(|err| TransformError::Encode {
            message: format!("{}: {}", format.name(), err),
        })?;

        Ok(Bytes::from(output.into_inner()))
    }
}

// =============================================================================
// Tests
// =============================================================================
