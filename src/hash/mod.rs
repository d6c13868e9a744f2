//! Placeholder hash gateway.
//!
//! Generates the compact perceptual placeholder returned by the metadata
//! endpoint: a thumbhash of the decoded raster, base64-encoded for JSON
//! transport. Generation is best-effort; the orchestrator substitutes
//! null when it fails.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;

use crate::error::HashError;

/// Thumbhash operates on rasters no larger than 100×100; bigger inputs
/// are downscaled first.
const MAX_HASH_DIMENSION: u32 = 100;

// =============================================================================
// Hash Gateway
// =============================================================================

/// Source of perceptual placeholder hashes.
///
/// Injected into the transform service so the hashing backend is a
/// configuration choice rather than pipeline logic.
pub trait HashGateway: Send + Sync {
    /// Generate a placeholder hash string for the raster.
    fn generate(&self, image: &DynamicImage) -> Result<String, HashError>;
}

// =============================================================================
// ThumbHash Generator
// =============================================================================

/// Thumbhash-based implementation of [`HashGateway`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumbHashGenerator;

impl ThumbHashGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl HashGateway for ThumbHashGenerator {
    fn generate(&self, image: &DynamicImage) -> Result<String, HashError> {
        let thumb = image.thumbnail(MAX_HASH_DIMENSION, MAX_HASH_DIMENSION);
        let rgba = thumb.to_rgba8();
        let (width, height) = rgba.dimensions();

        if width == 0 || height == 0 {
            return Err(HashError::Generation(format!(
                "degenerate raster {}x{}",
                width, height
            )));
        }

        let hash = thumbhash::rgba_to_thumb_hash(width as usize, height as usize, rgba.as_raw());
        Ok(STANDARD.encode(hash))
    }
}

// =============================================================================
// Tests
// =============================================================================
