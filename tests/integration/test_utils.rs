//! Test utilities for integration tests.
//!
//! This module provides mock gateway implementations and helpers for
//! creating test images in each supported encoding.

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use image::{DynamicImage, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;

use image_relay::codec::CodecGateway;
use image_relay::error::{FetchError, HashError};
use image_relay::fetch::{FetchGateway, FetchedImage};
use image_relay::hash::{HashGateway, ThumbHashGenerator};
use image_relay::server::{create_router, RouterConfig};
use image_relay::transform::TransformService;

// =============================================================================
// Mock Fetch Gateway
// =============================================================================

/// A mock fetch gateway that serves pre-configured payloads keyed by URL.
#[derive(Default)]
pub struct MockFetchGateway {
    responses: HashMap<String, FetchedImage>,
    errors: HashMap<String, FetchError>,
}

impl MockFetchGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload for a URL.
    pub fn with_image(
        mut self,
        url: &str,
        bytes: impl Into<Bytes>,
        content_type: Option<&str>,
    ) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchedImage {
                buffer: bytes.into(),
                content_type: content_type.map(String::from),
            },
        );
        self
    }

    /// Register a fetch failure for a URL.
    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.errors.insert(url.to_string(), error);
        self
    }
}

#[async_trait]
impl FetchGateway for MockFetchGateway {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        if let Some(error) = self.errors.get(url) {
            return Err(error.clone());
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Connection {
                message: format!("no fixture registered for {}", url),
            })
    }
}

// =============================================================================
// Failing Hash Gateway
// =============================================================================

/// A hash gateway that always fails, for exercising the non-fatal path.
pub struct FailingHashGateway;

impl HashGateway for FailingHashGateway {
    fn generate(&self, _image: &DynamicImage) -> Result<String, HashError> {
        Err(HashError::Generation("forced failure".to_string()))
    }
}

// =============================================================================
// Router Builders
// =============================================================================

/// Build a router over a mock fetcher with the real thumbhash generator.
pub fn router_with(fetcher: MockFetchGateway) -> Router {
    let service = TransformService::new(fetcher, ThumbHashGenerator::new(), CodecGateway::new());
    create_router(service, RouterConfig::new())
}

/// Build a router with a custom hash gateway.
pub fn router_with_hasher<H>(fetcher: MockFetchGateway, hasher: H) -> Router
where
    H: HashGateway + 'static,
{
    let service = TransformService::new(fetcher, hasher, CodecGateway::new());
    create_router(service, RouterConfig::new())
}

// =============================================================================
// Test Images
// =============================================================================

fn test_raster(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 8 % 256) as u8, (y * 8 % 256) as u8, 0x60, 0xFF])
    }))
}

/// Encode a test gradient as PNG.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    test_raster(width, height)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Encode a test gradient as JPEG.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    test_raster(width, height)
        .to_rgb8()
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// Encode a test gradient as (lossless) WebP.
pub fn create_test_webp(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    test_raster(width, height)
        .to_rgba8()
        .write_to(&mut buf, image::ImageFormat::WebP)
        .unwrap();
    buf.into_inner()
}

/// Bytes that match no supported image signature.
pub fn create_unknown_bytes() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xFF\xFF\xFF;".to_vec()
}
