//! Transform orchestrator.
//!
//! Sequences the fallible pipeline stages into exactly one terminal
//! outcome per request: transformed bytes, passthrough bytes, metadata
//! JSON, or a classified error. No stage is retried and no partial
//! output is ever emitted.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::CodecGateway;
use crate::error::TransformError;
use crate::fetch::{FetchGateway, FetchedImage};
use crate::format::{detect_format, ImageFormat};
use crate::hash::HashGateway;

use super::dimensions;
use super::params::TransformParams;

/// Content type for passthrough payloads the upstream didn't label.
pub const OCTET_STREAM: &str = "application/octet-stream";

// =============================================================================
// Results
// =============================================================================

/// Successful outcome of the transform pipeline.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Response body bytes
    pub data: Bytes,

    /// `Content-Type` for the response
    pub content_type: String,

    /// False when the source bytes were returned verbatim
    pub transformed: bool,
}

/// Successful outcome of the metadata pipeline.
#[derive(Debug, Clone)]
pub struct ImageMetadata {
    /// Source image width in pixels
    pub width: u32,

    /// Source image height in pixels
    pub height: u32,

    /// Base64 perceptual placeholder, or None when generation failed
    pub thumb_hash: Option<String>,
}

// =============================================================================
// Transform Service
// =============================================================================

/// Orchestrator for the transform and metadata pipelines.
///
/// Generic over the fetch and hash gateways so the transport and hashing
/// backends are configuration choices; the pipeline logic is written
/// once.
///
/// # Type Parameters
///
/// * `F` - Remote fetch gateway
/// * `H` - Placeholder hash gateway
///
/// # Example
///
/// ```ignore
/// use image_relay::transform::{TransformParams, TransformService};
/// use image_relay::{codec::CodecGateway, fetch::HttpFetcher, hash::ThumbHashGenerator};
///
/// let service = TransformService::new(
///     HttpFetcher::new()?,
///     ThumbHashGenerator::new(),
///     CodecGateway::new(),
/// );
///
/// let output = service.transform(&params).await?;
/// println!("{} bytes as {}", output.data.len(), output.content_type);
/// ```
pub struct TransformService<F: FetchGateway, H: HashGateway> {
    fetcher: F,
    hasher: H,
    codecs: CodecGateway,
}

impl<F: FetchGateway, H: HashGateway> TransformService<F, H> {
    /// Create a service over the given gateways.
    pub fn new(fetcher: F, hasher: H, codecs: CodecGateway) -> Self {
        Self {
            fetcher,
            hasher,
            codecs,
        }
    }

    /// Run the transform pipeline for one request.
    ///
    /// # Pipeline
    ///
    /// 1. Fetch the source bytes
    /// 2. Sniff the format; unknown bytes pass through verbatim even when
    ///    resize or format parameters were supplied
    /// 3. Fast path: nothing to do, return the source bytes verbatim
    /// 4. Initialize codecs (once per process)
    /// 5. Decode, resolve target size, resize, encode
    pub async fn transform(
        &self,
        params: &TransformParams,
    ) -> Result<TransformOutput, TransformError> {
        let fetched = self.fetcher.fetch(&params.url).await?;

        let source_format = match detect_format(&fetched.buffer, fetched.content_type.as_deref()) {
            Some(format) => format,
            None => {
                // Unsupported source formats are never transformed
                debug!(url = %params.url, "unrecognized source format, passing through");
                return Ok(passthrough(fetched, None));
            }
        };

        let format_is_noop =
            params.format.is_none() || params.format == Some(source_format);
        if !params.wants_resize() && format_is_noop {
            debug!(
                url = %params.url,
                format = source_format.name(),
                "no transformation requested, passing through"
            );
            return Ok(passthrough(fetched, Some(source_format)));
        }

        self.codecs.ensure_initialised().await?;

        let raster = self.codecs.decode(&fetched.buffer, source_format)?;

        let raster = if params.wants_resize() {
            let target = dimensions::resolve(
                raster.width(),
                raster.height(),
                params.width,
                params.height,
            )?;
            self.codecs.resize(&raster, target.width, target.height)?
        } else {
            raster
        };

        let target_format = params.format.unwrap_or(source_format);
        let data = self.codecs.encode(&raster, target_format)?;

        debug!(
            url = %params.url,
            source = source_format.name(),
            target = target_format.name(),
            width = raster.width(),
            height = raster.height(),
            bytes = data.len(),
            "transformed image"
        );

        Ok(TransformOutput {
            data,
            content_type: target_format.content_type().to_string(),
            transformed: true,
        })
    }

    /// Run the metadata pipeline for one request.
    ///
    /// Reports the decoded dimensions plus a perceptual placeholder.
    /// Hash generation is best-effort: a failure is logged and the
    /// placeholder is null, because width/height are still useful
    /// without it.
    pub async fn metadata(&self, url: &str) -> Result<ImageMetadata, TransformError> {
        let fetched = self.fetcher.fetch(url).await?;

        self.codecs.ensure_initialised().await?;

        let source_format = detect_format(&fetched.buffer, fetched.content_type.as_deref())
            .ok_or(TransformError::UnsupportedFormat)?;

        let raster = self.codecs.decode(&fetched.buffer, source_format)?;

        let thumb_hash = match self.hasher.generate(&raster) {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!(url = %url, error = %err, "placeholder hash generation failed");
                None
            }
        };

        Ok(ImageMetadata {
            width: raster.width(),
            height: raster.height(),
            thumb_hash,
        })
    }

    /// The codec gateway backing this service.
    pub fn codecs(&self) -> &CodecGateway {
        &self.codecs
    }
}

/// Build a verbatim passthrough response from the fetched payload.
///
/// Content type preference: upstream declaration, then sniffed format,
/// then a generic binary type.
fn passthrough(fetched: FetchedImage, sniffed: Option<ImageFormat>) -> TransformOutput {
    let content_type = fetched
        .content_type
        .unwrap_or_else(|| {
            sniffed
                .map(|format| format.content_type().to_string())
                .unwrap_or_else(|| OCTET_STREAM.to_string())
        });

    TransformOutput {
        data: fetched.buffer,
        content_type,
        transformed: false,
    }
}

// =============================================================================
// Tests
// =============================================================================
