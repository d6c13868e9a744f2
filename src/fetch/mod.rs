//! Remote fetch gateway.
//!
//! The transform pipeline is generic over how source bytes are
//! retrieved. The [`FetchGateway`] trait is that seam: production uses
//! the reqwest-backed [`HttpFetcher`], tests inject in-memory mocks.

mod http;

pub use http::{HttpFetcher, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_FETCH_BYTES};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

// =============================================================================
// Fetched Image
// =============================================================================

/// A payload retrieved from a remote URL, exactly as received.
///
/// The buffer is never mutated; the declared content-type is carried
/// along as a sniffing tie-break and passthrough content-type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw response body
    pub buffer: Bytes,

    /// `Content-Type` header as declared by the upstream, if any
    pub content_type: Option<String>,
}

// =============================================================================
// Fetch Gateway
// =============================================================================

/// Source of remote image bytes.
///
/// Implementations classify failures into [`FetchError`] variants so the
/// orchestrator can map them to HTTP statuses without knowing the
/// transport.
#[async_trait]
pub trait FetchGateway: Send + Sync {
    /// Retrieve the payload at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError>;
}
