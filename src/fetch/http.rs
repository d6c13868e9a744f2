//! HTTP implementation of the fetch gateway.
//!
//! Streams the upstream response body with a hard size cap so a
//! malicious or misconfigured source cannot exhaust memory, and
//! classifies transport failures into [`FetchError`] variants.

use async_trait::async_trait;
use bytes::BytesMut;
use futures::StreamExt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

use super::{FetchGateway, FetchedImage};

/// Default upstream request timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default maximum response body size (50 MiB).
pub const DEFAULT_MAX_FETCH_BYTES: usize = 50 * 1024 * 1024;

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// reqwest-backed implementation of [`FetchGateway`].
///
/// # Example
///
/// ```ignore
/// use image_relay::fetch::{FetchGateway, HttpFetcher};
///
/// let fetcher = HttpFetcher::new()?;
/// let fetched = fetcher.fetch("https://example.com/photo.jpg").await?;
/// println!("{} bytes, type {:?}", fetched.buffer.len(), fetched.content_type);
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher with default timeout and size cap.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_limits(
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            DEFAULT_MAX_FETCH_BYTES,
        )
    }

    /// Create a fetcher with a specific timeout and response-size cap.
    pub fn with_limits(timeout: Duration, max_bytes: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("image-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Connection {
                message: format!("failed to build HTTP client: {}", err),
            })?;

        Ok(Self { client, max_bytes })
    }

    /// The configured response-size cap in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate that the URL is absolute http(s) before dialing.
    fn parse_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(FetchError::InvalidUrl {
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl FetchGateway for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let parsed = Self::parse_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|err| FetchError::Connection {
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        // Reject early when the upstream declares an oversized body
        if let Some(length) = response.content_length() {
            if length as usize > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        // Stream with a running cap; Content-Length can lie or be absent
        let mut buffer = BytesMut::with_capacity(8 * 1024);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| FetchError::Connection {
                message: err.to_string(),
            })?;
            if buffer.len() + chunk.len() > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        debug!(
            url = url,
            bytes = buffer.len(),
            content_type = content_type.as_deref().unwrap_or("-"),
            "fetched source image"
        );

        Ok(FetchedImage {
            buffer: buffer.freeze(),
            content_type,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
