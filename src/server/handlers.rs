//! HTTP request handlers for the transform and metadata API.
//!
//! # Endpoints
//!
//! - `GET /` and `GET /image-transformer` - Transform an image
//! - `GET /meta` and `GET /image-transformer/meta` - Image metadata
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::TransformError;
use crate::fetch::FetchGateway;
use crate::hash::HashGateway;
use crate::transform::{
    params::require_url, RawMetaQuery, RawTransformQuery, TransformOutput, TransformParams,
    TransformService,
};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the transform service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<F: FetchGateway, H: HashGateway> {
    /// The transform service for processing requests
    pub service: Arc<TransformService<F, H>>,

    /// Cache-Control max-age in seconds for successful responses
    pub cache_max_age: u32,
}

impl<F: FetchGateway, H: HashGateway> AppState<F, H> {
    /// Create application state with the given cache max-age.
    pub fn new(service: TransformService<F, H>, cache_max_age: u32) -> Self {
        Self {
            service: Arc::new(service),
            cache_max_age,
        }
    }
}

impl<F: FetchGateway, H: HashGateway> Clone for AppState<F, H> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error body returned for every terminal error state.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// User-visible error message
    pub error: String,
}

/// Response from the metadata endpoint.
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    /// Source image width in pixels
    pub width: u32,

    /// Source image height in pixels
    pub height: u32,

    /// Base64 perceptual placeholder, null when generation failed
    #[serde(rename = "thumbHash")]
    pub thumb_hash: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert TransformError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 4xx errors are logged at WARN level (client errors)
/// - 5xx errors are logged at ERROR level (server errors)
///
/// The response body carries only the generic user-visible message;
/// internal detail stays in the server logs.
impl IntoResponse for TransformError {
    fn into_response(self) -> Response {
        let status = self.status();
        let stage = self.stage();
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                stage = stage,
                status = status.as_u16(),
                detail = self.detail().unwrap_or("-"),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            // Upstream 404s are common and expected
            debug!(
                stage = stage,
                status = status.as_u16(),
                "Upstream not found: {}",
                message
            );
        } else {
            warn!(
                stage = stage,
                status = status.as_u16(),
                detail = self.detail().unwrap_or("-"),
                "Client error: {}",
                message
            );
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle transform requests.
///
/// # Endpoint
///
/// `GET /?url=...` (also mounted at `/image-transformer`)
///
/// # Query Parameters
///
/// - `url`: Absolute URL of the source image (required)
/// - `width`: Target width in pixels (optional, positive number)
/// - `height`: Target height in pixels (optional, positive number)
/// - `format`: Output format, one of jpeg|jpg|png|webp|avif (optional)
///
/// # Response
///
/// - `200 OK`: Image bytes with matching `Content-Type`; unrecognized
///   source formats are returned verbatim
/// - `400 Bad Request`: Missing/invalid parameter
/// - `422 Unprocessable Entity`: Source bytes could not be decoded or resized
/// - `500 Internal Server Error`: Codec initialization or encoding failure
/// - `502 Bad Gateway` (or upstream status): Source fetch failed
///
/// # Headers
///
/// - `Content-Type`: output format
/// - `Content-Length`: explicit body length
/// - `Cache-Control: public, max-age={cache_max_age}`
pub async fn transform_handler<F, H>(
    State(state): State<AppState<F, H>>,
    Query(query): Query<RawTransformQuery>,
) -> Result<Response, TransformError>
where
    F: FetchGateway + 'static,
    H: HashGateway + 'static,
{
    let params = TransformParams::from_query(query)?;
    let output = state.service.transform(&params).await?;

    Ok(binary_response(output, state.cache_max_age))
}

/// Handle metadata requests.
///
/// # Endpoint
///
/// `GET /meta?url=...` (also mounted at `/image-transformer/meta`)
///
/// # Query Parameters
///
/// - `url`: Absolute URL of the source image (required)
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "width": 1920,
///   "height": 1080,
///   "thumbHash": "1QcSHQRnh493V4dIh4eXh1h4kJUI"
/// }
/// ```
///
/// `thumbHash` is null when placeholder generation fails; dimensions are
/// still reported.
///
/// # Errors
///
/// - `400 Bad Request`: Missing url parameter
/// - `415 Unsupported Media Type`: Bytes match no known image format
/// - `422 Unprocessable Entity`: Decode failure
/// - `502 Bad Gateway` (or upstream status): Source fetch failed
pub async fn meta_handler<F, H>(
    State(state): State<AppState<F, H>>,
    Query(query): Query<RawMetaQuery>,
) -> Result<Response, TransformError>
where
    F: FetchGateway + 'static,
    H: HashGateway + 'static,
{
    let url = require_url(query.url)?;
    let meta = state.service.metadata(&url).await?;

    let response = (
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.cache_max_age),
        )],
        Json(MetaResponse {
            width: meta.width,
            height: meta.height,
            thumb_hash: meta.thumb_hash,
        }),
    )
        .into_response();

    Ok(response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the binary success response with explicit length and cache headers.
fn binary_response(output: TransformOutput, cache_max_age: u32) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, output.content_type)
        .header(header::CONTENT_LENGTH, output.data.len())
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", cache_max_age),
        )
        .body(axum::body::Body::from(output.data))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================
