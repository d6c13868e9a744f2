use http::StatusCode;
use thiserror::Error;

/// Classified errors from the remote fetch gateway.
///
/// Each variant carries enough information for the orchestrator to map
/// the failure to an HTTP status: upstream statuses are propagated,
/// everything else defaults to 502 Bad Gateway.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The source URL could not be parsed as an absolute http(s) URL
    #[error("Invalid url parameter.")]
    InvalidUrl { url: String },

    /// Upstream responded with a non-2xx status
    #[error("Upstream request failed with status {status}.")]
    UpstreamStatus { status: u16 },

    /// Network failure, timeout, or protocol error
    #[error("Failed to fetch source image.")]
    Connection { message: String },

    /// Response body exceeds the configured size limit
    #[error("Source image exceeds the maximum allowed size.")]
    TooLarge { limit: usize },
}

impl FetchError {
    /// HTTP status to surface for this fetch failure.
    ///
    /// Upstream statuses pass through when they are valid error codes;
    /// anything unclassifiable becomes 502.
    pub fn status_hint(&self) -> StatusCode {
        match self {
            FetchError::InvalidUrl { .. } => StatusCode::BAD_REQUEST,
            FetchError::UpstreamStatus { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            FetchError::Connection { .. } => StatusCode::BAD_GATEWAY,
            FetchError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// Errors from the placeholder hash gateway.
///
/// Hash generation is best-effort; callers log this and substitute null
/// rather than failing the request.
#[derive(Debug, Clone, Error)]
pub enum HashError {
    /// Hash computation failed for this raster
    #[error("Failed to generate placeholder hash: {0}")]
    Generation(String),
}

/// Errors from the transform pipeline.
///
/// One variant per pipeline stage. The `Display` strings are the
/// user-visible messages returned in JSON error bodies; internal detail
/// for server-side logs lives in the variant payloads and is surfaced
/// via [`TransformError::detail`].
#[derive(Debug, Error)]
pub enum TransformError {
    /// Request parameter failed validation (message is user-visible)
    #[error("{0}")]
    InvalidParameter(String),

    /// Remote retrieval failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Bytes do not match any known image signature (metadata endpoint only)
    #[error("Unsupported image format.")]
    UnsupportedFormat,

    /// One-time codec initialization failed
    #[error("Codec initialisation failed.")]
    CodecInit { message: String },

    /// Bytes match a signature but are not valid content of that format
    #[error("Failed to decode source image.")]
    Decode { message: String },

    /// Requested dimensions could not be resolved to a sane target size
    #[error("{0}")]
    InvalidDimensions(String),

    /// Geometric transformation failed
    #[error("Failed to resize image.")]
    Resize { message: String },

    /// Output serialization failed
    #[error("Failed to encode output image.")]
    Encode { message: String },
}

impl TransformError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            TransformError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            TransformError::Fetch(err) => err.status_hint(),
            TransformError::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            TransformError::CodecInit { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TransformError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TransformError::InvalidDimensions(_) => StatusCode::BAD_REQUEST,
            TransformError::Resize { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            TransformError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Pipeline stage that produced this error, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            TransformError::InvalidParameter(_) => "parse",
            TransformError::Fetch(_) => "fetch",
            TransformError::UnsupportedFormat => "sniff",
            TransformError::CodecInit { .. } => "codec-init",
            TransformError::Decode { .. } => "decode",
            TransformError::InvalidDimensions(_) => "resolve",
            TransformError::Resize { .. } => "resize",
            TransformError::Encode { .. } => "encode",
        }
    }

    /// Internal detail for server-side logs. Never sent to clients.
    pub fn detail(&self) -> Option<&str> {
        match self {
            TransformError::Fetch(FetchError::Connection { message }) => Some(message),
            TransformError::CodecInit { message } => Some(message),
            TransformError::Decode { message } => Some(message),
            TransformError::Resize { message } => Some(message),
            TransformError::Encode { message } => Some(message),
            _ => None,
        }
    }
}
