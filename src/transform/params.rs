//! Query parameter validation for the transform endpoint.
//!
//! Raw query strings are deserialized as-is and validated here so that
//! every rejection carries an exact, user-visible message. Numeric
//! parameters are kept as `f64` until dimension resolution; fractional
//! requests are legal and round at the resolver.

use serde::Deserialize;

use crate::error::TransformError;
use crate::format::ImageFormat;

// =============================================================================
// Raw Query
// =============================================================================

/// Unvalidated query parameters, exactly as they appear on the URL.
#[derive(Debug, Default, Deserialize)]
pub struct RawTransformQuery {
    /// Absolute URL of the source image
    #[serde(default)]
    pub url: Option<String>,

    /// Requested output width in pixels
    #[serde(default)]
    pub width: Option<String>,

    /// Requested output height in pixels
    #[serde(default)]
    pub height: Option<String>,

    /// Requested output format (jpeg|jpg|png|webp|avif)
    #[serde(default)]
    pub format: Option<String>,
}

/// Unvalidated query parameters for the metadata endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RawMetaQuery {
    /// Absolute URL of the source image
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Validated Parameters
// =============================================================================

/// Validated transform request parameters.
#[derive(Debug, Clone)]
pub struct TransformParams {
    pub url: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub format: Option<ImageFormat>,
}

impl TransformParams {
    /// Validate a raw query into transform parameters.
    ///
    /// # Errors
    /// `TransformError::InvalidParameter` with an exact message naming
    /// the offending parameter.
    pub fn from_query(query: RawTransformQuery) -> Result<Self, TransformError> {
        let url = require_url(query.url)?;
        let width = parse_dimension(query.width.as_deref(), "Invalid width parameter.")?;
        let height = parse_dimension(query.height.as_deref(), "Invalid height parameter.")?;
        let format = match query.format.as_deref() {
            None => None,
            Some(value) => Some(ImageFormat::from_param(value).ok_or_else(|| {
                TransformError::InvalidParameter(
                    "Unsupported output format requested.".to_string(),
                )
            })?),
        };

        Ok(Self {
            url,
            width,
            height,
            format,
        })
    }

    /// Whether any resize was requested.
    pub fn wants_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Validate the `url` parameter shared by both endpoints.
pub fn require_url(url: Option<String>) -> Result<String, TransformError> {
    match url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(TransformError::InvalidParameter(
            "Missing url parameter.".to_string(),
        )),
    }
}

/// Parse an optional dimension string into a finite positive number.
fn parse_dimension(value: Option<&str>, message: &str) -> Result<Option<f64>, TransformError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(Some(parsed)),
            _ => Err(TransformError::InvalidParameter(message.to_string())),
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
