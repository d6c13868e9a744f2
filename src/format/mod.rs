//! Image format classification.
//!
//! This module defines the closed set of image formats the service can
//! transform, and the byte-signature sniffer that classifies untrusted
//! payloads fetched from remote URLs.
//!
//! Unknown formats are not an error: a payload that matches no signature
//! is passed through to the client unmodified.

mod sniff;

pub use sniff::{detect_format, SNIFF_PREFIX_LEN};

// =============================================================================
// ImageFormat
// =============================================================================

/// A supported image format.
///
/// This is the closed set of encodings the service can decode and encode.
/// Anything else classifies to `None` at the sniffing stage and bypasses
/// the transform pipeline entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Avif,
}

impl ImageFormat {
    /// Parse a user-supplied `format` query parameter.
    ///
    /// Case-insensitive; `jpg` aliases to JPEG. Returns `None` for
    /// anything outside the supported set.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            "avif" => Some(ImageFormat::Avif),
            _ => None,
        }
    }

    /// Map a declared `Content-Type` header value to a format.
    ///
    /// Used only as a sniffing tie-break; any parameters after a `;` are
    /// ignored.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            "image/avif" => Some(ImageFormat::Avif),
            _ => None,
        }
    }

    /// The `Content-Type` value for responses in this format.
    pub const fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Webp => "image/webp",
            ImageFormat::Avif => "image/avif",
        }
    }

    /// Short lowercase name, as used in parameters and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
        }
    }

    /// The corresponding `image` crate format for codec dispatch.
    pub const fn codec_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Webp => image::ImageFormat::WebP,
            ImageFormat::Avif => image::ImageFormat::Avif,
        }
    }
}
