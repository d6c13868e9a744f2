//! # image-relay
//!
//! An on-demand image transformation proxy.
//!
//! This library fetches images from arbitrary remote URLs and serves
//! resized, reformatted variants, plus a lightweight metadata endpoint
//! reporting dimensions and a compact perceptual placeholder. Sources
//! that are not recognized as a supported image format are passed
//! through to the client untouched.
//!
//! ## Features
//!
//! - **Byte-signature sniffing**: Classifies untrusted payloads by magic
//!   numbers (JPEG, PNG, WEBP, AVIF); the transport's declared
//!   content-type is only a tie-break
//! - **Aspect-preserving resize**: One requested dimension derives the
//!   other from the source aspect ratio; two explicit dimensions are
//!   honored verbatim
//! - **Passthrough fast path**: Requests that need no transformation
//!   return the fetched bytes byte-identical
//! - **Placeholder hashes**: `/meta` reports a base64 thumbhash for
//!   low-fidelity previews
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`mod@format`] - Supported formats and byte-signature sniffing
//! - [`fetch`] - Remote fetch gateway (trait + reqwest implementation)
//! - [`codec`] - Decode/resize/encode gateway with one-time initialization
//! - [`hash`] - Perceptual placeholder hash gateway
//! - [`transform`] - Parameter validation, dimension resolution, and the
//!   pipeline orchestrator
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types

pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod format;
pub mod hash;
pub mod server;
pub mod transform;

// Re-export commonly used types
pub use codec::{CodecGateway, DEFAULT_JPEG_QUALITY, MAX_TARGET_DIMENSION};
pub use config::Config;
pub use error::{FetchError, HashError, TransformError};
pub use fetch::{FetchGateway, FetchedImage, HttpFetcher};
pub use format::{detect_format, ImageFormat};
pub use hash::{HashGateway, ThumbHashGenerator};
pub use server::{
    create_router, AppState, ErrorResponse, HealthResponse, MetaResponse, RouterConfig,
    DEFAULT_CACHE_MAX_AGE,
};
pub use transform::{
    resolve, ImageMetadata, RawMetaQuery, RawTransformQuery, ResolvedDimensions, TransformOutput,
    TransformParams, TransformService,
};
