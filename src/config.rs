//! Configuration management for image-relay.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `RELAY_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use image_relay::config::Config;
//!
//! // Parse from command line and environment
//! let config = Config::parse();
//!
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `RELAY_HOST` - Server bind address (default: 0.0.0.0)
//! - `RELAY_PORT` - Server port (default: 3000)
//! - `RELAY_FETCH_TIMEOUT` - Upstream fetch timeout in seconds (default: 30)
//! - `RELAY_MAX_FETCH_BYTES` - Max source image size in bytes (default: 50 MiB)
//! - `RELAY_JPEG_QUALITY` - JPEG encode quality (default: 80)
//! - `RELAY_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 31536000)
//! - `RELAY_CORS_ORIGINS` - Comma-separated allowed origins

use clap::Parser;

use crate::codec::DEFAULT_JPEG_QUALITY;
use crate::fetch::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_FETCH_BYTES};
use crate::server::DEFAULT_CACHE_MAX_AGE;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// image-relay - An on-demand image transformation proxy.
///
/// Fetches images from remote URLs and serves resized, reformatted
/// variants with long-lived cache headers.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-relay")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "RELAY_PORT")]
    pub port: u16,

    // =========================================================================
    // Fetch Configuration
    // =========================================================================
    /// Upstream fetch timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS, env = "RELAY_FETCH_TIMEOUT")]
    pub fetch_timeout: u64,

    /// Maximum source image size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FETCH_BYTES, env = "RELAY_MAX_FETCH_BYTES")]
    pub max_fetch_bytes: usize,

    // =========================================================================
    // Transform Configuration
    // =========================================================================
    /// JPEG quality for encoded output (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "RELAY_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// HTTP Cache-Control max-age in seconds.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "RELAY_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "RELAY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if self.fetch_timeout == 0 {
            return Err("fetch_timeout must be greater than 0".to_string());
        }

        // Even a 1x1 PNG needs a few dozen bytes
        if self.max_fetch_bytes < 1024 {
            return Err("max_fetch_bytes must be at least 1024".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
