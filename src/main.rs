//! image-relay - An on-demand image transformation proxy.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_relay::{
    codec::CodecGateway,
    config::Config,
    fetch::HttpFetcher,
    hash::ThumbHashGenerator,
    server::{create_router, RouterConfig},
    transform::TransformService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("image-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Fetch timeout: {}s", config.fetch_timeout);
    info!(
        "  Max source size: {}MB",
        config.max_fetch_bytes / (1024 * 1024)
    );
    info!("  JPEG quality: {}", config.jpeg_quality);
    info!("  Cache max-age: {}s", config.cache_max_age);

    // Create the fetch gateway
    let fetcher = match HttpFetcher::with_limits(
        Duration::from_secs(config.fetch_timeout),
        config.max_fetch_bytes,
    ) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Create the transform service. Codecs initialize lazily on first use.
    let service = TransformService::new(
        fetcher,
        ThumbHashGenerator::new(),
        CodecGateway::with_quality(config.jpeg_quality),
    );

    // Build router configuration
    let mut router_config = RouterConfig::new()
        .with_cache_max_age(config.cache_max_age)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Create router
    let router = create_router(service, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!(
        "    curl 'http://{}/?url=https://example.com/photo.jpg&width=320'",
        addr
    );
    info!(
        "    curl 'http://{}/meta?url=https://example.com/photo.jpg'",
        addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_relay=debug,tower_http=debug"
    } else {
        "image_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
