//! Transform endpoint integration tests.
//!
//! Tests verify:
//! - Resize and reformat behavior through the full HTTP stack
//! - Passthrough for unrecognized source formats
//! - Fast-path byte identity
//! - Parameter validation with exact error messages
//! - Upstream failure propagation and response headers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use image_relay::error::FetchError;

use super::test_utils::{
    create_test_jpeg, create_test_png, create_unknown_bytes, router_with, MockFetchGateway,
};

async fn get(router: axum::Router, uri: &str) -> axum::http::Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(request).await.unwrap()
}

async fn body_bytes(response: axum::http::Response<Body>) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

// =============================================================================
// Successful Transforms
// =============================================================================

#[tokio::test]
async fn test_resize_by_width() {
    let png = create_test_png(100, 50);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(router, "/?url=https://img.test/a.png&width=20").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=31536000"
    );

    let content_length: usize = response
        .headers()
        .get("content-length")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = body_bytes(response).await;
    assert_eq!(body.len(), content_length);

    // Aspect ratio preserved: 100x50 at width 20 is 20x10
    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (20, 10));
}

#[tokio::test]
async fn test_resize_by_height() {
    let png = create_test_png(100, 50);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(router, "/?url=https://img.test/a.png&height=25").await;
    assert_eq!(response.status(), StatusCode::OK);

    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 25));
}

#[tokio::test]
async fn test_both_dimensions_ignore_aspect() {
    let png = create_test_png(100, 50);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(router, "/?url=https://img.test/a.png&width=30&height=30").await;
    assert_eq!(response.status(), StatusCode::OK);

    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (30, 30));
}

#[tokio::test]
async fn test_format_conversion() {
    let png = create_test_png(16, 16);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(router, "/?url=https://img.test/a.png&format=webp").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/webp"
    );

    let body = body_bytes(response).await;
    assert_eq!(&body[0..4], b"RIFF");
    assert_eq!(&body[8..12], b"WEBP");
}

#[tokio::test]
async fn test_jpg_alias() {
    let png = create_test_png(8, 8);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(router, "/?url=https://img.test/a.png&format=jpg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );

    let body = body_bytes(response).await;
    assert_eq!(&body[0..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_historical_route_variant() {
    let png = create_test_png(10, 10);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.png",
        png,
        Some("image/png"),
    ));

    let response = get(
        router,
        "/image-transformer?url=https://img.test/a.png&width=5",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let decoded = image::load_from_memory(&body_bytes(response).await).unwrap();
    assert_eq!(decoded.width(), 5);
}

// =============================================================================
// Passthrough
// =============================================================================

#[tokio::test]
async fn test_fast_path_is_byte_identical() {
    let jpeg = create_test_jpeg(24, 24);
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.jpg",
        jpeg.clone(),
        Some("image/jpeg"),
    ));

    // Requesting the source format with no resize must not re-encode
    let response = get(router, "/?url=https://img.test/a.jpg&format=jpeg").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/jpeg"
    );

    let body = body_bytes(response).await;
    assert_eq!(body.as_ref(), jpeg.as_slice());
}

#[tokio::test]
async fn test_unknown_format_passes_through_with_parameters() {
    let gif = create_unknown_bytes();
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/a.gif",
        gif.clone(),
        Some("image/gif"),
    ));

    // Resize and format requested, but the source is not transformable
    let response = get(
        router,
        "/?url=https://img.test/a.gif&width=100&format=png",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/gif");
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=31536000"
    );

    let body = body_bytes(response).await;
    assert_eq!(body.as_ref(), gif.as_slice());
}

#[tokio::test]
async fn test_unknown_format_without_declared_type() {
    let bytes = vec![0u8; 64];
    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/blob",
        bytes.clone(),
        None,
    ));

    let response = get(router, "/?url=https://img.test/blob").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(body_bytes(response).await.as_ref(), bytes.as_slice());
}

// =============================================================================
// Parameter Validation
// =============================================================================

#[tokio::test]
async fn test_missing_url() {
    let router = router_with(MockFetchGateway::new());

    let response = get(router, "/").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "Missing url parameter.");
}

#[tokio::test]
async fn test_invalid_width() {
    let router = router_with(MockFetchGateway::new());

    let response = get(router, "/?url=https://img.test/a.png&width=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "Invalid width parameter.");
}

#[tokio::test]
async fn test_invalid_height() {
    let router = router_with(MockFetchGateway::new());

    let response = get(router, "/?url=https://img.test/a.png&height=-5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "Invalid height parameter.");
}

#[tokio::test]
async fn test_unsupported_output_format() {
    let router = router_with(MockFetchGateway::new());

    let response = get(router, "/?url=https://img.test/a.png&format=tiff").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "Unsupported output format requested.");
}

// =============================================================================
// Upstream Failures
// =============================================================================

#[tokio::test]
async fn test_upstream_404_propagates() {
    let router = router_with(MockFetchGateway::new().with_error(
        "https://img.test/missing.png",
        FetchError::UpstreamStatus { status: 404 },
    ));

    let response = get(router, "/?url=https://img.test/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_connection_failure_is_bad_gateway() {
    let router = router_with(MockFetchGateway::new().with_error(
        "https://img.test/a.png",
        FetchError::Connection {
            message: "connection refused".to_string(),
        },
    ));

    let response = get(router, "/?url=https://img.test/a.png").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_corrupt_source_is_unprocessable() {
    // JPEG signature with a garbage body forces a decode failure
    let mut corrupt = vec![0xFF, 0xD8];
    corrupt.extend_from_slice(&[0x00; 32]);

    let router = router_with(MockFetchGateway::new().with_image(
        "https://img.test/corrupt.jpg",
        corrupt,
        Some("image/jpeg"),
    ));

    let response = get(router, "/?url=https://img.test/corrupt.jpg&width=10").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let error: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(error["error"], "Failed to decode source image.");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = router_with(MockFetchGateway::new());

    let response = get(router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
}
