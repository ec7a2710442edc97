pub mod middleware;
pub mod registry;

use anyhow::Context;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::IntoResponse,
};
use prometheus::{Encoder, TextEncoder};

use crate::errors::HandlerResult;

/// Handler for the /metrics endpoint.
///
/// Returns metrics in Prometheus exposition format. Encoding failures are
/// internal errors and go through the adapter like any other handler error.
pub async fn metrics_handler(_request: Request) -> HandlerResult {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    let body = String::from_utf8(buffer).context("Metrics output was not UTF-8")?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response())
}

// Re-export commonly used metrics for convenience
pub use registry::{
    ERRORS_DISPATCHED_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
    PANICS_RECOVERED_TOTAL,
};
