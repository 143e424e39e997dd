use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info_span, Instrument};

/// Observability middleware: one tracing span per request carrying method,
/// route and a v7 request id, plus a completion log with status and latency.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    // Extract route pattern if available
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or("unknown")
        .to_string();

    let start_time = Instant::now();

    let tracing_span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::now_v7(),
    );

    // Execute the request within the span context
    let response = next.run(request).instrument(tracing_span).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    if status_code >= 500 {
        tracing::error!(
            target: "http",
            method = %method,
            route = %route,
            status = status_code,
            latency_ms = duration.as_millis() as u64,
            "request failed"
        );
    } else {
        tracing::info!(
            target: "http",
            method = %method,
            route = %route,
            status = status_code,
            latency_ms = duration.as_millis() as u64,
            "request completed"
        );
    }

    response
}
