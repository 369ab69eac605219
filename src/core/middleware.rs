//! Request logging middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// Logs method, path, status and latency for every request.
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    info!(
        %method,
        %uri,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );

    response
}
