//! Request metrics middleware.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::telemetry::HttpMetrics;

/// Times every request and records it under its method, route and status.
///
/// The route label is the matched route pattern. Requests that match no route
/// are labelled with their raw path, so arbitrary 404 paths each create a new
/// series.
pub async fn track_metrics(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = match request.extensions().get::<MatchedPath>() {
        Some(path) => path.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };

    let _in_flight = metrics.track_connection();
    let response = next.run(request).await;

    metrics.record_request(&method, &route, response.status().as_u16(), start.elapsed());
    response
}
