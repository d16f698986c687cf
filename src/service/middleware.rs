//! Service middleware for request metrics.
//!
//! ## Metrics Exposed
//!
//! - `dependency_paths_requests_total` - Counter of requests by path, method, status
//! - `dependency_paths_request_duration_seconds` - Histogram of request latency
//! - `dependency_paths_page_size` - Histogram of paths per returned page
//!
//! Metrics are emitted as structured `tracing` events and aggregated from logs.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "dependency_paths::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Numeric and UUID path segments become `:id`.
pub fn normalize_path(path: &str) -> String {
    static ID_SEGMENT: OnceLock<Option<regex_lite::Regex>> = OnceLock::new();

    let Some(regex) = ID_SEGMENT
        .get_or_init(|| {
            regex_lite::Regex::new(
                r"^(?:[0-9]+|[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})$",
            )
            .ok()
        })
        .as_ref()
    else {
        return path.to_string();
    };

    path.split('/')
        .map(|segment| if regex.is_match(segment) { ":id" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

/// Record dependency path resolution metrics.
///
/// Call this after a page is resolved.
pub fn record_resolution_metrics(path_count: usize, latency_ms: u64) {
    info!(
        target: "dependency_paths::metrics",
        metric_type = "resolution",
        path_count = path_count,
        latency_ms = latency_ms,
        "resolution_metric"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_replaces_ids() {
        assert_eq!(normalize_path("/api/projects/42/occurrences/7"), "/api/projects/:id/occurrences/:id");
    }

    #[test]
    fn test_normalize_path_handles_adjacent_ids_and_uuids() {
        assert_eq!(normalize_path("/api/42/7/paths"), "/api/:id/:id/paths");
        assert_eq!(
            normalize_path("/api/550e8400-e29b-41d4-a716-446655440000"),
            "/api/:id"
        );
    }

    #[test]
    fn test_normalize_path_preserves_regular_path() {
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
        assert_eq!(normalize_path("/api/dependency_paths"), "/api/dependency_paths");
    }
}
