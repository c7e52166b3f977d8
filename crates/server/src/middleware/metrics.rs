//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// `/api/v1/{collection}/{param}/{sub}/{param}` keeps the collection and sub
/// segments; the parameter segments collapse to `:id`.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 5 || segments.get(1) != Some(&"api") {
        return path.to_string();
    }
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| if i == 4 || i == 6 { ":id" } else { *seg })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn collapses_path_parameters() {
        assert_eq!(
            normalize_path("/api/v1/providers/prov_001"),
            "/api/v1/providers/:id"
        );
        assert_eq!(
            normalize_path("/api/v1/specialties/cardiologist/providers"),
            "/api/v1/specialties/:id/providers"
        );
        assert_eq!(
            normalize_path("/api/v1/providers/prov_001/procedures/mri-brain"),
            "/api/v1/providers/:id/procedures/:id"
        );
    }

    #[test]
    fn leaves_fixed_paths_alone() {
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/api/v1/specialties"), "/api/v1/specialties");
    }
}
