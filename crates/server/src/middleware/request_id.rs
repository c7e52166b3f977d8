//! Request ID middleware
//!
//! Attaches a fresh UUID to each request (extension + response header) and
//! emits one structured log line per completed request.

use axum::{body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Header name for request ID. Must be lowercase: `&'static str` header
/// names go through `HeaderName::from_static`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID stored in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Middleware that assigns a request ID and logs request completion
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;

    tracing::info!(
        request_id = %id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
