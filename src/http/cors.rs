//! CORS response headers.
//!
//! Credentials are always allowed; the allowed origin echoes the caller's
//! first `Origin` header, or `*` when there is none.

use axum::{
    extract::Request,
    http::{
        header::{ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
};

/// Write the CORS headers for a request that carried `origin`.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
    headers.insert(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
    let allow_origin = origin
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
}

/// Middleware for `axum::middleware::from_fn`.
pub async fn cors(request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();
    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), origin.as_ref());
    response
}
