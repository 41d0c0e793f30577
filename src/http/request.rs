//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Extract the routing-relevant hostname
//! - Rewrite the path of blocked viewer requests to the not-found route
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Hostname comes from the URI authority (HTTP/2, absolute-form) before the
//!   Host header, and is normalized the same way as configured hosts

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderName, HeaderValue, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::normalize_host;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates `x-request-id` values from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID set by the request-id layer, or `"unknown"`.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Normalized hostname of the request, empty when none was sent.
pub fn request_hostname<B>(req: &Request<B>) -> String {
    let raw = req
        .uri()
        .host()
        .or_else(|| {
            req.headers()
                .get(axum::http::header::HOST)
                .and_then(|h| h.to_str().ok())
        })
        .unwrap_or_default();
    normalize_host(raw)
}

/// Replace the request path, keeping the query string.
pub fn rewrite_path(req: Request<Body>, path: &str) -> Result<Request<Body>, axum::http::Error> {
    let (mut parts, body) = req.into_parts();
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    parts.uri = Uri::from_parts(uri_parts)?;
    Ok(Request::from_parts(parts, body))
}
