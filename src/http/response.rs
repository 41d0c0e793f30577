//! Responses the dispatcher produces itself.
//!
//! # Responsibilities
//! - Serve the not-found rewrite for blocked viewer paths
//!
//! # Design Decisions
//! - The rewrite is rendered by the next stage (so the app's own 404 page is
//!   shown) but the status is always 404
//! - If the next stage fails, a bare 404 is returned instead of its error

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::handler::Handler;
use crate::http::request::{request_id, rewrite_path};
use crate::routing::predicates::NOT_FOUND_PATH;

/// Rewrite the request to the not-found route and answer with status 404.
pub async fn not_found_rewrite(next: &dyn Handler, req: Request<Body>) -> Response {
    let request_id = request_id(&req).to_string();
    let rewritten = match rewrite_path(req, NOT_FOUND_PATH) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Not-found rewrite failed");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let mut response = next.handle(rewritten).await;
    if response.status().is_server_error() {
        return StatusCode::NOT_FOUND.into_response();
    }
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}
