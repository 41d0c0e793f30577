//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, hostname extraction)
//!     → [routing layer classifies the request]
//!     → handler.rs (delegate to analytics / webhook / domain / app / next)
//!       or response.rs (not-found rewrite)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{Handler, Handlers, Upstream, UpstreamError};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
