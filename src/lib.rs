//! Edge request dispatcher library.
//!
//! Classifies every inbound request by host and path and hands it to exactly
//! one downstream handler: analytics, webhook, tenant custom domain, the app,
//! or the next pipeline stage.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::DispatcherConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Decision, Dispatcher, RequestTarget};
