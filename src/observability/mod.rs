//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch path produces:
//!     → logging.rs (structured log events, request ID on every line)
//!     → metrics.rs (decision counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments) and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
