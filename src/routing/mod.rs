//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → matcher.rs (excluded asset/internal paths skip classification)
//!     → host.rs (normalize host: lowercase, drop port)
//!     → predicates.rs (analytics / webhook / custom domain / blocked path)
//!     → dispatcher.rs (ordered rule table, first match wins)
//!     → Return: exactly one Decision
//!
//! Dispatcher Construction (at startup):
//!     DispatcherConfig
//!     → Environment (normalized base host, runtime mode)
//!     → Freeze as immutable Dispatcher
//! ```
//!
//! # Design Decisions
//! - Built at startup, immutable at runtime
//! - No regex in hot path (prefix and substring matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins (ordered rule table)

pub mod dispatcher;
pub mod host;
pub mod matcher;
pub mod predicates;

pub use dispatcher::{Decision, Dispatcher, RequestTarget, Rule};
pub use host::normalize_host;
pub use matcher::ExclusionMatcher;
pub use predicates::{Environment, WebhookHost, WebhookMatcher};
