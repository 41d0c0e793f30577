//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (APP_BASE_HOST / RUNTIME_MODE / WEBHOOK_BASE_HOST overrides)
//!     → validation.rs (semantic checks)
//!     → DispatcherConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the dispatcher never re-reads env vars
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, load_from_env, ConfigError};
pub use schema::{
    DispatcherConfig, DomainsConfig, EnvironmentConfig, ListenerConfig, ObservabilityConfig,
    PathsConfig, RuntimeMode, TimeoutConfig, UpstreamsConfig,
};
pub use validation::ValidationError;
