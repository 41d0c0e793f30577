//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate listener and metrics addresses
//! - Check upstream URLs are plain `http://` base URLs
//! - Reject empty path fragments (an empty fragment matches every path)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DispatcherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::DispatcherConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream `{name}` has invalid URL `{value}`: {reason}")]
    InvalidUpstream {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("app_base_host `{0}` must be a bare host, not a URL")]
    AppHostHasScheme(String),

    #[error("{list} contains an empty entry")]
    EmptyFragment { list: &'static str },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.environment.app_base_host.contains("://") {
        errors.push(ValidationError::AppHostHasScheme(
            config.environment.app_base_host.clone(),
        ));
    }

    let upstreams = &config.upstreams;
    for (name, value) in [
        ("analytics", &upstreams.analytics),
        ("webhook", &upstreams.webhook),
        ("domain", &upstreams.domain),
        ("app", &upstreams.app),
        ("next", &upstreams.next),
    ] {
        if let Err(reason) = check_upstream(value) {
            errors.push(ValidationError::InvalidUpstream {
                name,
                value: value.clone(),
                reason,
            });
        }
    }

    for (list, entries) in [
        ("paths.blocked_pathnames", &config.paths.blocked_pathnames),
        ("paths.matcher_exclusions", &config.paths.matcher_exclusions),
        ("domains.development_fragments", &config.domains.development_fragments),
        ("domains.first_party_fragments", &config.domains.first_party_fragments),
        ("domains.platform_suffixes", &config.domains.platform_suffixes),
    ] {
        if entries.iter().any(|e| e.is_empty()) {
            errors.push(ValidationError::EmptyFragment { list });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
