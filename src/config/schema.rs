//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the dispatcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Process environment the classifier reads (base host, runtime mode).
    pub environment: EnvironmentConfig,

    /// Host fragments used to tell first-party hosts from tenant domains.
    pub domains: DomainsConfig,

    /// Path lists: blocked viewer fragments and matcher exclusions.
    pub paths: PathsConfig,

    /// Where each handler forwards to.
    pub upstreams: UpstreamsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Runtime mode of the process.
///
/// Only `development` is significant; every other value behaves the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RuntimeMode {
    Development,
    #[default]
    Other,
}

impl RuntimeMode {
    pub fn is_development(self) -> bool {
        self == RuntimeMode::Development
    }
}

impl From<&str> for RuntimeMode {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("development") {
            RuntimeMode::Development
        } else {
            RuntimeMode::Other
        }
    }
}

impl From<String> for RuntimeMode {
    fn from(value: String) -> Self {
        RuntimeMode::from(value.as_str())
    }
}

impl From<RuntimeMode> for String {
    fn from(mode: RuntimeMode) -> Self {
        match mode {
            RuntimeMode::Development => "development".to_string(),
            RuntimeMode::Other => "production".to_string(),
        }
    }
}

/// Environment context.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Canonical host of the application itself (may carry a port).
    pub app_base_host: String,

    pub runtime_mode: RuntimeMode,

    /// Host that receives inbound webhook deliveries, if any.
    pub webhook_base_host: Option<String>,
}

/// Host fragments for custom-domain detection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainsConfig {
    /// In development, a host containing any of these is a custom domain.
    pub development_fragments: Vec<String>,

    /// Outside development, a host containing any of these is first-party.
    pub first_party_fragments: Vec<String>,

    /// Outside development, a host ending with any of these is first-party.
    pub platform_suffixes: Vec<String>,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            development_fragments: vec![".local".to_string(), "papermark.dev".to_string()],
            first_party_fragments: vec![
                "localhost".to_string(),
                "papermark.io".to_string(),
                "papermark.com".to_string(),
            ],
            platform_suffixes: vec![".vercel.app".to_string()],
        }
    }
}

/// Path lists consulted before and during classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Fragments that get a viewer path rewritten to the not-found route.
    pub blocked_pathnames: Vec<String>,

    /// Leading segments (after the first `/`) that bypass classification.
    pub matcher_exclusions: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            blocked_pathnames: [
                "/phpmyadmin",
                "/server-status",
                "/wordpress",
                "/_all_dbs",
                "/wp-json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            matcher_exclusions: [
                "api/",
                "_next/",
                "_static",
                "vendor",
                "_icons",
                "_vercel",
                "favicon.ico",
                "sitemap.xml",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Upstream base URLs, one per handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    pub analytics: String,
    pub webhook: String,
    pub domain: String,
    pub app: String,

    /// Next stage of the pipeline: pass-through and not-found rewrites.
    pub next: String,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            analytics: "http://127.0.0.1:3001".to_string(),
            webhook: "http://127.0.0.1:3002".to_string(),
            domain: "http://127.0.0.1:3003".to_string(),
            app: "http://127.0.0.1:3004".to_string(),
            next: "http://127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
