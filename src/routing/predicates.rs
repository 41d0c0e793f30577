//! Classification predicates.
//!
//! # Design Decisions
//! - Every predicate is a pure, total string check (no I/O, no failure)
//! - No regex: prefix and substring tests only
//! - Hosts are normalized inside the predicates, callers pass raw values

use std::fmt;

use crate::config::{DomainsConfig, EnvironmentConfig, RuntimeMode};
use crate::routing::host::normalize_host;

/// Analytics ingestion prefix.
pub const ANALYTICS_PREFIX: &str = "/ingest/";

/// Viewer route prefix.
pub const VIEWER_PREFIX: &str = "/view/";

/// Paths starting with any of these are not handed to the app handler.
pub const APP_EXEMPT_PREFIXES: [&str; 4] = [VIEWER_PREFIX, "/verify", "/unsubscribe", "/auth/email"];

/// Route a blocked viewer path is rewritten to.
pub const NOT_FOUND_PATH: &str = "/404";

/// Immutable environment context, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    app_base_host: String,
    runtime_mode: RuntimeMode,
}

impl Environment {
    /// The base host is stored normalized.
    pub fn new(app_base_host: &str, runtime_mode: RuntimeMode) -> Self {
        Self {
            app_base_host: normalize_host(app_base_host),
            runtime_mode,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(&config.app_base_host, config.runtime_mode)
    }

    pub fn app_base_host(&self) -> &str {
        &self.app_base_host
    }

    pub fn runtime_mode(&self) -> RuntimeMode {
        self.runtime_mode
    }
}

/// True for `/ingest/` followed by anything, including nothing.
pub fn is_analytics_path(path: &str) -> bool {
    path.starts_with(ANALYTICS_PREFIX)
}

/// Decide whether `hostname` is a tenant-owned custom domain.
///
/// The app's own base host is never a custom domain, whatever the mode.
/// An empty hostname outside development counts as custom, since it contains
/// none of the first-party fragments.
pub fn is_custom_domain(hostname: &str, env: &Environment, domains: &DomainsConfig) -> bool {
    let host = normalize_host(hostname);

    if !env.app_base_host.is_empty() && host == env.app_base_host {
        return false;
    }

    if env.runtime_mode.is_development() {
        domains
            .development_fragments
            .iter()
            .any(|fragment| host.contains(fragment.as_str()))
    } else {
        let first_party = domains
            .first_party_fragments
            .iter()
            .any(|fragment| host.contains(fragment.as_str()))
            || domains
                .platform_suffixes
                .iter()
                .any(|suffix| host.ends_with(suffix.as_str()));
        !first_party
    }
}

/// True if the path contains a blocked fragment or any `.` at all.
///
/// The dot check also catches legitimate dotted slugs; that is accepted.
pub fn is_blocked_pathname(path: &str, blocked: &[String]) -> bool {
    blocked.iter().any(|fragment| path.contains(fragment.as_str())) || path.contains('.')
}

/// Decides whether a hostname belongs to inbound webhook delivery.
///
/// The rule belongs to the webhook handler; the dispatcher only consumes the
/// answer.
pub trait WebhookMatcher: Send + Sync + fmt::Debug {
    fn is_webhook_host(&self, hostname: &str) -> bool;
}

/// Matches a single configured webhook host.
#[derive(Debug, Clone, Default)]
pub struct WebhookHost {
    host: Option<String>,
}

impl WebhookHost {
    pub fn new(host: Option<&str>) -> Self {
        Self {
            host: host.map(normalize_host).filter(|h| !h.is_empty()),
        }
    }
}

impl WebhookMatcher for WebhookHost {
    fn is_webhook_host(&self, hostname: &str) -> bool {
        match &self.host {
            Some(expected) => normalize_host(hostname) == *expected,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production(app_host: &str) -> Environment {
        Environment::new(app_host, RuntimeMode::Other)
    }

    fn development(app_host: &str) -> Environment {
        Environment::new(app_host, RuntimeMode::Development)
    }

    #[test]
    fn test_analytics_path() {
        assert!(is_analytics_path("/ingest/events"));
        assert!(is_analytics_path("/ingest/"));
        assert!(is_analytics_path("/ingest/static/array.js"));
        assert!(!is_analytics_path("/ingest"));
        assert!(!is_analytics_path("/view/ingest/x"));
        assert!(!is_analytics_path("/INGEST/events"));
    }

    #[test]
    fn test_app_host_never_custom() {
        let domains = DomainsConfig::default();
        for env in [
            production("Docs.Customer.com:443"),
            development("Docs.Customer.com:443"),
        ] {
            assert!(!is_custom_domain("docs.customer.com", &env, &domains));
            assert!(!is_custom_domain("DOCS.CUSTOMER.COM:8443", &env, &domains));
        }
        // The same host classifies as custom once the base host differs.
        assert!(is_custom_domain("docs.customer.com", &production("app.papermark.com"), &domains));
    }

    #[test]
    fn test_development_mode() {
        let env = development("localhost:3000");
        let domains = DomainsConfig::default();
        assert!(is_custom_domain("tenant.papermark.dev", &env, &domains));
        assert!(is_custom_domain("docs.acme.local", &env, &domains));
        assert!(!is_custom_domain("localhost", &env, &domains));
        assert!(!is_custom_domain("docs.acme.com", &env, &domains));
        assert!(!is_custom_domain("", &env, &domains));
    }

    #[test]
    fn test_production_mode() {
        let env = production("app.papermark.com");
        let domains = DomainsConfig::default();
        assert!(!is_custom_domain("myapp.vercel.app", &env, &domains));
        assert!(!is_custom_domain("www.papermark.io", &env, &domains));
        assert!(!is_custom_domain("papermark.com", &env, &domains));
        assert!(!is_custom_domain("localhost", &env, &domains));
        assert!(is_custom_domain("docs.acme.com", &env, &domains));
        // suffix, not substring
        assert!(is_custom_domain("x.vercel.app.acme.com", &env, &domains));
    }

    #[test]
    fn test_empty_host_is_custom_outside_development() {
        let domains = DomainsConfig::default();
        assert!(is_custom_domain("", &production("app.papermark.com"), &domains));
        assert!(is_custom_domain("", &production(""), &domains));
    }

    #[test]
    fn test_empty_base_host_is_ignored() {
        let domains = DomainsConfig::default();
        assert!(is_custom_domain("docs.acme.com", &production(""), &domains));
        assert!(!is_custom_domain("", &development(""), &domains));
    }

    #[test]
    fn test_blocked_pathname() {
        let blocked = crate::config::PathsConfig::default().blocked_pathnames;
        assert!(is_blocked_pathname("/view/report.pdf", &blocked));
        assert!(is_blocked_pathname("/view/abc/wp-json/x", &blocked));
        assert!(is_blocked_pathname("/view/x/phpmyadmin", &blocked));
        assert!(is_blocked_pathname("/view/release-1.2", &blocked));
        assert!(!is_blocked_pathname("/view/report", &blocked));
        assert!(!is_blocked_pathname("/view/clx123/page", &[]));
    }

    #[test]
    fn test_webhook_host() {
        let matcher = WebhookHost::new(Some("Hooks.Papermark.com"));
        assert!(matcher.is_webhook_host("hooks.papermark.com"));
        assert!(matcher.is_webhook_host("HOOKS.papermark.com:443"));
        assert!(!matcher.is_webhook_host("app.papermark.com"));

        let unset = WebhookHost::new(None);
        assert!(!unset.is_webhook_host("hooks.papermark.com"));
        assert!(!unset.is_webhook_host(""));

        assert!(!WebhookHost::new(Some("")).is_webhook_host(""));
    }
}
