//! Request classification.
//!
//! # Responsibilities
//! - Hold the immutable classification inputs (environment, host fragments,
//!   blocked pathnames, webhook matcher)
//! - Evaluate the ordered rule table for a request target
//! - Return exactly one [`Decision`]
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Rule order is data: [`Dispatcher::rules`] returns the table itself
//! - First match wins; [`Decision::PassThrough`] when nothing matches

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{DispatcherConfig, DomainsConfig};
use crate::routing::predicates::{
    is_analytics_path, is_blocked_pathname, is_custom_domain, Environment, WebhookHost,
    WebhookMatcher, APP_EXEMPT_PREFIXES, VIEWER_PREFIX,
};

/// Outcome of classifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Analytics,
    Webhook,
    CustomDomain,
    App,
    BlockedRewrite,
    PassThrough,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Analytics => "analytics",
            Decision::Webhook => "webhook",
            Decision::CustomDomain => "custom_domain",
            Decision::App => "app",
            Decision::BlockedRewrite => "blocked_rewrite",
            Decision::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a request the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTarget<'a> {
    pub path: &'a str,
    pub hostname: &'a str,
}

impl<'a> RequestTarget<'a> {
    pub fn new(path: &'a str, hostname: &'a str) -> Self {
        Self { path, hostname }
    }
}

/// One row of the decision table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub decision: Decision,
    applies: fn(&Dispatcher, &RequestTarget<'_>) -> bool,
}

impl Rule {
    pub fn applies(&self, dispatcher: &Dispatcher, target: &RequestTarget<'_>) -> bool {
        (self.applies)(dispatcher, target)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("decision", &self.decision).finish()
    }
}

const RULES: [Rule; 5] = [
    Rule {
        decision: Decision::Analytics,
        applies: analytics_rule,
    },
    Rule {
        decision: Decision::Webhook,
        applies: webhook_rule,
    },
    Rule {
        decision: Decision::CustomDomain,
        applies: custom_domain_rule,
    },
    Rule {
        decision: Decision::App,
        applies: app_rule,
    },
    Rule {
        decision: Decision::BlockedRewrite,
        applies: blocked_rule,
    },
];

fn analytics_rule(_: &Dispatcher, target: &RequestTarget<'_>) -> bool {
    is_analytics_path(target.path)
}

fn webhook_rule(dispatcher: &Dispatcher, target: &RequestTarget<'_>) -> bool {
    dispatcher.webhooks.is_webhook_host(target.hostname)
}

fn custom_domain_rule(dispatcher: &Dispatcher, target: &RequestTarget<'_>) -> bool {
    is_custom_domain(target.hostname, &dispatcher.environment, &dispatcher.domains)
}

fn app_rule(_: &Dispatcher, target: &RequestTarget<'_>) -> bool {
    !APP_EXEMPT_PREFIXES
        .iter()
        .any(|prefix| target.path.starts_with(*prefix))
}

// Viewer paths only; everything else was already claimed by `app_rule`.
fn blocked_rule(dispatcher: &Dispatcher, target: &RequestTarget<'_>) -> bool {
    target.path.starts_with(VIEWER_PREFIX)
        && is_blocked_pathname(target.path, &dispatcher.blocked_pathnames)
}

/// Classifies requests against the ordered rule table.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    environment: Environment,
    domains: DomainsConfig,
    blocked_pathnames: Vec<String>,
    webhooks: Arc<dyn WebhookMatcher>,
}

impl Dispatcher {
    pub fn new(
        environment: Environment,
        domains: DomainsConfig,
        blocked_pathnames: Vec<String>,
        webhooks: Arc<dyn WebhookMatcher>,
    ) -> Self {
        Self {
            environment,
            domains,
            blocked_pathnames,
            webhooks,
        }
    }

    /// Build a dispatcher from a loaded configuration.
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self::new(
            Environment::from_config(&config.environment),
            config.domains.clone(),
            config.paths.blocked_pathnames.clone(),
            Arc::new(WebhookHost::new(
                config.environment.webhook_base_host.as_deref(),
            )),
        )
    }

    /// The rule table in evaluation order.
    pub fn rules() -> &'static [Rule] {
        &RULES
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Classify one request. Pure: the same target always yields the same decision.
    pub fn classify(&self, target: &RequestTarget<'_>) -> Decision {
        Self::rules()
            .iter()
            .find(|rule| rule.applies(self, target))
            .map(|rule| rule.decision)
            .unwrap_or(Decision::PassThrough)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathsConfig, RuntimeMode};

    fn dispatcher(app_host: &str, mode: RuntimeMode, webhook: Option<&str>) -> Dispatcher {
        Dispatcher::new(
            Environment::new(app_host, mode),
            DomainsConfig::default(),
            PathsConfig::default().blocked_pathnames,
            Arc::new(WebhookHost::new(webhook)),
        )
    }

    fn production() -> Dispatcher {
        dispatcher(
            "app.papermark.com",
            RuntimeMode::Other,
            Some("hooks.papermark.com"),
        )
    }

    fn classify(d: &Dispatcher, path: &str, host: &str) -> Decision {
        d.classify(&RequestTarget::new(path, host))
    }

    #[test]
    fn test_rule_order() {
        let order: Vec<Decision> = Dispatcher::rules().iter().map(|r| r.decision).collect();
        assert_eq!(
            order,
            vec![
                Decision::Analytics,
                Decision::Webhook,
                Decision::CustomDomain,
                Decision::App,
                Decision::BlockedRewrite,
            ]
        );
    }

    #[test]
    fn test_analytics_wins_over_everything() {
        let d = production();
        assert_eq!(classify(&d, "/ingest/events", "hooks.papermark.com"), Decision::Analytics);
        assert_eq!(classify(&d, "/ingest/events", "docs.acme.com"), Decision::Analytics);
        assert_eq!(classify(&d, "/ingest/e.js", "app.papermark.com"), Decision::Analytics);
    }

    #[test]
    fn test_webhook_before_custom_domain() {
        // hooks.acme.com would otherwise qualify as a custom domain
        let d = dispatcher("app.papermark.com", RuntimeMode::Other, Some("hooks.acme.com"));
        assert_eq!(classify(&d, "/services/x", "hooks.acme.com"), Decision::Webhook);
        assert_eq!(classify(&d, "/view/doc", "hooks.acme.com"), Decision::Webhook);
    }

    #[test]
    fn test_custom_domain_in_development() {
        let d = dispatcher("localhost:3000", RuntimeMode::Development, None);
        assert_eq!(classify(&d, "/", "tenant.papermark.dev"), Decision::CustomDomain);
        assert_eq!(classify(&d, "/view/x.pdf", "tenant.papermark.dev"), Decision::CustomDomain);
    }

    #[test]
    fn test_platform_host_goes_to_app() {
        let d = production();
        assert_eq!(classify(&d, "/dashboard", "myapp.vercel.app"), Decision::App);
        assert_eq!(classify(&d, "/", "app.papermark.com"), Decision::App);
    }

    #[test]
    fn test_exempt_prefixes_skip_app() {
        let d = production();
        for path in ["/verify", "/verify/token", "/unsubscribe?id=1", "/auth/email", "/view/abc"] {
            assert_eq!(
                classify(&d, path, "app.papermark.com"),
                Decision::PassThrough,
                "{path}"
            );
        }
        // "/view" without the trailing slash is an ordinary app path
        assert_eq!(classify(&d, "/view", "app.papermark.com"), Decision::App);
    }

    #[test]
    fn test_blocked_viewer_paths() {
        let d = production();
        assert_eq!(classify(&d, "/view/report.pdf", "app.papermark.com"), Decision::BlockedRewrite);
        assert_eq!(
            classify(&d, "/view/x/wp-json/users", "app.papermark.com"),
            Decision::BlockedRewrite
        );
        assert_eq!(classify(&d, "/view/report", "app.papermark.com"), Decision::PassThrough);
        // dots outside the viewer prefix are not rewritten
        assert_eq!(classify(&d, "/verify/a.b", "app.papermark.com"), Decision::PassThrough);
    }

    #[test]
    fn test_empty_host_in_production_is_custom_domain() {
        let d = production();
        assert_eq!(classify(&d, "/view/report", ""), Decision::CustomDomain);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let d = production();
        let cases = [
            ("/ingest/e", "x.com"),
            ("/view/a.pdf", "app.papermark.com"),
            ("/", "docs.acme.com"),
            ("/verify", "app.papermark.com"),
        ];
        for (path, host) in cases {
            assert_eq!(classify(&d, path, host), classify(&d, path, host));
        }
    }

    #[test]
    fn test_from_config() {
        let mut config = DispatcherConfig::default();
        config.environment.app_base_host = "App.Papermark.com:443".into();
        config.environment.webhook_base_host = Some("hooks.papermark.com".into());
        let d = Dispatcher::from_config(&config);

        assert_eq!(d.environment().app_base_host(), "app.papermark.com");
        assert_eq!(classify(&d, "/x", "hooks.papermark.com"), Decision::Webhook);
        assert_eq!(classify(&d, "/x", "docs.acme.com"), Decision::CustomDomain);
    }

    #[test]
    fn test_decision_names() {
        assert_eq!(Decision::BlockedRewrite.to_string(), "blocked_rewrite");
        assert_eq!(
            serde_json::to_string(&Decision::CustomDomain).unwrap(),
            "\"custom_domain\""
        );
    }
}
