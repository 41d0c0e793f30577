//! Admission matcher run before classification.
//!
//! # Responsibilities
//! - Decide whether a request path is classified at all
//! - Send API routes, framework internals and static assets straight through
//!
//! # Design Decisions
//! - Exclusions are prefixes of the path with its leading `/` removed, so
//!   `_static` excludes `/_static/x` and `/_staticfoo` alike
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

use axum::body::Body;
use axum::http::Request;

/// Admits request paths that should go through the dispatcher.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    exclusions: Vec<String>,
}

impl ExclusionMatcher {
    pub fn new<I, S>(exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclusions: exclusions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `path` should be classified.
    pub fn admits(&self, path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        !self
            .exclusions
            .iter()
            .any(|excluded| rest.starts_with(excluded.as_str()))
    }

    /// Returns true if the request should be classified.
    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.admits(req.uri().path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;

    fn matcher() -> ExclusionMatcher {
        ExclusionMatcher::new(PathsConfig::default().matcher_exclusions)
    }

    #[test]
    fn test_excluded_paths() {
        let m = matcher();
        for path in [
            "/api/links",
            "/_next/static/chunk.js",
            "/_static/logo.png",
            "/vendor/pdf.worker.js",
            "/_icons/apple.png",
            "/_vercel/insights/view",
            "/favicon.ico",
            "/sitemap.xml",
        ] {
            assert!(!m.admits(path), "{path} should be excluded");
        }
    }

    #[test]
    fn test_admitted_paths() {
        let m = matcher();
        for path in ["/", "/view/abc", "/ingest/e", "/api", "/apis/x", "/dashboard"] {
            assert!(m.admits(path), "{path} should be admitted");
        }
    }

    #[test]
    fn test_matches_request() {
        let m = matcher();
        let req = Request::builder()
            .uri("http://example.com/api/v1")
            .body(Body::default())
            .unwrap();
        assert!(!m.matches(&req));

        let req = Request::builder()
            .uri("http://example.com/view/doc")
            .body(Body::default())
            .unwrap();
        assert!(m.matches(&req));
    }
}
