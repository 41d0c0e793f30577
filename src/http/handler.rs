//! Downstream handlers.
//!
//! # Responsibilities
//! - Define the seam every delegated handler sits behind
//! - Forward requests to a configured upstream (the shipped handler)
//! - Map a decision to the handler that serves it
//!
//! # Design Decisions
//! - Handlers own their failures: forwarding errors become 502 here and are
//!   never seen by the dispatcher
//! - Request bodies are streamed, never buffered
//! - The upstream URL's path is ignored; the request keeps its own path and query

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::{Authority, Scheme};
use axum::http::header::HOST;
use axum::http::{HeaderValue, Request, StatusCode, Uri, Version};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamsConfig;
use crate::http::request::request_id;
use crate::routing::Decision;

/// Produces the final response for a delegated request.
pub trait Handler: Send + Sync {
    fn handle(&self, req: Request<Body>) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn handle(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        Box::pin(self(req))
    }
}

/// Errors from building or using an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// Forwards requests to a single upstream server over plain HTTP.
#[derive(Clone)]
pub struct Upstream {
    name: &'static str,
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

impl Upstream {
    pub fn new(
        name: &'static str,
        base_url: &str,
        client: Client<HttpConnector, Body>,
    ) -> Result<Self, UpstreamError> {
        let invalid = |reason: String| UpstreamError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let authority = match url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = Authority::from_str(&authority).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            name,
            authority,
            client,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Send the request to this upstream, keeping method, headers, path and body.
    pub async fn forward(&self, req: Request<Body>) -> Result<Response, UpstreamError> {
        let (mut parts, body) = req.into_parts();

        // HTTP/2 and absolute-form requests carry the tenant host only in the
        // URI; keep it once the authority points at the upstream.
        if !parts.headers.contains_key(HOST) {
            if let Some(authority) = parts.uri.authority() {
                let host = HeaderValue::from_str(authority.as_str())
                    .map_err(axum::http::Error::from)?;
                parts.headers.insert(HOST, host);
            }
        }

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some("/".parse().map_err(axum::http::Error::from)?);
        }
        parts.uri = Uri::from_parts(uri_parts).map_err(axum::http::Error::from)?;
        // The pool speaks HTTP/1.1 whatever the client used.
        parts.version = Version::HTTP_11;

        let response: hyper::Response<Incoming> =
            self.client.request(Request::from_parts(parts, body)).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

impl fmt::Debug for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upstream")
            .field("name", &self.name)
            .field("authority", &self.authority)
            .finish()
    }
}

impl Handler for Upstream {
    fn handle(&self, req: Request<Body>) -> BoxFuture<'static, Response> {
        let upstream = self.clone();
        Box::pin(async move {
            let request_id = request_id(&req).to_string();
            match upstream.forward(req).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(
                        request_id = %request_id,
                        upstream = upstream.name,
                        error = %e,
                        "Upstream error"
                    );
                    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
                }
            }
        })
    }
}

/// The delegated handlers plus the next pipeline stage.
#[derive(Clone)]
pub struct Handlers {
    pub analytics: Arc<dyn Handler>,
    pub webhook: Arc<dyn Handler>,
    pub domain: Arc<dyn Handler>,
    pub app: Arc<dyn Handler>,
    /// Receives pass-through traffic and not-found rewrites.
    pub next: Arc<dyn Handler>,
}

impl Handlers {
    /// One forwarding upstream per handler, sharing a connection pool.
    pub fn from_config(config: &UpstreamsConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let upstream = |name, url: &str| -> Result<Arc<dyn Handler>, UpstreamError> {
            Ok(Arc::new(Upstream::new(name, url, client.clone())?))
        };

        Ok(Self {
            analytics: upstream("analytics", &config.analytics)?,
            webhook: upstream("webhook", &config.webhook)?,
            domain: upstream("domain", &config.domain)?,
            app: upstream("app", &config.app)?,
            next: upstream("next", &config.next)?,
        })
    }

    /// The handler a decision delegates to.
    pub fn for_decision(&self, decision: Decision) -> &Arc<dyn Handler> {
        match decision {
            Decision::Analytics => &self.analytics,
            Decision::Webhook => &self.webhook,
            Decision::CustomDomain => &self.domain,
            Decision::App => &self.app,
            Decision::BlockedRewrite | Decision::PassThrough => &self.next,
        }
    }
}
