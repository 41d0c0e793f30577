//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Classify each request and delegate to exactly one handler
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::DispatcherConfig;
use crate::http::handler::{Handlers, UpstreamError};
use crate::http::request::{request_hostname, request_id, UuidRequestId};
use crate::http::response::not_found_rewrite;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::routing::{Decision, Dispatcher, ExclusionMatcher, RequestTarget};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub matcher: Arc<ExclusionMatcher>,
    pub handlers: Handlers,
}

/// HTTP server for the edge dispatcher.
pub struct HttpServer {
    router: Router,
    config: DispatcherConfig,
}

impl HttpServer {
    /// Create a server forwarding to the configured upstreams.
    pub fn new(config: DispatcherConfig) -> Result<Self, UpstreamError> {
        let handlers = Handlers::from_config(&config.upstreams)?;
        Ok(Self::with_handlers(config, handlers))
    }

    /// Create a server with caller-provided handlers.
    pub fn with_handlers(config: DispatcherConfig, handlers: Handlers) -> Self {
        let state = AppState {
            dispatcher: Arc::new(Dispatcher::from_config(&config)),
            matcher: Arc::new(ExclusionMatcher::new(
                config.paths.matcher_exclusions.iter().cloned(),
            )),
            handlers,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &DispatcherConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Run the server until Ctrl+C, SIGTERM or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    }
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Classify the request and hand it to exactly one handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();
    let hostname = request_hostname(&request);
    let path = request.uri().path().to_string();

    let admitted = state.matcher.matches(&request);
    let decision = if admitted {
        state
            .dispatcher
            .classify(&RequestTarget::new(&path, &hostname))
    } else {
        Decision::PassThrough
    };

    tracing::debug!(
        request_id = %request_id,
        host = %hostname,
        path = %path,
        admitted,
        decision = %decision,
        "Dispatching request"
    );
    metrics::record_decision(decision);

    let response = match decision {
        Decision::BlockedRewrite => {
            not_found_rewrite(state.handlers.next.as_ref(), request).await
        }
        other => state.handlers.for_decision(other).handle(request).await,
    };

    metrics::record_request(decision, response.status().as_u16(), start_time);
    response
}
