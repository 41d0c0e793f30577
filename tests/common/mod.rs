//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_dispatcher::config::{DispatcherConfig, RuntimeMode};
use edge_dispatcher::http::{Handler, Handlers};

/// Config for a production deployment at `app.papermark.com`.
pub fn production_config() -> DispatcherConfig {
    let mut config = DispatcherConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.environment.app_base_host = "app.papermark.com".into();
    config.environment.runtime_mode = RuntimeMode::Other;
    config.environment.webhook_base_host = Some("hooks.papermark.com".into());
    config
}

/// A handler answering `200 <name> <path-and-query>`.
pub fn named(name: &'static str) -> Arc<dyn Handler> {
    Arc::new(move |req: Request<Body>| async move {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default();
        (StatusCode::OK, format!("{name} {target}")).into_response()
    })
}

/// Handlers that echo which one was chosen.
pub fn named_handlers() -> Handlers {
    Handlers {
        analytics: named("analytics"),
        webhook: named("webhook"),
        domain: named("domain"),
        app: named("app"),
        next: named("next"),
    }
}

/// Start a mock upstream that answers every request with `name`.
///
/// Returns the address it listens on.
pub async fn start_mock_upstream(name: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        // Read the request head; bodies are not used by the tests.
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let head = String::from_utf8_lossy(&buf[..n]);
                        let request_line = head.lines().next().unwrap_or_default().to_string();
                        let target = request_line.split(' ').nth(1).unwrap_or_default();

                        let body = format!("{name} {target}");
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
