//! Edge Request Dispatcher
//!
//! Sits in front of a multi-tenant web application and routes each request
//! to exactly one handler.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!   Client Request     │  ┌─────────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────────┼─▶│  http   │──▶│ matcher  │──▶│ dispatcher │  │
//!                      │  │ server  │   │(excluded │   │ (ordered   │  │
//!                      │  └─────────┘   │  paths)  │   │  rules)    │  │
//!                      │                └──────────┘   └─────┬──────┘  │
//!                      │                                     │         │
//!                      │        ┌──────────┬─────────┬───────┼───────┐ │
//!                      │        ▼          ▼         ▼       ▼       ▼ │
//!                      │   analytics   webhook   domain     app    next │
//!                      │                                  (404 rewrite, │
//!                      │                                  pass-through) │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use edge_dispatcher::config::{self, DispatcherConfig};
use edge_dispatcher::observability::{logging, metrics};
use edge_dispatcher::routing::normalize_host;
use edge_dispatcher::{Dispatcher, HttpServer, RequestTarget, Shutdown};

#[derive(Parser)]
#[command(name = "edge-dispatcher")]
#[command(about = "Host and path based request dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispatcher (default)
    Serve,
    /// Print the decision for a host and path as JSON
    Classify {
        #[arg(long)]
        host: String,
        #[arg(long)]
        path: String,
    },
}

fn load(path: Option<&Path>) -> Result<DispatcherConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::load_from_env(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Classify { host, path } => {
            let output = classify(&config, &host, &path);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

/// Decision for one host and path, as printed by `classify`.
fn classify(config: &DispatcherConfig, host: &str, path: &str) -> serde_json::Value {
    let dispatcher = Dispatcher::from_config(config);
    let hostname = normalize_host(host);
    let decision = dispatcher.classify(&RequestTarget::new(path, &hostname));
    serde_json::json!({
        "host": hostname,
        "path": path,
        "decision": decision,
    })
}

async fn serve(config: DispatcherConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);

    tracing::info!("edge-dispatcher v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        app_base_host = %config.environment.app_base_host,
        runtime_mode = ?config.environment.runtime_mode,
        blocked_pathnames = config.paths.blocked_pathnames.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
