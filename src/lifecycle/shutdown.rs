//! Shutdown coordination for the dispatcher.
//!
//! A trigger stops `HttpServer::run` from accepting connections. Requests
//! already being dispatched finish against their upstream, then `run` returns.
//! OS signals take the same path through `signals::shutdown_signal`.

use tokio::sync::broadcast;

/// Fan-out handle for a graceful stop.
///
/// Each running server holds one receiver from [`Shutdown::subscribe`]; the
/// receiver is dropped when that server has drained.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. A no-op when nobody is listening.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of servers that have not finished draining.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
