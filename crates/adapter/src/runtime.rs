//! Adapter runtime integration.
//!
//! Bridges the synchronous viewer loop with the async WebSocket client.

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::client::{run_client, ClientConfig};
use crate::protocol::PayloadError;
use crate::types::Snapshot;

/// Lifecycle and data events delivered to the viewer loop, in arrival order.
#[derive(Debug)]
pub enum ClientEvent {
    /// The WebSocket handshake completed.
    Opened,
    /// A message decoded into a valid snapshot.
    Snapshot(Snapshot),
    /// A message that could not be decoded; the frame is skipped.
    Malformed(PayloadError),
    /// Connect or read failure. Always followed by `Closed`.
    TransportError(String),
    /// The connection is gone; no further events follow.
    Closed,
}

impl ClientEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Opened => "opened",
            ClientEvent::Snapshot(_) => "snapshot",
            ClientEvent::Malformed(_) => "malformed",
            ClientEvent::TransportError(_) => "transport_error",
            ClientEvent::Closed => "closed",
        }
    }
}

/// Running adapter instance.
///
/// Owns a tokio runtime on background threads. Dropping the adapter shuts the
/// runtime down, which also drops the connection.
pub struct Adapter {
    _rt: Runtime,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl Adapter {
    /// Start the client against `config` and return the event receiver side.
    pub fn start(config: ClientConfig) -> anyhow::Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ClientEvent>();

        let rt = Runtime::new()?;
        rt.spawn(async move {
            if let Err(e) = run_client(config, event_tx).await {
                tracing::debug!(error = %e, "client task ended with error");
            }
        });

        Ok(Self { _rt: rt, event_rx })
    }

    /// Next pending event without blocking.
    pub fn try_recv(&mut self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until an event arrives or the client task is gone.
    ///
    /// Must not be called from inside an async context.
    pub fn recv_blocking(&mut self) -> Option<ClientEvent> {
        self.event_rx.blocking_recv()
    }
}
