//! WebSocket client for the snapshot feed
//!
//! Connects once, turns every inbound frame into a [`ClientEvent`] and pushes
//! it to the viewer loop. There is no reconnect: when the connection fails or
//! closes the task reports it and ends.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::protocol::{parse_snapshot, PayloadError};
use crate::runtime::ClientEvent;
use crate::types::{DEFAULT_HOST, DEFAULT_PORT};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Append every inbound text frame here, one per line.
    pub wire_log: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            wire_log: None,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("TETRIS_VIEW_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup("TETRIS_VIEW_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let wire_log = lookup("TETRIS_VIEW_WIRE_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            wire_log,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

/// Decode one text frame into the event the viewer should see.
pub fn decode_text(text: &str) -> ClientEvent {
    match parse_snapshot(text) {
        Ok(snapshot) => ClientEvent::Snapshot(snapshot),
        Err(e) => ClientEvent::Malformed(e),
    }
}

fn decode_binary(bytes: &[u8]) -> ClientEvent {
    match std::str::from_utf8(bytes) {
        Ok(text) => decode_text(text),
        Err(_) => ClientEvent::Malformed(PayloadError::NotText),
    }
}

struct WireLog {
    file: tokio::fs::File,
    line: Vec<u8>,
}

impl WireLog {
    async fn open(path: &Path) -> Option<Self> {
        match OpenOptions::new().create(true).append(true).open(path).await {
            Ok(file) => Some(Self {
                file,
                line: Vec::with_capacity(4096),
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "wire log disabled");
                None
            }
        }
    }

    async fn record(&mut self, text: &str) -> std::io::Result<()> {
        self.line.clear();
        log_line_into(text, &mut self.line);
        self.file.write_all(&self.line).await?;
        self.file.flush().await
    }
}

/// One wire log line for `text`, newline included.
///
/// Line breaks become spaces. JSON cannot hold a raw line break inside a
/// string, so a valid frame keeps its meaning and stays on one line.
fn log_line_into(text: &str, out: &mut Vec<u8>) {
    out.extend(
        text.trim()
            .bytes()
            .map(|b| if b == b'\n' || b == b'\r' { b' ' } else { b }),
    );
    out.push(b'\n');
}

/// Connect to the peer and forward events until the connection ends.
///
/// Every exit path sends [`ClientEvent::Closed`] last. The returned error is
/// the transport failure, already reported as [`ClientEvent::TransportError`].
pub async fn run_client(
    config: ClientConfig,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
) -> anyhow::Result<()> {
    let url = config.url();
    info!(%url, "connecting");

    let mut ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            let _ = event_tx.send(ClientEvent::TransportError(e.to_string()));
            let _ = event_tx.send(ClientEvent::Closed);
            return Err(e.into());
        }
    };
    let _ = event_tx.send(ClientEvent::Opened);

    let mut wire_log = match config.wire_log.as_ref() {
        Some(path) => WireLog::open(path).await,
        None => None,
    };

    let mut result = Ok(());
    while let Some(msg) = ws.next().await {
        let event = match msg {
            Ok(Message::Text(text)) => {
                if let Some(log) = wire_log.as_mut() {
                    if let Err(e) = log.record(&text).await {
                        warn!(error = %e, "wire log write failed; disabling");
                        wire_log = None;
                    }
                }
                decode_text(&text)
            }
            Ok(Message::Binary(bytes)) => decode_binary(&bytes),
            Ok(Message::Close(frame)) => {
                debug!(?frame, "close frame received");
                break;
            }
            // Ping/pong are answered by tungstenite itself.
            Ok(_) => continue,
            Err(e) => {
                let _ = event_tx.send(ClientEvent::TransportError(e.to_string()));
                result = Err(e.into());
                break;
            }
        };
        if event_tx.send(event).is_err() {
            // Viewer is gone; nobody left to draw for.
            break;
        }
    }

    let _ = event_tx.send(ClientEvent::Closed);
    result
}
