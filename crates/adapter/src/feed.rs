//! Replay peer: serves recorded frames to viewers.
//!
//! Frames are plain lines (the wire log format). Every connecting client gets
//! the full sequence, one text frame per interval, followed by a close.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// How long to wait for the client's close reply before dropping the socket.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Non-blank lines of `text`, in order.
pub fn load_frames(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept viewers forever, replaying `frames` to each on its own task.
pub async fn serve(
    listener: TcpListener,
    frames: Arc<Vec<String>>,
    interval: Duration,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, frames = frames.len(), "feed listening");
    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "viewer connected");
        let frames = Arc::clone(&frames);
        tokio::spawn(async move {
            match serve_connection(stream, &frames, interval).await {
                Ok(sent) => info!(%peer, sent, "replay finished"),
                Err(e) => warn!(%peer, error = %e, "replay aborted"),
            }
        });
    }
}

/// Replay `frames` on one connection, then close it. Returns frames sent.
pub async fn serve_connection(
    stream: TcpStream,
    frames: &[String],
    interval: Duration,
) -> anyhow::Result<usize> {
    let mut ws = accept_async(stream).await?;

    let mut sent = 0;
    for frame in frames {
        if sent > 0 && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
        ws.send(Message::Text(frame.clone())).await?;
        sent += 1;
        debug!(sent, "frame sent");
    }

    ws.close(None).await?;
    // Drain until the viewer acknowledges, or give up.
    let _ = tokio::time::timeout(CLOSE_GRACE, async {
        while let Some(Ok(_)) = ws.next().await {}
    })
    .await;
    Ok(sent)
}
